use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use crate::app::Result;
use crate::config::WikiConfig;
use crate::extractor::element_text;

static SEARCH_RESULT: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a.unified-search__result__title").expect("valid search result selector")
});

/// URL layout of the card wiki.
#[derive(Debug, Clone)]
pub struct WikiSite {
    base: Url,
    search_path: String,
}

impl WikiSite {
    pub fn new(config: &WikiConfig) -> Result<Self> {
        Ok(Self {
            base: config.base()?,
            search_path: config.search_path.clone(),
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Page URL for an identifier. Slashes stay path separators; other
    /// reserved characters such as `#` are percent-encoded.
    pub fn page_url(&self, identifier: &str) -> String {
        self.with_segments(identifier.split('/')).into()
    }

    pub fn search_url(&self, name: &str) -> String {
        let mut url = self.with_segments(self.search_path.split('/'));
        url.query_pairs_mut().append_pair("search", name);
        url.into()
    }

    /// Absolute URL for a link found on a wiki page.
    pub fn resolve_link(&self, href: &str) -> Result<Url> {
        Ok(self.base.join(href)?)
    }

    fn with_segments<'a>(&self, pieces: impl Iterator<Item = &'a str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(pieces);
        }
        url
    }
}

/// One entry of a search results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub href: String,
}

pub fn parse_search_results(body: &str) -> Vec<SearchHit> {
    let document = Html::parse_document(body);
    let hits = document
        .select(&SEARCH_RESULT)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?.trim();
            if href.is_empty() {
                return None;
            }
            Some(SearchHit {
                title: element_text(anchor),
                href: href.to_string(),
            })
        })
        .collect();
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> WikiSite {
        WikiSite::new(&WikiConfig::default()).unwrap()
    }

    #[test]
    fn test_page_url_encodes_hash() {
        assert_eq!(
            site().page_url("Winged_Dragon,_Guardian_of_the_Fortress_#1"),
            "https://yugioh.fandom.com/wiki/Winged_Dragon,_Guardian_of_the_Fortress_%231"
        );
        assert_eq!(
            site().page_url("Blue-Eyes_White_Dragon"),
            "https://yugioh.fandom.com/wiki/Blue-Eyes_White_Dragon"
        );
    }

    #[test]
    fn test_page_url_keeps_slashes() {
        assert_eq!(
            site().page_url("D/D/D_Doom_King_Armageddon"),
            "https://yugioh.fandom.com/wiki/D/D/D_Doom_King_Armageddon"
        );
        assert_eq!(
            site().page_url("Which?/100%"),
            "https://yugioh.fandom.com/wiki/Which%3F/100%25"
        );
    }

    #[test]
    fn test_search_url() {
        assert_eq!(
            site().search_url("Dark Magician"),
            "https://yugioh.fandom.com/wiki/Special:Search?search=Dark+Magician"
        );
    }

    #[test]
    fn test_trailing_slash_in_base() {
        let config = WikiConfig {
            base_url: "https://yugioh.fandom.com/wiki/".into(),
            ..WikiConfig::default()
        };
        let site = WikiSite::new(&config).unwrap();
        assert_eq!(site.page_url("Kuriboh"), "https://yugioh.fandom.com/wiki/Kuriboh");
    }

    #[test]
    fn test_resolve_link() {
        let site = site();
        assert_eq!(
            site.resolve_link("/wiki/Kuriboh").unwrap().as_str(),
            "https://yugioh.fandom.com/wiki/Kuriboh"
        );
        assert_eq!(
            site.resolve_link("https://other.example/x").unwrap().as_str(),
            "https://other.example/x"
        );
    }

    #[test]
    fn test_parse_search_results() {
        let hits = parse_search_results(
            r#"<ul>
<li><a class="unified-search__result__title" href="/wiki/Kuriboh">Kuriboh</a></li>
<li><a class="unified-search__result__title" data-title="x"> Winged  Kuriboh </a></li>
<li><a class="unified-search__result__title" href="/wiki/Winged_Kuriboh">Winged Kuriboh</a></li>
<li><a class="other" href="/wiki/Nope">Nope</a></li>
</ul>"#,
        );
        assert_eq!(
            hits,
            vec![
                SearchHit {
                    title: "Kuriboh".into(),
                    href: "/wiki/Kuriboh".into()
                },
                SearchHit {
                    title: "Winged Kuriboh".into(),
                    href: "/wiki/Winged_Kuriboh".into()
                },
            ]
        );
    }
}
