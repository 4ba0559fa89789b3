use std::fs::{self, File};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::app::Result;
use crate::domain::CardRecord;
use crate::store::CardSink;

/// Writes one CSV row per card, header first. Rows are flushed as they
/// arrive so an interrupted gather keeps everything written so far.
pub struct CsvSink {
    writer: Mutex<csv::Writer<File>>,
}

impl CsvSink {
    /// Replaces any existing file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        if path.exists() {
            fs::remove_file(path)?;
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let writer = csv::Writer::from_path(path)?;
        Ok(Self {
            writer: Mutex::new(writer),
        })
    }
}

impl CardSink for CsvSink {
    fn save_card(&self, card: &CardRecord) -> Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.serialize(card)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("cards.csv");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "stale contents\n").unwrap();

        let sink = CsvSink::create(&path).unwrap();
        let mut card = CardRecord::new(1, "Blue-Eyes White Dragon", "https://img/1.jpg");
        card.level = 8;
        card.attack = 3000;
        sink.save_card(&card).unwrap();
        sink.save_card(&CardRecord::new(2, "Dark Magician", "https://img/2.jpg"))
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "id,name,description,image,type,attribute,race,level,attack_points,defense_points,cost,rarity"
        );
        assert!(lines[1].starts_with("1,Blue-Eyes White Dragon,,https://img/1.jpg,Monster,,,8,3000"));
        assert!(!content.contains("stale"));
    }
}
