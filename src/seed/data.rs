use super::{SampleCard, SampleDeck};

pub const SAMPLE_CARDS: [SampleCard; 10] = [
    SampleCard {
        id: 1,
        name: "Blue-Eyes White Dragon",
        level: 8,
        attack: 3000,
        defense: 2500,
        description: "This legendary dragon is a powerful engine of destruction. Virtually invincible, very few have faced this awesome creature and lived to tell the tale.",
        image: "https://images.ygoprodeck.com/images/cards/89631139.jpg",
        attribute: "LIGHT",
        race: "Dragon",
        rarity: "Ultra Rare",
    },
    SampleCard {
        id: 2,
        name: "Dark Magician",
        level: 7,
        attack: 2500,
        defense: 2100,
        description: "The ultimate wizard in terms of attack and defense.",
        image: "https://images.ygoprodeck.com/images/cards/46986414.jpg",
        attribute: "DARK",
        race: "Spellcaster",
        rarity: "Ultra Rare",
    },
    SampleCard {
        id: 3,
        name: "Exodia the Forbidden One",
        level: 3,
        attack: 1000,
        defense: 1000,
        description: "If you have \"Right Leg of the Forbidden One\", \"Left Leg of the Forbidden One\", \"Right Arm of the Forbidden One\" and \"Left Arm of the Forbidden One\" in addition to this card in your hand, you win the Duel.",
        image: "https://images.ygoprodeck.com/images/cards/33396948.jpg",
        attribute: "DARK",
        race: "Spellcaster",
        rarity: "Ultra Rare",
    },
    SampleCard {
        id: 4,
        name: "Obelisk the Tormentor",
        level: 10,
        attack: 4000,
        defense: 4000,
        description: "Requires 3 Tributes to Normal Summon (cannot be Normal Set). This card's Normal Summon cannot be negated. When Normal Summoned, cards and effects cannot be activated. Neither player can target this card with card effects. Once per turn, during the End Phase, if this card was Special Summoned: Send it to the GY. You can Tribute 2 monsters; destroy all monsters your opponent controls. This card cannot declare an attack the turn this effect is activated.",
        image: "https://images.ygoprodeck.com/images/cards/10000000.jpg",
        attribute: "DIVINE",
        race: "Divine-Beast",
        rarity: "Secret Rare",
    },
    SampleCard {
        id: 5,
        name: "Slifer the Sky Dragon",
        level: 10,
        attack: -1,
        defense: -1,
        description: "Requires 3 Tributes to Normal Summon (cannot be Normal Set). This card's Normal Summon cannot be negated. When Normal Summoned, cards and effects cannot be activated. Once per turn, during the End Phase, if this card was Special Summoned: Send it to the GY. Gains 1000 ATK/DEF for each card in your hand. If a monster(s) is Normal or Special Summoned to your opponent's field in Attack Position: That monster(s) loses 2000 ATK, then if its ATK has been reduced to 0 as a result, destroy it.",
        image: "https://images.ygoprodeck.com/images/cards/10000020.jpg",
        attribute: "DIVINE",
        race: "Divine-Beast",
        rarity: "Secret Rare",
    },
    SampleCard {
        id: 6,
        name: "The Winged Dragon of Ra",
        level: 10,
        attack: -1,
        defense: -1,
        description: "Cannot be Special Summoned. Requires 3 Tributes to Normal Summon (cannot be Normal Set). This card's Normal Summon cannot be negated. When Normal Summoned, other cards and effects cannot be activated. When this card is Normal Summoned: You can pay LP so that you only have 100 left; this card gains ATK/DEF equal to the amount of LP paid. You can pay 1000 LP, then target 1 monster on the field; destroy that target.",
        image: "https://images.ygoprodeck.com/images/cards/10000010.jpg",
        attribute: "DIVINE",
        race: "Divine-Beast",
        rarity: "Secret Rare",
    },
    SampleCard {
        id: 7,
        name: "Red-Eyes Black Dragon",
        level: 7,
        attack: 2400,
        defense: 2000,
        description: "A ferocious dragon with a deadly attack.",
        image: "https://images.ygoprodeck.com/images/cards/74677422.jpg",
        attribute: "DARK",
        race: "Dragon",
        rarity: "Ultra Rare",
    },
    SampleCard {
        id: 8,
        name: "Summoned Skull",
        level: 6,
        attack: 2500,
        defense: 1200,
        description: "A fiend with dark powers for confusing the enemy. Among the Fiend-Type monsters, this monster boasts considerable force. (This card is always treated as an \"Archfiend\" card.)",
        image: "https://images.ygoprodeck.com/images/cards/70781052.jpg",
        attribute: "DARK",
        race: "Fiend",
        rarity: "Super Rare",
    },
    SampleCard {
        id: 9,
        name: "Dark Magician Girl",
        level: 6,
        attack: 2000,
        defense: 1700,
        description: "Gains 300 ATK for every \"Dark Magician\" or \"Magician of Black Chaos\" in the GY.",
        image: "https://images.ygoprodeck.com/images/cards/38033121.jpg",
        attribute: "DARK",
        race: "Spellcaster",
        rarity: "Ultra Rare",
    },
    SampleCard {
        id: 10,
        name: "Kuriboh",
        level: 1,
        attack: 300,
        defense: 200,
        description: "During damage calculation, if your opponent's monster attacks (Quick Effect): You can discard this card; you take no battle damage from that battle.",
        image: "https://images.ygoprodeck.com/images/cards/40640057.jpg",
        attribute: "DARK",
        race: "Fiend",
        rarity: "Common",
    },
];

pub const SAMPLE_DECKS: [SampleDeck; 2] = [
    SampleDeck {
        name: "Legend of Blue Eyes",
        description: "Seto Kaiba's dragon-heavy deck built around overwhelming attack power.",
        character_name: "Seto Kaiba",
        archetype: "Dragon",
        max_cost: 250,
        pattern: &[1, 2, 4, 5, 6, 7],
    },
    SampleDeck {
        name: "Heart of the Cards",
        description: "Yugi's balanced line-up featuring spellcasters, guardians, and the Egyptian Gods.",
        character_name: "Yugi Muto",
        archetype: "Spellcaster",
        max_cost: 230,
        pattern: &[2, 3, 5, 6, 8, 9, 10],
    },
];
