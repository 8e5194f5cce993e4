use serde::{Deserialize, Serialize};

use crate::error::{CardbaseError, Result};
use crate::models::set::CardSet;

/// Rarity printed on a specific edition of a card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Unknown,
    MythicRare,
    Rare,
    Uncommon,
    Common,
    Special,
    Land,
    Token,
    Emblem,
    Other,
}

impl Rarity {
    /// Single-letter code as stored in the original card data.
    pub fn code(self) -> &'static str {
        match self {
            Rarity::Unknown => "",
            Rarity::MythicRare => "M",
            Rarity::Rare => "R",
            Rarity::Uncommon => "U",
            Rarity::Common => "C",
            Rarity::Special => "S",
            Rarity::Land => "L",
            Rarity::Token => "T",
            Rarity::Emblem => "E",
            Rarity::Other => "O",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rarity::Unknown => "No rarity",
            Rarity::MythicRare => "Mythic Rare",
            Rarity::Rare => "Rare",
            Rarity::Uncommon => "Uncommon",
            Rarity::Common => "Common",
            Rarity::Special => "Special",
            Rarity::Land => "Land",
            Rarity::Token => "Token",
            Rarity::Emblem => "Emblem",
            Rarity::Other => "Other",
        }
    }

    const ALL: [Rarity; 10] = [
        Rarity::Unknown,
        Rarity::MythicRare,
        Rarity::Rare,
        Rarity::Uncommon,
        Rarity::Common,
        Rarity::Special,
        Rarity::Land,
        Rarity::Token,
        Rarity::Emblem,
        Rarity::Other,
    ];

    /// Resolve a filter word: either the letter code or the full label,
    /// case-insensitively.
    pub fn from_word(word: &str) -> Option<Rarity> {
        Rarity::ALL
            .into_iter()
            .skip(1)
            .find(|r| word.eq_ignore_ascii_case(r.code()) || word.eq_ignore_ascii_case(r.label()))
    }
}

/// A specific printing of a card in a specific set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edition {
    pub number: u32,
    /// Optional single-letter suffix, e.g. the `a` in `60a`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub number_suffix: String,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub artist: String,
    pub set: CardSet,
}

impl Edition {
    /// Split a printed collector number like `60a` into its numeric
    /// part and suffix.
    pub fn parse_number(text: &str) -> Result<(u32, String)> {
        let text = text.trim();
        if let Ok(number) = text.parse::<u32>() {
            return Ok((number, String::new()));
        }
        let mut chars = text.chars();
        if let Some(suffix) = chars.next_back()
            && suffix.is_ascii_alphabetic()
            && let Ok(number) = chars.as_str().parse::<u32>()
        {
            return Ok((number, suffix.to_string()));
        }
        Err(CardbaseError::InvalidEditionNumber(text.to_string()))
    }

    /// The printed collector number, e.g. `60a`.
    pub fn display_number(&self) -> String {
        format!("{}{}", self.number, self.number_suffix)
    }
}
