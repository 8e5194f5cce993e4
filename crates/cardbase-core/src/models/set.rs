use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Category of a block, as listed on the card database sitemap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockCategory {
    #[default]
    Unknown,
    Expansion,
    CoreSet,
    Online,
    SpecialSet,
    PromoCard,
}

impl BlockCategory {
    pub fn label(self) -> &'static str {
        match self {
            BlockCategory::Unknown => "unknown",
            BlockCategory::Expansion => "Expansions",
            BlockCategory::CoreSet => "Core Sets",
            BlockCategory::Online => "MTGO",
            BlockCategory::SpecialSet => "Special Sets",
            BlockCategory::PromoCard => "Promo Cards",
        }
    }
}

/// A block groups sets released together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub name: String,
    #[serde(default)]
    pub category: BlockCategory,
}

impl Block {
    pub fn new(name: impl Into<String>, category: BlockCategory) -> Self {
        Self {
            name: name.into(),
            category,
        }
    }
}

/// A set/expansion a card can be printed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSet {
    /// Short code, stored uppercase (e.g. `ORI`).
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    pub block: Block,
}

impl CardSet {
    pub fn new(code: impl Into<String>, name: impl Into<String>, block: Block) -> Self {
        Self {
            code: code.into().to_uppercase(),
            name: name.into(),
            release_date: None,
            block,
        }
    }
}
