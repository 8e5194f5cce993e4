use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::mana::ManaCost;
use crate::models::edition::Edition;

// ─── Stats ─────────────────────────────────────────────────

/// Power, toughness or loyalty: an optional printed number plus an
/// optional symbolic remainder such as `*` or `1+*`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub special: String,
}

impl StatValue {
    /// Parse a printed stat: numeric if it parses as an integer, the
    /// symbolic form otherwise.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Self::default();
        }
        match text.parse::<u32>() {
            Ok(value) => Self {
                value: Some(value),
                special: String::new(),
            },
            Err(_) => Self {
                value: None,
                special: text.to_string(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.special.is_empty()
    }

    pub fn display(&self) -> String {
        let mut out = match self.value {
            Some(v) => v.to_string(),
            None => String::new(),
        };
        out.push_str(&self.special);
        out
    }
}

// ─── Formats & legality ────────────────────────────────────

/// The seven tracked play formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Vintage,
    Legacy,
    Extended,
    Standard,
    Classic,
    Commander,
    Modern,
}

impl Format {
    pub const ALL: [Format; 7] = [
        Format::Vintage,
        Format::Legacy,
        Format::Extended,
        Format::Standard,
        Format::Classic,
        Format::Commander,
        Format::Modern,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Format::Vintage => "Vintage",
            Format::Legacy => "Legacy",
            Format::Extended => "Extended",
            Format::Standard => "Standard",
            Format::Classic => "Classic",
            Format::Commander => "Commander",
            Format::Modern => "Modern",
        }
    }

    pub fn from_word(word: &str) -> Option<Format> {
        Format::ALL
            .into_iter()
            .find(|f| word.eq_ignore_ascii_case(f.name()))
    }
}

/// Per-format legality status of a card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Legality {
    #[default]
    Unknown,
    Legal,
    Restricted,
    Banned,
}

/// One legality status per tracked format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Legalities {
    pub vintage: Legality,
    pub legacy: Legality,
    pub extended: Legality,
    pub standard: Legality,
    pub classic: Legality,
    pub commander: Legality,
    pub modern: Legality,
}

impl Legalities {
    pub fn get(&self, format: Format) -> Legality {
        match format {
            Format::Vintage => self.vintage,
            Format::Legacy => self.legacy,
            Format::Extended => self.extended,
            Format::Standard => self.standard,
            Format::Classic => self.classic,
            Format::Commander => self.commander,
            Format::Modern => self.modern,
        }
    }

    pub fn set(&mut self, format: Format, legality: Legality) {
        let slot = match format {
            Format::Vintage => &mut self.vintage,
            Format::Legacy => &mut self.legacy,
            Format::Extended => &mut self.extended,
            Format::Standard => &mut self.standard,
            Format::Classic => &mut self.classic,
            Format::Commander => &mut self.commander,
            Format::Modern => &mut self.modern,
        };
        *slot = legality;
    }
}

/// Format names grouped by legality status, for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegalitySummary {
    pub legal: Vec<&'static str>,
    pub restricted: Vec<&'static str>,
    pub banned: Vec<&'static str>,
}

// ─── Multi cards & rulings ─────────────────────────────────

/// Whether a card is one half of a linked printing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiType {
    #[default]
    None,
    Split,
    Flip,
}

impl MultiType {
    pub fn code(self) -> &'static str {
        match self {
            MultiType::None => "",
            MultiType::Split => "S",
            MultiType::Flip => "F",
        }
    }

    /// Resolve a filter word: letter code or full name, case-insensitively.
    pub fn from_word(word: &str) -> Option<MultiType> {
        [MultiType::Split, MultiType::Flip].into_iter().find(|m| {
            word.eq_ignore_ascii_case(m.code())
                || word.eq_ignore_ascii_case(match m {
                    MultiType::Split => "split",
                    MultiType::Flip => "flip",
                    MultiType::None => "",
                })
        })
    }
}

/// An official ruling that affects a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruling {
    pub text: String,
    pub date: NaiveDate,
}

// ─── Card ──────────────────────────────────────────────────

/// The canonical card record the filter engine operates on.
/// Identified by its unique name; editions carry the per-printing data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    #[serde(default)]
    pub types: String,
    #[serde(default)]
    pub rules: String,
    #[serde(default)]
    pub flavour: String,

    #[serde(default, skip_serializing_if = "StatValue::is_empty")]
    pub power: StatValue,
    #[serde(default, skip_serializing_if = "StatValue::is_empty")]
    pub toughness: StatValue,
    #[serde(default, skip_serializing_if = "StatValue::is_empty")]
    pub loyalty: StatValue,

    #[serde(default, skip_serializing_if = "ManaCost::is_empty")]
    pub mana: ManaCost,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmc: Option<u32>,

    #[serde(default)]
    pub multi_type: MultiType,
    #[serde(default)]
    pub legalities: Legalities,
    #[serde(default)]
    pub rulings: Vec<Ruling>,
    #[serde(default)]
    pub editions: Vec<Edition>,
}

impl Card {
    /// Create a new card with minimal required fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: String::new(),
            rules: String::new(),
            flavour: String::new(),
            power: StatValue::default(),
            toughness: StatValue::default(),
            loyalty: StatValue::default(),
            mana: ManaCost::default(),
            cmc: None,
            multi_type: MultiType::default(),
            legalities: Legalities::default(),
            rulings: Vec::new(),
            editions: Vec::new(),
        }
    }

    /// Set the mana cost from compact notation.
    pub fn set_mana(&mut self, text: &str) {
        self.mana = ManaCost::parse(text);
    }

    /// The mana cost rendered in canonical notation.
    pub fn mana_display(&self) -> String {
        self.mana.render()
    }

    /// Power/toughness/loyalty as a display string, e.g.
    /// `2/2`, `*/4 (Loyalty: 3)`.
    pub fn ptl_display(&self) -> String {
        let mut out = String::new();
        if !self.power.is_empty() || !self.toughness.is_empty() {
            out.push_str(&self.power.display());
            out.push('/');
            out.push_str(&self.toughness.display());
        }
        if !self.loyalty.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&format!("(Loyalty: {})", self.loyalty.display()));
        }
        out
    }

    /// The edition from the most recently released set, if any.
    pub fn newest_edition(&self) -> Option<&Edition> {
        self.editions.iter().max_by_key(|e| e.set.release_date)
    }

    /// Format names grouped by legality status.
    pub fn legality_summary(&self) -> LegalitySummary {
        let mut summary = LegalitySummary::default();
        for format in Format::ALL {
            match self.legalities.get(format) {
                Legality::Legal => summary.legal.push(format.name()),
                Legality::Restricted => summary.restricted.push(format.name()),
                Legality::Banned => summary.banned.push(format.name()),
                Legality::Unknown => {}
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::set::{Block, BlockCategory, CardSet};

    fn make_edition(code: &str, release: Option<&str>) -> Edition {
        let mut set = CardSet::new(
            code,
            format!("Set {code}"),
            Block::new("Test block", BlockCategory::Expansion),
        );
        set.release_date = release.map(|d| d.parse().unwrap());
        Edition {
            number: 1,
            number_suffix: String::new(),
            rarity: Default::default(),
            artist: String::new(),
            set,
        }
    }

    #[test]
    fn test_stat_value_parse() {
        assert_eq!(StatValue::parse("4"), StatValue { value: Some(4), special: String::new() });
        assert_eq!(StatValue::parse("*"), StatValue { value: None, special: "*".to_string() });
        assert_eq!(StatValue::parse("1+*"), StatValue { value: None, special: "1+*".to_string() });
        assert!(StatValue::parse("").is_empty());
    }

    #[test]
    fn test_ptl_display() {
        let mut card = Card::new("Grizzly Bears");
        card.power = StatValue::parse("2");
        card.toughness = StatValue::parse("2");
        assert_eq!(card.ptl_display(), "2/2");

        let mut walker = Card::new("Jace");
        walker.loyalty = StatValue::parse("3");
        assert_eq!(walker.ptl_display(), "(Loyalty: 3)");

        let mut odd = Card::new("Tarmogoyf");
        odd.power = StatValue::parse("*");
        odd.toughness = StatValue::parse("1+*");
        assert_eq!(odd.ptl_display(), "*/1+*");
    }

    #[test]
    fn test_newest_edition() {
        let mut card = Card::new("Counterspell");
        card.editions.push(make_edition("A", Some("1996-10-08")));
        card.editions.push(make_edition("B", Some("2015-07-17")));
        card.editions.push(make_edition("C", None));
        assert_eq!(card.newest_edition().unwrap().set.code, "B");
    }

    #[test]
    fn test_legality_summary() {
        let mut card = Card::new("Channel");
        card.legalities.set(Format::Vintage, Legality::Restricted);
        card.legalities.set(Format::Legacy, Legality::Banned);
        card.legalities.set(Format::Commander, Legality::Legal);
        let summary = card.legality_summary();
        assert_eq!(summary.legal, vec!["Commander"]);
        assert_eq!(summary.restricted, vec!["Vintage"]);
        assert_eq!(summary.banned, vec!["Legacy"]);
    }

    #[test]
    fn test_format_from_word() {
        assert_eq!(Format::from_word("modern"), Some(Format::Modern));
        assert_eq!(Format::from_word("VINTAGE"), Some(Format::Vintage));
        assert_eq!(Format::from_word("pauper"), None);
    }

    #[test]
    fn test_multi_type_from_word() {
        assert_eq!(MultiType::from_word("S"), Some(MultiType::Split));
        assert_eq!(MultiType::from_word("flip"), Some(MultiType::Flip));
        assert_eq!(MultiType::from_word("x"), None);
    }
}
