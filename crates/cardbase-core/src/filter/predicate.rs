//! Compiled predicates.
//!
//! A [`Predicate`] is a composable boolean test over one card field,
//! built by the compiler from a token tree and evaluated against the
//! in-memory corpus. Leaves carry a typed comparison descriptor
//! ([`Cmp`]) instead of stringly-typed lookup names; user regexes are
//! compiled when the leaf is built, so evaluation itself cannot fail.

use regex::Regex;

use crate::mana::{tokenize_special, ManaCost};
use crate::models::{Card, Format, Legality, MultiType, Rarity};

/// Typed comparison descriptor interpreted by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Equals,
    Contains,
    ContainsCase,
    Lt,
    Lte,
    Gt,
    Gte,
}

/// Free-text fields a predicate can read. Rulings and artist names
/// live on related records; matching ORs across them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    Types,
    Rules,
    Flavour,
    Rulings,
    Artist,
}

/// The numeric-or-symbolic stat fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatField {
    Power,
    Toughness,
    Loyalty,
    Cmc,
}

impl StatField {
    /// Resolve a bare stat name inside a stat filter, for cross-field
    /// comparisons like `power` matched against `=toughness`.
    pub fn from_word(word: &str) -> Option<StatField> {
        match word.to_ascii_lowercase().as_str() {
            "power" => Some(StatField::Power),
            "toughness" => Some(StatField::Toughness),
            "loyalty" => Some(StatField::Loyalty),
            "cmc" => Some(StatField::Cmc),
            _ => None,
        }
    }
}

/// A leaf test over one card field.
#[derive(Debug, Clone)]
pub enum Match {
    Text {
        field: TextField,
        cmp: Cmp,
        value: String,
    },
    TextRegex {
        field: TextField,
        regex: Regex,
    },
    /// Rarity of any edition (a card matches if any printing does).
    Rarity { cmp: Cmp, rarity: Rarity },
    MultiType { cmp: Cmp, multi: MultiType },
    /// Numeric comparison on the integer part of a stat.
    Stat {
        field: StatField,
        cmp: Cmp,
        number: u32,
    },
    /// Comparison on the symbolic part of a stat (`*`, `1+*`, ...).
    StatSpecial {
        field: StatField,
        cmp: Cmp,
        special: String,
    },
    /// Regex over the numeric part rendered as text, or the symbolic part.
    StatRegex { field: StatField, regex: Regex },
    /// Compare one stat field against another on the same card.
    StatCross {
        field: StatField,
        cmp: Cmp,
        other: StatField,
    },
    Mana {
        cmp: Cmp,
        cost: ManaCost,
        /// CMC guessed from the filter's mana notation.
        cmc: u32,
    },
    /// Set name, set code or block name of any edition.
    BlockSet { cmp: Cmp, value: String },
    BlockSetRegex { regex: Regex },
    /// Card is legal in the given format.
    Format { format: Format },
}

/// A compiled, composable boolean test over a card field.
#[derive(Debug, Clone)]
pub enum Predicate {
    Leaf(Match),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn leaf(m: Match) -> Self {
        Predicate::Leaf(m)
    }

    pub fn and(self, other: Predicate) -> Self {
        Predicate::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Predicate) -> Self {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Predicate::Not(Box::new(self))
    }

    /// Evaluate against one card.
    pub fn matches(&self, card: &Card) -> bool {
        match self {
            Predicate::Leaf(m) => leaf_matches(m, card),
            Predicate::And(a, b) => a.matches(card) && b.matches(card),
            Predicate::Or(a, b) => a.matches(card) || b.matches(card),
            Predicate::Not(inner) => !inner.matches(card),
        }
    }
}

fn leaf_matches(m: &Match, card: &Card) -> bool {
    match m {
        Match::Text { field, cmp, value } => {
            text_values(card, *field).any(|text| text_cmp(text, *cmp, value))
        }
        Match::TextRegex { field, regex } => {
            text_values(card, *field).any(|text| regex.is_match(text))
        }
        Match::Rarity { cmp, rarity } => card.editions.iter().any(|e| match cmp {
            Cmp::Lt => e.rarity.code() < rarity.code(),
            Cmp::Lte => e.rarity.code() <= rarity.code(),
            Cmp::Gt => e.rarity.code() > rarity.code(),
            Cmp::Gte => e.rarity.code() >= rarity.code(),
            _ => e.rarity == *rarity,
        }),
        Match::MultiType { cmp, multi } => match cmp {
            Cmp::Lt => card.multi_type.code() < multi.code(),
            Cmp::Lte => card.multi_type.code() <= multi.code(),
            Cmp::Gt => card.multi_type.code() > multi.code(),
            Cmp::Gte => card.multi_type.code() >= multi.code(),
            _ => card.multi_type == *multi,
        },
        Match::Stat { field, cmp, number } => match stat_of(card, *field).0 {
            Some(value) => number_cmp(value, *cmp, *number),
            None => false,
        },
        Match::StatSpecial { field, cmp, special } => {
            text_cmp(stat_of(card, *field).1, *cmp, special)
        }
        Match::StatRegex { field, regex } => {
            let (value, special) = stat_of(card, *field);
            value.is_some_and(|v| regex.is_match(&v.to_string())) || regex.is_match(special)
        }
        Match::StatCross { field, cmp, other } => {
            match (stat_of(card, *field).0, stat_of(card, *other).0) {
                (Some(a), Some(b)) => number_cmp(a, *cmp, b),
                _ => false,
            }
        }
        Match::Mana { cmp, cost, cmc } => mana_matches(card, *cmp, cost, *cmc),
        Match::BlockSet { cmp, value } => {
            block_set_values(card).any(|text| text_cmp(text, *cmp, value))
        }
        Match::BlockSetRegex { regex } => block_set_values(card).any(|text| regex.is_match(text)),
        Match::Format { format } => card.legalities.get(*format) == Legality::Legal,
    }
}

fn text_values(card: &Card, field: TextField) -> Box<dyn Iterator<Item = &str> + '_> {
    match field {
        TextField::Name => Box::new(std::iter::once(card.name.as_str())),
        TextField::Types => Box::new(std::iter::once(card.types.as_str())),
        TextField::Rules => Box::new(std::iter::once(card.rules.as_str())),
        TextField::Flavour => Box::new(std::iter::once(card.flavour.as_str())),
        TextField::Rulings => Box::new(card.rulings.iter().map(|r| r.text.as_str())),
        TextField::Artist => Box::new(card.editions.iter().map(|e| e.artist.as_str())),
    }
}

fn block_set_values(card: &Card) -> impl Iterator<Item = &str> {
    card.editions.iter().flat_map(|e| {
        [
            e.set.name.as_str(),
            e.set.code.as_str(),
            e.set.block.name.as_str(),
        ]
    })
}

fn text_cmp(text: &str, cmp: Cmp, value: &str) -> bool {
    match cmp {
        Cmp::Equals => text == value,
        Cmp::Contains => text.to_lowercase().contains(&value.to_lowercase()),
        Cmp::ContainsCase => text.contains(value),
        Cmp::Lt => text < value,
        Cmp::Lte => text <= value,
        Cmp::Gt => text > value,
        Cmp::Gte => text >= value,
    }
}

fn number_cmp(left: u32, cmp: Cmp, right: u32) -> bool {
    match cmp {
        Cmp::Lt => left < right,
        Cmp::Lte => left <= right,
        Cmp::Gt => left > right,
        Cmp::Gte => left >= right,
        // Contains has no numeric meaning and degrades to equality.
        Cmp::Equals | Cmp::Contains | Cmp::ContainsCase => left == right,
    }
}

fn stat_of(card: &Card, field: StatField) -> (Option<u32>, &str) {
    match field {
        StatField::Power => (card.power.value, card.power.special.as_str()),
        StatField::Toughness => (card.toughness.value, card.toughness.special.as_str()),
        StatField::Loyalty => (card.loyalty.value, card.loyalty.special.as_str()),
        StatField::Cmc => (card.cmc, ""),
    }
}

/// Mana comparison. Equality requires all seven counts (absent stays
/// distinct from zero) and the special string to match exactly.
/// Ordering operators compare the color counts component-wise (absent
/// as zero) and the card's count of each special token the filter
/// names, both non-strict in the operator's direction; strict
/// operators additionally bound the cost guessed from each notation.
fn mana_matches(card: &Card, cmp: Cmp, cost: &ManaCost, cmc: u32) -> bool {
    match cmp {
        Cmp::Lt | Cmp::Lte | Cmp::Gt | Cmp::Gte => {
            let within = |card_n: u32, filter_n: u32| match cmp {
                Cmp::Lt | Cmp::Lte => card_n <= filter_n,
                _ => card_n >= filter_n,
            };
            let colors_ok = card
                .mana
                .color_counts()
                .iter()
                .zip(cost.color_counts().iter())
                .all(|(c, f)| within(c.unwrap_or(0), f.unwrap_or(0)));
            let card_tokens = tokenize_special(&card.mana.special);
            let tokens_ok = tokenize_special(&cost.special)
                .iter()
                .all(|(token, n)| within(card_tokens.get(token).copied().unwrap_or(0), *n));
            let cmc_ok = match cmp {
                Cmp::Lt => card.mana.guess_cmc() < cmc,
                Cmp::Gt => card.mana.guess_cmc() > cmc,
                _ => true,
            };
            colors_ok && tokens_ok && cmc_ok
        }
        _ => card.mana == *cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mana::ManaCost;
    use crate::models::{
        Block, BlockCategory, CardSet, Edition, Ruling, StatValue,
    };

    fn make_card(name: &str) -> Card {
        Card::new(name)
    }

    fn make_edition(set_code: &str, set_name: &str, block: &str, artist: &str) -> Edition {
        Edition {
            number: 1,
            number_suffix: String::new(),
            rarity: Rarity::Common,
            artist: artist.to_string(),
            set: CardSet::new(
                set_code,
                set_name,
                Block::new(block, BlockCategory::Expansion),
            ),
        }
    }

    #[test]
    fn test_text_cmp_modes() {
        assert!(text_cmp("Sphinx of Uthuun", Cmp::Contains, "sphinx"));
        assert!(!text_cmp("Sphinx of Uthuun", Cmp::ContainsCase, "sphinx"));
        assert!(text_cmp("Sphinx of Uthuun", Cmp::ContainsCase, "Sphinx"));
        assert!(text_cmp("Sphinx", Cmp::Equals, "Sphinx"));
        assert!(!text_cmp("Sphinx", Cmp::Equals, "sphinx"));
        assert!(text_cmp("Prodigal", Cmp::Gte, "Pro"));
        assert!(!text_cmp("Academy", Cmp::Gte, "Pro"));
    }

    #[test]
    fn test_text_leaf_over_rulings() {
        let mut card = make_card("Humility");
        card.rulings.push(Ruling {
            text: "Layers apply.".to_string(),
            date: "2004-10-04".parse().unwrap(),
        });
        let p = Predicate::leaf(Match::Text {
            field: TextField::Rulings,
            cmp: Cmp::Contains,
            value: "layers".to_string(),
        });
        assert!(p.matches(&card));
        assert!(!p.matches(&make_card("Vanilla")));
    }

    #[test]
    fn test_artist_matches_any_edition() {
        let mut card = make_card("Island");
        card.editions.push(make_edition("A", "Alpha", "Core", "Mark Poole"));
        card.editions.push(make_edition("B", "Beta", "Core", "Rob Alexander"));
        let p = Predicate::leaf(Match::Text {
            field: TextField::Artist,
            cmp: Cmp::Contains,
            value: "poole".to_string(),
        });
        assert!(p.matches(&card));
    }

    #[test]
    fn test_stat_leaves() {
        let mut card = make_card("Tarmogoyf");
        card.power = StatValue::parse("*");
        card.toughness = StatValue::parse("3");

        let star = Predicate::leaf(Match::StatSpecial {
            field: StatField::Power,
            cmp: Cmp::Equals,
            special: "*".to_string(),
        });
        assert!(star.matches(&card));

        // No numeric power present, so a numeric comparison never matches.
        let ge3 = Predicate::leaf(Match::Stat {
            field: StatField::Power,
            cmp: Cmp::Gte,
            number: 3,
        });
        assert!(!ge3.matches(&card));

        let tough = Predicate::leaf(Match::Stat {
            field: StatField::Toughness,
            cmp: Cmp::Gte,
            number: 3,
        });
        assert!(tough.matches(&card));
    }

    #[test]
    fn test_stat_regex_covers_number_and_special() {
        let mut card = make_card("Hydra");
        card.power = StatValue::parse("12");
        let p = Predicate::leaf(Match::StatRegex {
            field: StatField::Power,
            regex: Regex::new("^1").unwrap(),
        });
        assert!(p.matches(&card));

        card.power = StatValue::parse("1+*");
        let p = Predicate::leaf(Match::StatRegex {
            field: StatField::Power,
            regex: Regex::new(r"\*$").unwrap(),
        });
        assert!(p.matches(&card));
    }

    #[test]
    fn test_stat_cross_field() {
        let mut card = make_card("Serra Angel");
        card.power = StatValue::parse("4");
        card.toughness = StatValue::parse("4");
        card.cmc = Some(5);

        let same = Predicate::leaf(Match::StatCross {
            field: StatField::Power,
            cmp: Cmp::Equals,
            other: StatField::Toughness,
        });
        assert!(same.matches(&card));

        let cheaper = Predicate::leaf(Match::StatCross {
            field: StatField::Power,
            cmp: Cmp::Lt,
            other: StatField::Cmc,
        });
        assert!(cheaper.matches(&card));
    }

    #[test]
    fn test_mana_equality_distinguishes_specials() {
        let mut card = make_card("A");
        card.set_mana("XX{2/W}{BP}");
        let filter = ManaCost::parse("XX{2/W}{BP}");
        let cmc = filter.guess_cmc();
        let p = Predicate::leaf(Match::Mana {
            cmp: Cmp::Equals,
            cost: filter,
            cmc,
        });
        assert!(p.matches(&card));

        card.set_mana("XX{2/W}{BP}{BP}");
        assert!(!p.matches(&card));
    }

    #[test]
    fn test_mana_superset() {
        let filter = ManaCost::parse("1UB");
        let cmc = filter.guess_cmc();
        let p = Predicate::leaf(Match::Mana {
            cmp: Cmp::Gte,
            cost: filter,
            cmc,
        });

        let mut rainbow = make_card("Rainbow");
        rainbow.set_mana("3WUBRG");
        rainbow.cmc = Some(8);
        assert!(p.matches(&rainbow));

        let mut colorless = make_card("Colorless");
        colorless.set_mana("XX{2/W}{BP}");
        colorless.cmc = Some(5);
        assert!(!p.matches(&colorless));
    }

    #[test]
    fn test_mana_superset_requires_special_tokens() {
        let filter = ManaCost::parse("XX{2/W}{BP}");
        let cmc = filter.guess_cmc();
        let p = Predicate::leaf(Match::Mana {
            cmp: Cmp::Gte,
            cost: filter,
            cmc,
        });

        // High CMC and colors alone do not satisfy the token counts.
        let mut rainbow = make_card("Rainbow");
        rainbow.set_mana("3WUBRG");
        rainbow.cmc = Some(8);
        assert!(!p.matches(&rainbow));

        let mut extra = make_card("Extra");
        extra.set_mana("XX{2/W}{BP}{BP}");
        assert!(p.matches(&extra));

        let mut exact = make_card("Exact");
        exact.set_mana("XX{2/W}{BP}");
        assert!(p.matches(&exact));
    }

    #[test]
    fn test_mana_strict_ordering_uses_guessed_cost() {
        let filter = ManaCost::parse("XX{2/W}{BP}");
        let cmc = filter.guess_cmc();
        let p = Predicate::leaf(Match::Mana {
            cmp: Cmp::Gt,
            cost: filter,
            cmc,
        });

        // Equal notation guesses an equal cost and fails the strict bound.
        let mut exact = make_card("Exact");
        exact.set_mana("XX{2/W}{BP}");
        assert!(!p.matches(&exact));

        let mut extra = make_card("Extra");
        extra.set_mana("XX{2/W}{BP}{BP}");
        assert!(p.matches(&extra));
    }

    #[test]
    fn test_block_set_leaf() {
        let mut card = make_card("Dragon");
        card.editions.push(make_edition("DGM", "Dragon's Maze", "Return to Ravnica", ""));
        let by_code = Predicate::leaf(Match::BlockSet {
            cmp: Cmp::Contains,
            value: "dgm".to_string(),
        });
        let by_block = Predicate::leaf(Match::BlockSet {
            cmp: Cmp::Contains,
            value: "Ravnica".to_string(),
        });
        assert!(by_code.matches(&card));
        assert!(by_block.matches(&card));
    }

    #[test]
    fn test_format_leaf() {
        let mut card = make_card("Lightning Bolt");
        card.legalities.set(Format::Modern, Legality::Legal);
        card.legalities.set(Format::Standard, Legality::Banned);
        let modern = Predicate::leaf(Match::Format { format: Format::Modern });
        let standard = Predicate::leaf(Match::Format { format: Format::Standard });
        assert!(modern.matches(&card));
        assert!(!standard.matches(&card));
    }

    #[test]
    fn test_combinators() {
        let mut card = make_card("Sphinx of Uthuun");
        card.types = "Creature - Sphinx".to_string();

        let name = Predicate::leaf(Match::Text {
            field: TextField::Name,
            cmp: Cmp::Contains,
            value: "Sphinx".to_string(),
        });
        let types = Predicate::leaf(Match::Text {
            field: TextField::Types,
            cmp: Cmp::Contains,
            value: "Dragon".to_string(),
        });

        assert!(name.clone().or(types.clone()).matches(&card));
        assert!(!name.clone().and(types.clone()).matches(&card));
        assert!(name.and(types.not()).matches(&card));
    }
}
