//! The card filter pipeline.
//!
//! Takes one optional expression per filter field, applies them in a
//! fixed order and reports a per-field status. A broken expression
//! never aborts the run: the field is skipped, its problem recorded,
//! and the remaining fields still narrow the result.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use tracing::{debug, warn};

use crate::models::Card;

use super::compile::{
    self, AtomBuilder, BlockSetBuilder, CompileIssue, FormatBuilder, ManaBuilder,
    MultiTypeBuilder, RarityBuilder, RulesBuilder, StatBuilder, TextBuilder,
};
use super::predicate::{StatField, TextField};
use super::token::{self, BinaryOp};

/// The filterable fields, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterField {
    Name,
    Types,
    Rules,
    Flavour,
    Mana,
    Power,
    Toughness,
    Loyalty,
    Cmc,
    Artist,
    Rarity,
    Format,
    MultiType,
    BlocksSets,
}

impl FilterField {
    pub const ALL: [FilterField; 14] = [
        FilterField::Name,
        FilterField::Types,
        FilterField::Rules,
        FilterField::Flavour,
        FilterField::Mana,
        FilterField::Power,
        FilterField::Toughness,
        FilterField::Loyalty,
        FilterField::Cmc,
        FilterField::Artist,
        FilterField::Rarity,
        FilterField::Format,
        FilterField::MultiType,
        FilterField::BlocksSets,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterField::Name => "name",
            FilterField::Types => "types",
            FilterField::Rules => "rules",
            FilterField::Flavour => "flavour",
            FilterField::Mana => "mana",
            FilterField::Power => "power",
            FilterField::Toughness => "toughness",
            FilterField::Loyalty => "loyalty",
            FilterField::Cmc => "cmc",
            FilterField::Artist => "artist",
            FilterField::Rarity => "rarity",
            FilterField::Format => "format",
            FilterField::MultiType => "multi-type",
            FilterField::BlocksSets => "blocks-sets",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field's expression was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterIssue {
    /// The expression did not parse.
    Syntax(String),
    Warning(String),
    Apply(String),
}

impl FilterIssue {
    pub fn code(&self) -> &'static str {
        match self {
            FilterIssue::Syntax(_) => "syntax",
            FilterIssue::Warning(_) => "warning",
            FilterIssue::Apply(_) => "apply",
        }
    }
}

impl fmt::Display for FilterIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterIssue::Syntax(msg) | FilterIssue::Warning(msg) | FilterIssue::Apply(msg) => {
                write!(f, "{}: {msg}", self.code())
            }
        }
    }
}

impl From<CompileIssue> for FilterIssue {
    fn from(issue: CompileIssue) -> Self {
        match issue {
            CompileIssue::Warning(msg) => FilterIssue::Warning(msg),
            CompileIssue::Apply(msg) => FilterIssue::Apply(msg),
        }
    }
}

/// The filtered cards plus what happened to each field's expression.
#[derive(Debug)]
pub struct FilterOutcome<'a> {
    pub cards: Vec<&'a Card>,
    /// One entry per field in [`FilterField::ALL`]; `None` means the
    /// field had no expression or applied cleanly.
    pub status: BTreeMap<FilterField, Option<FilterIssue>>,
}

impl FilterOutcome<'_> {
    /// Fields whose expressions were skipped, with the reason.
    pub fn issues(&self) -> impl Iterator<Item = (FilterField, &FilterIssue)> {
        self.status
            .iter()
            .filter_map(|(field, issue)| issue.as_ref().map(|i| (*field, i)))
    }
}

fn builder_for(field: FilterField) -> (Box<dyn AtomBuilder>, BinaryOp) {
    match field {
        FilterField::Name => (Box::new(TextBuilder(TextField::Name)), BinaryOp::And),
        FilterField::Types => (Box::new(TextBuilder(TextField::Types)), BinaryOp::And),
        FilterField::Rules => (Box::new(RulesBuilder), BinaryOp::And),
        FilterField::Flavour => (Box::new(TextBuilder(TextField::Flavour)), BinaryOp::And),
        FilterField::Artist => (Box::new(TextBuilder(TextField::Artist)), BinaryOp::And),
        FilterField::Mana => (Box::new(ManaBuilder), BinaryOp::And),
        FilterField::Power => (Box::new(StatBuilder(StatField::Power)), BinaryOp::And),
        FilterField::Toughness => (Box::new(StatBuilder(StatField::Toughness)), BinaryOp::And),
        FilterField::Loyalty => (Box::new(StatBuilder(StatField::Loyalty)), BinaryOp::And),
        FilterField::Cmc => (Box::new(StatBuilder(StatField::Cmc)), BinaryOp::And),
        FilterField::Rarity => (Box::new(RarityBuilder), BinaryOp::Or),
        FilterField::Format => (Box::new(FormatBuilder), BinaryOp::Or),
        FilterField::MultiType => (Box::new(MultiTypeBuilder), BinaryOp::Or),
        FilterField::BlocksSets => (Box::new(BlockSetBuilder), BinaryOp::Or),
    }
}

/// Apply every given field expression to the corpus, in field order.
/// Duplicate names are dropped, keeping the first occurrence.
pub fn apply_filters<'a, F>(cards: &'a [Card], expression_for: F) -> FilterOutcome<'a>
where
    F: Fn(FilterField) -> Option<String>,
{
    let mut seen = HashSet::new();
    let mut result: Vec<&Card> = cards
        .iter()
        .filter(|card| seen.insert(card.name.clone()))
        .collect();
    let mut status: BTreeMap<FilterField, Option<FilterIssue>> = BTreeMap::new();

    for field in FilterField::ALL {
        let Some(expression) = expression_for(field) else {
            status.insert(field, None);
            continue;
        };
        let expression = expression.trim().to_string();
        if expression.is_empty() {
            status.insert(field, None);
            continue;
        }

        let issue = apply_field(&mut result, field, &expression);
        match &issue {
            None => debug!(field = %field, %expression, remaining = result.len(), "filter applied"),
            Some(issue) => warn!(field = %field, %expression, %issue, "filter skipped"),
        }
        status.insert(field, issue);
    }

    FilterOutcome {
        cards: result,
        status,
    }
}

fn apply_field(result: &mut Vec<&Card>, field: FilterField, expression: &str) -> Option<FilterIssue> {
    let tree = match token::parse(expression) {
        Ok(tree) => tree,
        Err(err) => return Some(FilterIssue::Syntax(err.to_string())),
    };

    if field == FilterField::Rarity {
        // Rarity stages narrow one after another and are never reordered.
        let stages = match compile::compile_rarity_stages(&tree) {
            Ok(stages) => stages,
            Err(issue) => return Some(issue.into()),
        };
        for stage in stages {
            result.retain(|card| stage.matches(card));
        }
        return None;
    }

    let (builder, default_binop) = builder_for(field);
    match compile::compile(&tree, builder.as_ref(), default_binop) {
        Ok(predicate) => {
            result.retain(|card| predicate.matches(card));
            None
        }
        Err(issue) => Some(issue.into()),
    }
}
