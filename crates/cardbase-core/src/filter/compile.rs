//! Token tree to predicate compilation.
//!
//! Each filter field owns an [`AtomBuilder`] that knows how to turn a
//! single atom (word, quoted literal or regex literal, plus an
//! optional comparison operator) into a predicate leaf. The shared
//! [`compile`] walk handles negation parity, nesting and the
//! left-to-right binary fold; the builders only decide what a leaf
//! means for their field.

use regex::Regex;

use crate::mana::ManaCost;
use crate::models::{Format, MultiType, Rarity};

use super::predicate::{Cmp, Match, Predicate, StatField, TextField};
use super::token::{AtomValue, BinaryOp, Group, GroupItem, TokenTree, UnaryOp};

/// A non-fatal problem found while compiling one field's expression.
/// The field is skipped but other fields still apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileIssue {
    /// The expression parsed but part of it makes no sense for the
    /// field, e.g. a regex literal against a choice field.
    Warning(String),
    /// The expression could not be turned into a runnable predicate,
    /// e.g. a user regex that fails to compile.
    Apply(String),
}

pub type CompileResult = std::result::Result<Predicate, CompileIssue>;

/// Turns one atom into a predicate for a specific field.
pub trait AtomBuilder {
    /// Comparison used when the atom carries no explicit operator.
    fn default_cmp(&self, value: &AtomValue) -> Cmp;

    fn build(&self, cmp: Cmp, value: &AtomValue) -> CompileResult;
}

fn cmp_for(op: Option<UnaryOp>, builder: &dyn AtomBuilder, value: &AtomValue) -> Cmp {
    match op {
        Some(UnaryOp::Lt) => Cmp::Lt,
        Some(UnaryOp::Lte) => Cmp::Lte,
        Some(UnaryOp::Gt) => Cmp::Gt,
        Some(UnaryOp::Gte) => Cmp::Gte,
        Some(UnaryOp::Eq) => Cmp::Equals,
        None => builder.default_cmp(value),
    }
}

fn compile_regex(pattern: &str) -> Result<Regex, CompileIssue> {
    Regex::new(pattern).map_err(|err| CompileIssue::Apply(format!("invalid regex: {err}")))
}

/// Compile a parsed tree into a single predicate. `default_binop`
/// joins adjacent groups that carry no explicit connector.
pub fn compile(
    tree: &TokenTree,
    builder: &dyn AtomBuilder,
    default_binop: BinaryOp,
) -> CompileResult {
    let mut result: Option<Predicate> = None;
    let mut pending: Option<BinaryOp> = None;

    for group in &tree.groups {
        let mut p = compile_group(group, builder, default_binop)?;
        if group.negations % 2 == 1 {
            p = p.not();
        }
        result = Some(match result {
            None => p,
            Some(acc) => match pending.unwrap_or(default_binop) {
                BinaryOp::And => acc.and(p),
                BinaryOp::Or => acc.or(p),
            },
        });
        pending = group.binop;
    }

    result.ok_or_else(|| CompileIssue::Warning("empty expression".to_string()))
}

fn compile_group(
    group: &Group,
    builder: &dyn AtomBuilder,
    default_binop: BinaryOp,
) -> CompileResult {
    match &group.item {
        GroupItem::Atom { op, value } => {
            let cmp = cmp_for(*op, builder, value);
            builder.build(cmp, value)
        }
        GroupItem::Nested(subtree) => compile(subtree, builder, default_binop),
    }
}

// ─── Field builders ──────────────────────────────────────────────────

/// Free-text fields. Bare words match case-insensitively, quoted
/// literals case-sensitively, regex literals as regexes.
pub struct TextBuilder(pub TextField);

impl AtomBuilder for TextBuilder {
    fn default_cmp(&self, value: &AtomValue) -> Cmp {
        match value {
            AtomValue::Literal(_) => Cmp::ContainsCase,
            _ => Cmp::Contains,
        }
    }

    fn build(&self, cmp: Cmp, value: &AtomValue) -> CompileResult {
        match value {
            AtomValue::Word(text) | AtomValue::Literal(text) => {
                Ok(Predicate::leaf(Match::Text {
                    field: self.0,
                    cmp,
                    value: text.clone(),
                }))
            }
            AtomValue::Regex(pattern) => Ok(Predicate::leaf(Match::TextRegex {
                field: self.0,
                regex: compile_regex(pattern)?,
            })),
        }
    }
}

/// Rules text plus the text of any ruling, OR-combined per atom.
pub struct RulesBuilder;

impl AtomBuilder for RulesBuilder {
    fn default_cmp(&self, value: &AtomValue) -> Cmp {
        TextBuilder(TextField::Rules).default_cmp(value)
    }

    fn build(&self, cmp: Cmp, value: &AtomValue) -> CompileResult {
        let rules = TextBuilder(TextField::Rules).build(cmp, value)?;
        let rulings = TextBuilder(TextField::Rulings).build(cmp, value)?;
        Ok(rules.or(rulings))
    }
}

pub struct RarityBuilder;

impl AtomBuilder for RarityBuilder {
    fn default_cmp(&self, _value: &AtomValue) -> Cmp {
        Cmp::Equals
    }

    fn build(&self, cmp: Cmp, value: &AtomValue) -> CompileResult {
        let word = choice_word(value, "rarity")?;
        match Rarity::from_word(word) {
            Some(rarity) => Ok(Predicate::leaf(Match::Rarity { cmp, rarity })),
            None => Err(CompileIssue::Warning(format!("unknown rarity '{word}'"))),
        }
    }
}

pub struct MultiTypeBuilder;

impl AtomBuilder for MultiTypeBuilder {
    fn default_cmp(&self, _value: &AtomValue) -> Cmp {
        Cmp::Equals
    }

    fn build(&self, cmp: Cmp, value: &AtomValue) -> CompileResult {
        let word = choice_word(value, "multi-part type")?;
        match MultiType::from_word(word) {
            Some(multi) => Ok(Predicate::leaf(Match::MultiType { cmp, multi })),
            None => Err(CompileIssue::Warning(format!(
                "unknown multi-part type '{word}'"
            ))),
        }
    }
}

pub struct FormatBuilder;

impl AtomBuilder for FormatBuilder {
    fn default_cmp(&self, _value: &AtomValue) -> Cmp {
        Cmp::Equals
    }

    fn build(&self, _cmp: Cmp, value: &AtomValue) -> CompileResult {
        let word = choice_word(value, "format")?;
        match Format::from_word(word) {
            Some(format) => Ok(Predicate::leaf(Match::Format { format })),
            None => Err(CompileIssue::Warning(format!("unknown format '{word}'"))),
        }
    }
}

/// Numeric stats. Words and quoted literals that parse as integers
/// compare numerically, stat names compare against the card's own
/// other stat, anything else compares against the symbolic part.
pub struct StatBuilder(pub StatField);

impl AtomBuilder for StatBuilder {
    fn default_cmp(&self, _value: &AtomValue) -> Cmp {
        Cmp::Equals
    }

    fn build(&self, cmp: Cmp, value: &AtomValue) -> CompileResult {
        match value {
            AtomValue::Word(word) => {
                if let Ok(number) = word.parse::<u32>() {
                    return Ok(Predicate::leaf(Match::Stat {
                        field: self.0,
                        cmp,
                        number,
                    }));
                }
                if let Some(other) = StatField::from_word(word) {
                    return Ok(Predicate::leaf(Match::StatCross {
                        field: self.0,
                        cmp,
                        other,
                    }));
                }
                Ok(Predicate::leaf(Match::StatSpecial {
                    field: self.0,
                    cmp,
                    special: word.clone(),
                }))
            }
            AtomValue::Literal(text) => {
                if let Ok(number) = text.parse::<u32>() {
                    return Ok(Predicate::leaf(Match::Stat {
                        field: self.0,
                        cmp,
                        number,
                    }));
                }
                Ok(Predicate::leaf(Match::StatSpecial {
                    field: self.0,
                    cmp,
                    special: text.clone(),
                }))
            }
            AtomValue::Regex(pattern) => Ok(Predicate::leaf(Match::StatRegex {
                field: self.0,
                regex: compile_regex(pattern)?,
            })),
        }
    }
}

/// Mana notation. Each word is parsed with the regular mana codec and
/// compared structurally.
pub struct ManaBuilder;

impl AtomBuilder for ManaBuilder {
    fn default_cmp(&self, _value: &AtomValue) -> Cmp {
        Cmp::Equals
    }

    fn build(&self, cmp: Cmp, value: &AtomValue) -> CompileResult {
        match value {
            AtomValue::Word(word) => {
                let cost = ManaCost::parse(word);
                let cmc = cost.guess_cmc();
                Ok(Predicate::leaf(Match::Mana { cmp, cost, cmc }))
            }
            AtomValue::Literal(_) | AtomValue::Regex(_) => Err(CompileIssue::Warning(
                "mana filters take plain notation, not quoted or regex values".to_string(),
            )),
        }
    }
}

/// Set names, set codes and block names of any printing.
pub struct BlockSetBuilder;

impl AtomBuilder for BlockSetBuilder {
    fn default_cmp(&self, value: &AtomValue) -> Cmp {
        match value {
            AtomValue::Literal(_) => Cmp::ContainsCase,
            _ => Cmp::Contains,
        }
    }

    fn build(&self, cmp: Cmp, value: &AtomValue) -> CompileResult {
        match value {
            AtomValue::Word(text) | AtomValue::Literal(text) => {
                Ok(Predicate::leaf(Match::BlockSet {
                    cmp,
                    value: text.clone(),
                }))
            }
            AtomValue::Regex(pattern) => Ok(Predicate::leaf(Match::BlockSetRegex {
                regex: compile_regex(pattern)?,
            })),
        }
    }
}

fn choice_word<'a>(value: &'a AtomValue, what: &str) -> Result<&'a str, CompileIssue> {
    match value {
        AtomValue::Word(word) => Ok(word),
        AtomValue::Literal(_) => Err(CompileIssue::Warning(format!(
            "quoted values are not supported for {what} filters"
        ))),
        AtomValue::Regex(_) => Err(CompileIssue::Warning(format!(
            "regex values are not supported for {what} filters"
        ))),
    }
}

/// Rarity expressions compile to a sequence of stages applied one
/// after another. Consecutive OR-joined groups fold into one stage; an
/// AND connector closes the stage, so `=Uncommon & =Rare` narrows to
/// cards printed at both rarities. Stage order follows the expression.
pub fn compile_rarity_stages(tree: &TokenTree) -> Result<Vec<Predicate>, CompileIssue> {
    let builder = RarityBuilder;
    let mut stages = Vec::new();
    let mut current: Option<Predicate> = None;

    for group in &tree.groups {
        let mut p = compile_group(group, &builder, BinaryOp::Or)?;
        if group.negations % 2 == 1 {
            p = p.not();
        }
        current = Some(match current {
            None => p,
            Some(acc) => acc.or(p),
        });
        if group.binop == Some(BinaryOp::And)
            && let Some(stage) = current.take()
        {
            stages.push(stage);
        }
    }
    if let Some(stage) = current {
        stages.push(stage);
    }

    if stages.is_empty() {
        return Err(CompileIssue::Warning("empty expression".to_string()));
    }
    Ok(stages)
}
