//! Mana notation codec.
//!
//! Parses the compact mana-cost notation used on card pages (`3WUBRG`,
//! `XX{2/W}{BP}`) into a structured [`ManaCost`], renders it back in
//! canonical order and estimates converted mana cost from it.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Special mana symbols: braced hybrid/Phyrexian tokens or runs of `X`.
static SPECIAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{.*?\}|X+").unwrap());

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// A structured mana cost.
///
/// Colors that do not appear in the printed cost are `None`, not zero;
/// an absent color does not participate in comparisons, and round-trips
/// through [`ManaCost::render`] without inventing a count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaCost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub white: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blue: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub black: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub green: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colorless: Option<u32>,
    /// Concatenated special symbols in order of first extraction,
    /// e.g. `"XX{2/W}{BP}"`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub special: String,
}

impl ManaCost {
    /// Parse compact mana notation.
    ///
    /// The input is uppercased, special symbols are extracted first so
    /// they cannot be miscounted as colors, then a generic integer and
    /// per-color letter counts are read from the remainder.
    pub fn parse(text: &str) -> Self {
        let mana = text.trim().to_uppercase();

        let mut special = String::new();
        let mut rest = String::new();
        let mut last = 0;
        for m in SPECIAL_RE.find_iter(&mana) {
            special.push_str(m.as_str());
            rest.push_str(&mana[last..m.start()]);
            last = m.end();
        }
        rest.push_str(&mana[last..]);

        let generic = NUMBER_RE
            .find(&rest)
            .and_then(|m| m.as_str().parse().ok());

        let count = |letter: char| -> Option<u32> {
            let n = rest.chars().filter(|&c| c == letter).count() as u32;
            if n == 0 { None } else { Some(n) }
        };

        Self {
            generic,
            white: count('W'),
            blue: count('U'),
            black: count('B'),
            red: count('R'),
            green: count('G'),
            colorless: count('C'),
            special,
        }
    }

    /// Render in canonical order: generic count, then W, B, U, R, G, C
    /// letters repeated by count, then the special symbols verbatim.
    ///
    /// Not byte-preserving for arbitrary input, but idempotent:
    /// `render(parse(render(m))) == render(m)`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(n) = self.generic
            && n != 0
        {
            out.push_str(&n.to_string());
        }
        let letters = [
            (self.white, 'W'),
            (self.black, 'B'),
            (self.blue, 'U'),
            (self.red, 'R'),
            (self.green, 'G'),
            (self.colorless, 'C'),
        ];
        for (count, letter) in letters {
            for _ in 0..count.unwrap_or(0) {
                out.push(letter);
            }
        }
        out.push_str(&self.special);
        out
    }

    /// The seven counts in canonical compare order
    /// (generic, W, U, B, R, G, C).
    pub fn color_counts(&self) -> [Option<u32>; 7] {
        [
            self.generic,
            self.white,
            self.blue,
            self.black,
            self.red,
            self.green,
            self.colorless,
        ]
    }

    /// Estimate converted mana cost: the sum of the seven counts plus
    /// the contribution of each special symbol (`X` counts as zero, a
    /// symbol with an embedded number counts as that number, anything
    /// else counts as one).
    pub fn guess_cmc(&self) -> u32 {
        let colors: u32 = self
            .color_counts()
            .iter()
            .map(|c| c.unwrap_or(0))
            .sum();
        let specials: u32 = tokenize_special(&self.special)
            .iter()
            .map(|(token, count)| special_token_value(token) * count)
            .sum();
        colors + specials
    }

    pub fn is_empty(&self) -> bool {
        self.color_counts().iter().all(Option::is_none) && self.special.is_empty()
    }
}

/// CMC contribution of a single special symbol occurrence.
fn special_token_value(token: &str) -> u32 {
    if token == "X" {
        return 0;
    }
    match NUMBER_RE.find(token) {
        Some(m) => m.as_str().parse().unwrap_or(1),
        None => 1,
    }
}

/// Count special symbols left to right, matching runs of identical `X`
/// or `{...}` tokens. An unmatched remainder is dropped, never an error
/// (known soft failure for malformed trailing input).
pub fn tokenize_special(special: &str) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    let mut i = 0;
    while i < special.len() {
        let rest = &special[i..];
        if rest.starts_with('X') {
            let run = rest.find(|c| c != 'X').unwrap_or(rest.len());
            *counts.entry("X".to_string()).or_insert(0) += run as u32;
            i += run;
        } else if rest.starts_with('{') {
            let Some(end) = rest.find('}') else { break };
            let token = &rest[..=end];
            let mut run = 0u32;
            while special[i..].starts_with(token) {
                run += 1;
                i += token.len();
            }
            *counts.entry(token.to_string()).or_insert(0) += run;
        } else {
            break;
        }
    }
    counts
}
