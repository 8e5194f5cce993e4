use serde::{Deserialize, Serialize};

use crate::error::{CardbaseError, Result};
use crate::models::card::Card;
use crate::models::edition::Edition;

/// Copies of one specific printing held in a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub set_code: String,
    pub number: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub number_suffix: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub foil_count: u32,
}

impl CollectionEntry {
    fn matches_edition(&self, edition: &Edition) -> bool {
        self.set_code == edition.set.code
            && self.number == edition.number
            && self.number_suffix == edition.number_suffix
    }
}

/// A named, shareable collection of card printings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<CollectionEntry>,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Add copies of a printing, merging with an existing entry for the
    /// same printing.
    pub fn add_entry(&mut self, entry: CollectionEntry) {
        if let Some(existing) = self.entries.iter_mut().find(|e| {
            e.set_code == entry.set_code
                && e.number == entry.number
                && e.number_suffix == entry.number_suffix
        }) {
            existing.count += entry.count;
            existing.foil_count += entry.foil_count;
        } else {
            self.entries.push(entry);
        }
    }

    /// Import entries from plain text: one entry per line with count,
    /// foiled count, collector number (suffix allowed) and set code,
    /// separated by whitespace. Blank lines are skipped.
    pub fn import_text(&mut self, text: &str) -> Result<()> {
        for line in text.lines() {
            let columns: Vec<&str> = line.split_whitespace().collect();
            if columns.is_empty() {
                continue;
            }
            let [count, foil_count, number, set_code] = columns[..] else {
                return Err(CardbaseError::InvalidCollectionEntry(line.to_string()));
            };
            let count = count
                .parse()
                .map_err(|_| CardbaseError::InvalidCollectionEntry(line.to_string()))?;
            let foil_count = foil_count
                .parse()
                .map_err(|_| CardbaseError::InvalidCollectionEntry(line.to_string()))?;
            let (number, number_suffix) = Edition::parse_number(number)
                .map_err(|_| CardbaseError::InvalidCollectionEntry(line.to_string()))?;
            self.add_entry(CollectionEntry {
                set_code: set_code.to_uppercase(),
                number,
                number_suffix,
                count,
                foil_count,
            });
        }
        Ok(())
    }

    /// Export as plain text in the same format `import_text` reads.
    pub fn export_text(&self) -> String {
        let lines: Vec<String> = self
            .entries
            .iter()
            .map(|e| {
                format!(
                    "{} {} {}{} {}",
                    e.count, e.foil_count, e.number, e.number_suffix, e.set_code
                )
            })
            .collect();
        lines.join("\n")
    }

    /// Total (count, foil count) of a card across all of its editions.
    pub fn count_of(&self, card: &Card) -> (u32, u32) {
        let mut count = 0;
        let mut foil_count = 0;
        for entry in &self.entries {
            if card.editions.iter().any(|e| entry.matches_edition(e)) {
                count += entry.count;
                foil_count += entry.foil_count;
            }
        }
        (count, foil_count)
    }
}
