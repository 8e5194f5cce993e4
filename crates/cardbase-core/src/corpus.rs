//! JSON persistence for the card corpus.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{CardbaseError, Result};
use crate::models::Card;

/// Load the whole corpus from a JSON file. A missing file is an empty
/// corpus, not an error.
pub fn load_cards(path: &Path) -> Result<Vec<Card>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path)?;
    let cards: Vec<Card> = serde_json::from_str(&contents)?;
    debug!(count = cards.len(), path = %path.display(), "corpus loaded");
    Ok(cards)
}

/// Save the whole corpus to a JSON file, creating parent directories.
pub fn save_cards(path: &Path, cards: &[Card]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(cards)?;
    fs::write(path, json)?;
    Ok(())
}

/// Look up a card by exact name.
pub fn find_card<'a>(cards: &'a [Card], name: &str) -> Result<&'a Card> {
    cards
        .iter()
        .find(|card| card.name == name)
        .ok_or_else(|| CardbaseError::CardNotFound(name.to_string()))
}
