//! cardbase-core: card data model, mana notation codec and the
//! filter-expression engine.

pub mod config;
pub mod corpus;
pub mod error;
pub mod filter;
pub mod mana;
pub mod models;

pub use config::AppConfig;
pub use error::{CardbaseError, Result};
pub use filter::{apply_filters, FilterField, FilterIssue, FilterOutcome};
pub use mana::ManaCost;
pub use models::{Card, Collection, Edition, Rarity};
