use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cardbase_core::filter::{apply_filters, FilterField};
use cardbase_core::{corpus, AppConfig};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "cardbase",
    about = "Filter a card corpus with per-field query expressions",
    version,
    long_about = None
)]
struct Cli {
    /// Card data file (JSON). Defaults to the configured corpus path.
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Output in JSON format (for scripts).
    /// Also enabled by setting CARDBASE_JSON=1.
    #[arg(long)]
    json: bool,

    /// Maximum number of cards to print. Defaults to the configured
    /// page size; 0 means no limit.
    #[arg(long)]
    limit: Option<usize>,

    #[command(flatten)]
    filters: FilterArgs,
}

/// One optional expression per filterable field.
#[derive(clap::Args)]
struct FilterArgs {
    /// Card name, e.g. 'Sphinx & ~"of the"'.
    #[arg(long)]
    name: Option<String>,

    /// Type line.
    #[arg(long)]
    types: Option<String>,

    /// Rules text and rulings.
    #[arg(long)]
    rules: Option<String>,

    /// Flavour text.
    #[arg(long)]
    flavour: Option<String>,

    /// Mana notation, e.g. '>=1UB' or '=XX{2/W}{BP}'.
    #[arg(long)]
    mana: Option<String>,

    /// Power, e.g. '>=3' or '*'.
    #[arg(long)]
    power: Option<String>,

    /// Toughness.
    #[arg(long)]
    toughness: Option<String>,

    /// Loyalty.
    #[arg(long)]
    loyalty: Option<String>,

    /// Converted mana cost.
    #[arg(long)]
    cmc: Option<String>,

    /// Artist of any printing.
    #[arg(long)]
    artist: Option<String>,

    /// Rarity letter or name, e.g. '=Uncommon & =Rare'.
    #[arg(long)]
    rarity: Option<String>,

    /// Format the card is legal in, e.g. 'modern | legacy'.
    #[arg(long)]
    format: Option<String>,

    /// Multi-part type: split or flip.
    #[arg(long = "multi-type")]
    multi_type: Option<String>,

    /// Set name, set code or block name of any printing.
    #[arg(long = "blocks-sets")]
    blocks_sets: Option<String>,
}

impl FilterArgs {
    fn get(&self, field: FilterField) -> Option<String> {
        match field {
            FilterField::Name => self.name.clone(),
            FilterField::Types => self.types.clone(),
            FilterField::Rules => self.rules.clone(),
            FilterField::Flavour => self.flavour.clone(),
            FilterField::Mana => self.mana.clone(),
            FilterField::Power => self.power.clone(),
            FilterField::Toughness => self.toughness.clone(),
            FilterField::Loyalty => self.loyalty.clone(),
            FilterField::Cmc => self.cmc.clone(),
            FilterField::Artist => self.artist.clone(),
            FilterField::Rarity => self.rarity.clone(),
            FilterField::Format => self.format.clone(),
            FilterField::MultiType => self.multi_type.clone(),
            FilterField::BlocksSets => self.blocks_sets.clone(),
        }
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // ── Env var overrides ──────────────────────────────────────────────────
    let json_output = cli.json || std::env::var("CARDBASE_JSON").as_deref() == Ok("1");

    let config = AppConfig::load()?;
    let corpus_path = cli.corpus.unwrap_or_else(|| config.corpus_path());
    let cards = corpus::load_cards(&corpus_path)?;

    let outcome = apply_filters(&cards, |field| cli.filters.get(field));

    for (field, issue) in outcome.issues() {
        eprintln!("{field}: {issue}");
    }

    let limit = match cli.limit.unwrap_or(config.output.page_size) {
        0 => outcome.cards.len(),
        n => n,
    };
    let shown = &outcome.cards[..outcome.cards.len().min(limit)];

    if json_output || config.output.json {
        let payload = serde_json::json!({
            "total": outcome.cards.len(),
            "cards": shown,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else if outcome.cards.is_empty() {
        println!("No cards match.");
    } else {
        for card in shown {
            let mut line = card.name.clone();
            let mana = card.mana_display();
            if !mana.is_empty() {
                line.push_str(&format!("  [{mana}]"));
            }
            let ptl = card.ptl_display();
            if !ptl.is_empty() {
                line.push_str(&format!("  {ptl}"));
            }
            println!("{line}");
        }
        if outcome.cards.len() > shown.len() {
            println!("... and {} more", outcome.cards.len() - shown.len());
        }
    }

    Ok(())
}
