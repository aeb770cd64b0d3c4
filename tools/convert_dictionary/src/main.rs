use anyhow::{Context, Result};
use blissword_core::{IdentifierMap, SymbolDictionary};
use clap::Parser;
use std::path::PathBuf;

/// Convert the JSON symbol dictionary into a bincode snapshot that loads
/// without JSON parsing.
#[derive(Parser)]
struct Args {
    /// Input dictionary JSON (identifier -> entry)
    #[arg(long)]
    input: PathBuf,

    /// Output snapshot path
    #[arg(long, default_value = "symbol_dictionary.bin")]
    out: PathBuf,

    /// Mapping table to check the dictionary against
    #[arg(long)]
    mapping: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let dict = SymbolDictionary::load_json(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let composites = dict
        .ids()
        .into_iter()
        .filter(|id| dict.get(*id).is_some_and(|e| e.expansion().is_some()))
        .count();
    println!("Read {} entries ({} composite)", dict.len(), composites);

    if let Some(path) = &args.mapping {
        let mapping = IdentifierMap::load_json(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let unmapped: Vec<u32> = dict
            .ids()
            .into_iter()
            .filter(|id| mapping.spelling_of(*id).is_none())
            .collect();
        if !unmapped.is_empty() {
            println!("⚠ {} entries have no builder spelling:", unmapped.len());
            for id in unmapped.iter().take(20) {
                println!("  {}", id);
            }
        }
    }

    dict.save_bincode(&args.out)
        .with_context(|| format!("failed to write {}", args.out.display()))?;

    // read back to be sure the snapshot is usable
    let check = SymbolDictionary::load_bincode(&args.out)?;
    anyhow::ensure!(check.len() == dict.len(), "snapshot lost entries");

    println!("Wrote snapshot to {}", args.out.display());
    Ok(())
}
