mod repl;

use anyhow::{bail, Context, Result};
use blissword_core::{AlphabetMode, Config, EditSession, SymbolEngine, SymbolExpr, SymbolRole};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blissword", about = "Compose, encode and decompose Blissymbolics words")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the symbol dictionary location
    #[arg(long, global = true)]
    dictionary: Option<PathBuf>,

    /// Override the identifier mapping location
    #[arg(long, global = true)]
    mapping: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Alphabet {
    Blissary,
    Numeric,
}

impl From<Alphabet> for AlphabetMode {
    fn from(a: Alphabet) -> Self {
        match a {
            Alphabet::Blissary => AlphabetMode::Blissary,
            Alphabet::Numeric => AlphabetMode::Numeric,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Encode a symbol (JSON array or single identifier) as a builder string
    Encode {
        symbol: String,
        #[arg(long, value_enum)]
        alphabet: Option<Alphabet>,
    },
    /// Decode a builder string into a JSON symbol array
    Decode {
        text: String,
        #[arg(long, value_enum)]
        alphabet: Option<Alphabet>,
    },
    /// Expand a symbol into elementary identifiers
    Decompose { symbol: String },
    /// Report whether identifiers are indicators, modifiers or plain symbols
    Classify { ids: Vec<u32> },
    /// Interactive caret editing session
    Edit,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // roles are built in, no tables needed
    if let Command::Classify { ids } = &cli.command {
        print_roles(ids);
        return Ok(());
    }

    let engine = load_engine(&cli)?;
    run(cli.command, engine)
}

fn run(command: Command, engine: SymbolEngine) -> Result<()> {
    let default_alphabet = engine.config().default_alphabet;
    match command {
        Command::Encode { symbol, alphabet } => {
            let expr = parse_symbol(&symbol)?;
            let mode = alphabet.map_or(default_alphabet, AlphabetMode::from);
            println!("{}", engine.codec().encode_as(&expr, mode)?);
        }
        Command::Decode { text, alphabet } => {
            let mode = alphabet.map_or(default_alphabet, AlphabetMode::from);
            let expr = engine
                .codec()
                .try_decode(&text, mode)
                .with_context(|| format!("cannot decode {:?}", text))?;
            println!("{}", serde_json::to_string(&expr)?);
        }
        Command::Decompose { symbol } => {
            let expr = parse_symbol(&symbol)?;
            match engine.decompose(&expr)? {
                Some(expanded) => println!("{}", serde_json::to_string(&expanded)?),
                None => bail!("{} contains identifiers missing from the dictionary", expr),
            }
        }
        Command::Classify { ids } => print_roles(&ids),
        Command::Edit => repl::run(EditSession::new(engine))?,
    }
    Ok(())
}

fn print_roles(ids: &[u32]) {
    for id in ids {
        let role = match blissword_core::roles::classify(*id) {
            SymbolRole::Indicator => "indicator",
            SymbolRole::Modifier => "modifier",
            SymbolRole::Plain => "plain",
        };
        println!("{}\t{}", id, role);
    }
}

fn load_engine(cli: &Cli) -> Result<SymbolEngine> {
    let mut config = match &cli.config {
        Some(path) => Config::load_toml(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(path) = &cli.dictionary {
        config.dictionary_path = Some(path.clone());
        config.dictionary_url = None;
    }
    if let Some(path) = &cli.mapping {
        config.mapping_path = Some(path.clone());
        config.mapping_url = None;
    }
    SymbolEngine::load(config).context("failed to load symbol tables")
}

/// A symbol on the command line: a bare identifier or a JSON array.
fn parse_symbol(arg: &str) -> Result<SymbolExpr> {
    let arg = arg.trim();
    if let Ok(id) = arg.parse::<u32>() {
        return Ok(SymbolExpr::Single(id));
    }
    serde_json::from_str(arg).with_context(|| format!("not a symbol: {}", arg))
}
