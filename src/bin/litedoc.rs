use clap::{Parser, Subcommand};
use litedoc::cli::{self as prog_cli, Command, OutputMode};
use litedoc::collection::Collection;
use litedoc::config::{self, AppConfig, ConfigOverrides};
use litedoc::utils::logger;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "litedoc", version, about = "Query NDJSON documents with a MongoDB-style language")]
struct Cli {
    /// Config file (default: LITEDOC_CONFIG, then ./litedoc.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// NDJSON file to load; stdin when absent
    #[arg(long)]
    data: Option<PathBuf>,
    #[arg(long)]
    collection: Option<String>,
    #[arg(long)]
    log_level: Option<String>,
    /// Field to index after loading (repeatable)
    #[arg(long = "index")]
    indexes: Vec<String>,
    /// Pretty-print documents instead of one per line
    #[arg(long)]
    pretty: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print matching documents
    Find {
        #[arg(default_value = "{}")]
        filter: String,
        /// Sort spec, e.g. '{"age": -1}'
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        skip: Option<usize>,
        #[arg(long)]
        limit: Option<usize>,
    },
    Count {
        #[arg(default_value = "{}")]
        filter: String,
    },
    /// Run a pipeline given as a JSON array of stages
    Aggregate { pipeline: String },
    /// Apply an update and print the match/modify counts
    Update {
        filter: String,
        update: String,
        #[arg(long)]
        one: bool,
    },
    Delete {
        filter: String,
        #[arg(long)]
        one: bool,
    },
    /// Print every loaded document
    Dump,
}

impl From<Commands> for Command {
    fn from(c: Commands) -> Self {
        match c {
            Commands::Find { filter, sort, skip, limit } => {
                Self::Find { filter_json: filter, sort_json: sort, skip, limit }
            }
            Commands::Count { filter } => Self::Count { filter_json: filter },
            Commands::Aggregate { pipeline } => Self::Aggregate { pipeline_json: pipeline },
            Commands::Update { filter, update, one } => {
                Self::Update { filter_json: filter, update_json: update, one }
            }
            Commands::Delete { filter, one } => Self::Delete { filter_json: filter, one },
            Commands::Dump => Self::Dump,
        }
    }
}

fn setup_logging(cfg: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let level = cfg.log.level.as_deref().unwrap_or("warn");
    match &cfg.log.dir {
        Some(dir) => logger::configure_logging(Some(dir.as_path()), Some(level), cfg.log.retention, cfg.log.dev_trace),
        None => logger::configure_console(level),
    }
}

fn load_collection(cfg: &AppConfig, extra_indexes: &[String]) -> Result<Collection, Box<dyn std::error::Error>> {
    let mut coll = Collection::new(cfg.collection_name());
    // Indexes first so loading maintains them incrementally.
    for field in cfg.indexes.iter().chain(extra_indexes) {
        coll.create_index(field)?;
    }
    match &cfg.data {
        Some(path) => prog_cli::load_ndjson_file(path, &mut coll)?,
        None => prog_cli::load_ndjson(std::io::stdin().lock(), &mut coll)?,
    };
    Ok(coll)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let overrides = ConfigOverrides {
        config: cli.config,
        data: cli.data,
        collection: cli.collection,
        log_level: cli.log_level,
    };
    let cfg = config::load_config(&overrides)?;
    setup_logging(&cfg)?;
    let mut coll = load_collection(&cfg, &cli.indexes)?;
    let mode = if cli.pretty { OutputMode::Pretty } else { OutputMode::Ndjson };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    prog_cli::run_with_format(&mut coll, cli.command.into(), mode, &mut out)?;
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("litedoc: {e}");
            ExitCode::FAILURE
        }
    }
}
