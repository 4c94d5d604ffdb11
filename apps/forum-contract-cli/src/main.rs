mod config;

use std::fs;
use std::io::{self, Read as _};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use forum_contracts::{parse_json, ContractKind, PageItemKind, RejectPolicy};
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

use config::{resolve_config, CliConfig};

#[derive(Parser)]
#[command(
    name = "forum-contract",
    version,
    about = "Validate forum API payloads against their contracts"
)]
struct Cli {
    /// TOML config file (falls back to $FORUM_CONTRACT_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every contract name
    Kinds,
    /// Validate a JSON payload against a contract
    Validate(ValidateArgs),
    /// Print the JSON Schema of a contract
    Schema(SchemaArgs),
    /// Validate a paginated response, applying a rejection policy to its items
    Page(PageArgs),
}

#[derive(Args)]
struct ValidateArgs {
    /// Contract name, e.g. post or search-response
    #[arg(long)]
    kind: ContractKind,
    /// Report every structural violation instead of the first
    #[arg(long)]
    all: bool,
    /// Payload file; `-` reads stdin
    #[arg(default_value = "-")]
    input: String,
}

#[derive(Args)]
struct SchemaArgs {
    #[arg(long)]
    kind: ContractKind,
    /// Write the schema to this file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct PageArgs {
    /// Item type inside the envelope: category, thread or post
    #[arg(long)]
    item: PageItemKind,
    /// record drops malformed items; response rejects the page (default from config)
    #[arg(long)]
    policy: Option<RejectPolicy>,
    /// Payload file; `-` reads stdin
    #[arg(default_value = "-")]
    input: String,
}

fn init_tracing(cfg: &CliConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(cfg.log_filter.as_deref().unwrap_or("warn"))
    });
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("reading payload from stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(input).with_context(|| format!("reading payload {input}"))
}

fn render_json(value: &Value, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

fn cmd_validate(args: &ValidateArgs) -> Result<ExitCode> {
    let text = read_input(&args.input)?;
    let issues = match parse_json(&text) {
        Ok(value) => args.kind.check(&value),
        Err(violation) => vec![violation],
    };
    if issues.is_empty() {
        println!("ok: {}", args.kind);
        return Ok(ExitCode::SUCCESS);
    }
    tracing::info!(kind = %args.kind, count = issues.len(), "payload rejected");
    let shown = if args.all { issues.len() } else { 1 };
    for issue in issues.iter().take(shown) {
        println!("{issue}");
    }
    Ok(ExitCode::FAILURE)
}

fn cmd_schema(args: &SchemaArgs, cfg: &CliConfig) -> Result<ExitCode> {
    let rendered = render_json(&args.kind.schema(), cfg.pretty())?;
    match &args.out {
        Some(path) => write_schema_file(path, &rendered)?,
        None => println!("{rendered}"),
    }
    Ok(ExitCode::SUCCESS)
}

fn write_schema_file(path: &Path, rendered: &str) -> Result<()> {
    fs::write(path, rendered).with_context(|| format!("writing schema {}", path.display()))?;
    tracing::info!(path = %path.display(), "schema written");
    Ok(())
}

fn cmd_page(args: &PageArgs, cfg: &CliConfig) -> Result<ExitCode> {
    let policy = args.policy.unwrap_or_else(|| cfg.policy());
    let text = read_input(&args.input)?;
    let report = parse_json(&text).and_then(|value| args.item.decode_page(&value, policy));
    match report {
        Ok(report) => {
            println!(
                "kept {} item(s); page {}/{}, {} total",
                report.kept, report.page, report.total_pages, report.total
            );
            for (idx, violation) in &report.rejected {
                println!("dropped item {idx}: {violation}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(violation) => {
            println!("{violation}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let cfg = resolve_config(cli.config.as_deref())?;
    init_tracing(&cfg);
    match cli.command {
        Commands::Kinds => {
            for kind in ContractKind::ALL {
                println!("{kind}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate(args) => cmd_validate(&args),
        Commands::Schema(args) => cmd_schema(&args, &cfg),
        Commands::Page(args) => cmd_page(&args, &cfg),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
