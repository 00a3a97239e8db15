use anyhow::Context;
use clap::{Parser, Subcommand};
use front_audit::{
    AnthropicEndpoint, Config, ModelId, Pipeline, ReviewKind, StructureReport, DEFAULT_SECTIONS,
};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "front-audit",
    version,
    author,
    about = "Audit a web project's front-end",
    long_about = "Audit a web project's front-end.\n\n\
    `review` gathers the project's source files and forwards them to a remote \
    model for review, retrying with exponential backoff when rate limited.\n\
    `structure` walks the project directories and writes a static HTML report \
    of the folder/file tree with sizes.\n\n\
    USAGE EXAMPLES:\n  \
      # Review the default public/ assets directory\n  \
      front-audit review \"Point out structural problems\"\n\n  \
      # Review a specific directory with a different model\n  \
      front-audit review --dir ./web --model haiku \"Quick pass\"\n\n  \
      # Write a structure report for the current project\n  \
      front-audit structure --out report.html"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send the collected front-end sources to a model for review
    Review(ReviewArgs),
    /// Write a static HTML report of the project structure
    Structure(StructureArgs),
}

#[derive(clap::Args, Debug)]
struct ReviewArgs {
    /// Free-text instruction for the reviewer
    #[arg(value_name = "INSTRUCTION")]
    instruction: String,

    /// Directory to collect source files from
    #[arg(short, long, default_value = "public", value_name = "PATH")]
    dir: PathBuf,

    /// Model to query
    #[arg(short, long, value_enum, default_value = "sonnet")]
    model: CliModel,

    /// Maximum remote-call attempts
    #[arg(long, default_value_t = 3, value_name = "N")]
    retries: u32,

    /// Filename suffix to collect (repeatable; defaults to .html, .js, .css)
    #[arg(long = "ext", value_name = "SUFFIX")]
    extensions: Vec<String>,

    /// Review focus
    #[arg(short, long, value_enum, default_value = "architecture")]
    kind: CliReviewKind,

    /// Write the review to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct StructureArgs {
    /// Project root to report on
    #[arg(short, long, default_value = ".", value_name = "PATH")]
    dir: PathBuf,

    /// Output HTML file
    #[arg(short, long, default_value = "structure-report.html", value_name = "FILE")]
    out: PathBuf,

    /// Section directory to list (repeatable; defaults to the conventional set)
    #[arg(long = "section", value_name = "NAME")]
    sections: Vec<String>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliModel {
    Sonnet,
    Haiku,
    Opus,
}

impl From<CliModel> for ModelId {
    fn from(m: CliModel) -> Self {
        match m {
            CliModel::Sonnet => Self::Sonnet,
            CliModel::Haiku => Self::Haiku,
            CliModel::Opus => Self::Opus,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliReviewKind {
    /// High-level architectural review
    Architecture,
    /// Maintainability and code-quality review
    CodeQuality,
    /// Security-focused review
    Security,
    /// Performance-focused review
    Performance,
}

impl From<CliReviewKind> for ReviewKind {
    fn from(k: CliReviewKind) -> Self {
        match k {
            CliReviewKind::Architecture => Self::Architecture,
            CliReviewKind::CodeQuality => Self::CodeQuality,
            CliReviewKind::Security => Self::Security,
            CliReviewKind::Performance => Self::Performance,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose)?;

    match cli.command {
        Command::Review(args) => run_review(args),
        Command::Structure(args) => run_structure(args),
    }
}

fn run_review(args: ReviewArgs) -> anyhow::Result<()> {
    // The credential check happens before any filesystem work.
    let endpoint = AnthropicEndpoint::from_env()
        .context("API credential missing; set the environment variable and retry")?;

    let mut builder = Config::builder()
        .root_dir(args.dir)
        .model(args.model.into())
        .max_attempts(args.retries);

    if !args.extensions.is_empty() {
        builder = builder.extensions(args.extensions);
    }

    let config = builder.build().context("Failed to build configuration")?;

    let outcome = Pipeline::new(config)
        .context("Failed to create pipeline")?
        .run(&endpoint, args.kind.into(), &args.instruction)
        .context("Review failed")?;

    match args.out {
        Some(path) => {
            fs::write(&path, &outcome.response)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Review written to {}", path.display());
        }
        None => println!("{}", outcome.response),
    }

    outcome.stats.print_summary();
    Ok(())
}

fn run_structure(args: StructureArgs) -> anyhow::Result<()> {
    let report = if args.sections.is_empty() {
        StructureReport::new(
            &args.dir,
            DEFAULT_SECTIONS.iter().map(ToString::to_string).collect(),
        )
    } else {
        StructureReport::new(&args.dir, args.sections)
    };

    report
        .write(&args.out)
        .context("Failed to write structure report")?;

    eprintln!("Structure report saved to {}", args.out.display());
    Ok(())
}

fn setup_tracing(verbosity: u8) -> anyhow::Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::new("front_audit=info"),
        1 => EnvFilter::new("front_audit=debug"),
        _ => EnvFilter::new("front_audit=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .init();

    Ok(())
}
