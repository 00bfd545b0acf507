#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod command;

use command::{
    CheckInput, CheckStrategy, CommandStrategy, DomainsInput, DomainsStrategy, ExtractInput,
    ExtractStrategy, InfoStrategy, InitStrategy, Output, ReformatInput, ReformatStrategy, Source,
    VersionStrategy, YearsInput, YearsStrategy,
};

#[derive(Parser)]
#[command(name = "retally")]
#[command(about = "Extract, tally and rewrite text with regular expressions", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count 20th and 21st century years mentioned on a web page
    Years {
        /// Page to scan (defaults to the `years` preset URL)
        #[arg(long)]
        url: Option<String>,

        /// Year pattern override
        #[arg(short, long)]
        pattern: Option<String>,

        /// Match against the raw markup instead of its visible text
        #[arg(long)]
        raw: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// List domain names linked from a web page
    Domains {
        /// Page to scan (defaults to the `domains` preset URL)
        #[arg(long)]
        url: Option<String>,

        /// URL pattern override
        #[arg(short, long)]
        pattern: Option<String>,

        /// Group holding the domain (name or number)
        #[arg(short, long)]
        group: Option<String>,

        /// Tally domains instead of listing every occurrence
        #[arg(long)]
        rank: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print every match of a pattern, or their frequency table
    Extract {
        /// Pattern to apply
        #[arg(short, long, required_unless_present = "preset")]
        pattern: Option<String>,

        /// Use a configured preset pattern
        #[arg(long, conflicts_with = "pattern")]
        preset: Option<String>,

        /// Group to print (name or number, default: whole match)
        #[arg(short, long)]
        group: Option<String>,

        /// Tally values instead of listing them
        #[arg(long)]
        rank: bool,

        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// Rewrite matches using a \N group template
    Reformat {
        /// Pattern override
        #[arg(short, long, requires = "template")]
        pattern: Option<String>,

        /// Template override, e.g. '\3\2\1\2\4'
        #[arg(short, long)]
        template: Option<String>,

        /// Preset supplying the defaults
        #[arg(long, default_value = "dates")]
        preset: String,

        /// Replace at most this many matches (0 = all)
        #[arg(short = 'n', long, default_value_t = 0)]
        count: usize,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// Report whether each input matches a pattern
    Check {
        /// Pattern override
        #[arg(short, long)]
        pattern: Option<String>,

        /// Preset supplying the pattern
        #[arg(long, default_value = "email")]
        preset: String,

        /// Strings to test
        #[arg(required = true)]
        inputs: Vec<String>,
    },
    /// Write the default configuration file
    Init,
    /// Show the effective configuration
    Info,
    /// Show version
    Version,
}

#[derive(Args)]
struct OutputArgs {
    /// Keep only the first N results
    #[arg(short, long)]
    limit: Option<usize>,

    /// Print JSON instead of plain lines
    #[arg(long)]
    json: bool,
}

impl From<OutputArgs> for Output {
    fn from(args: OutputArgs) -> Self {
        Self {
            limit: args.limit,
            json: args.json,
        }
    }
}

#[derive(Args)]
struct SourceArgs {
    /// Input file ("-" or nothing for stdin)
    file: Option<PathBuf>,

    /// Fetch the input from a URL
    #[arg(long, conflicts_with_all = ["file", "text"])]
    url: Option<String>,

    /// Use this literal text as input
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// Convert fetched HTML to visible text first
    #[arg(long, requires = "url")]
    strip_html: bool,
}

impl From<SourceArgs> for Source {
    fn from(args: SourceArgs) -> Self {
        if let Some(url) = args.url {
            return Self::Url {
                url,
                strip_html: args.strip_html,
            };
        }
        if let Some(text) = args.text {
            return Self::Text(text);
        }
        match args.file {
            Some(path) if path.as_os_str() != "-" => Self::File(path),
            _ => Self::Stdin,
        }
    }
}

fn init_tracing(verbose: u8) -> anyhow::Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Years {
            url,
            pattern,
            raw,
            output,
        } => {
            YearsStrategy
                .execute(YearsInput {
                    url,
                    pattern,
                    raw,
                    output: output.into(),
                })
                .await?;
        }
        Commands::Domains {
            url,
            pattern,
            group,
            rank,
            output,
        } => {
            DomainsStrategy
                .execute(DomainsInput {
                    url,
                    pattern,
                    group,
                    rank,
                    output: output.into(),
                })
                .await?;
        }
        Commands::Extract {
            pattern,
            preset,
            group,
            rank,
            output,
            source,
        } => {
            ExtractStrategy
                .execute(ExtractInput {
                    pattern,
                    preset,
                    group,
                    rank,
                    output: output.into(),
                    source: source.into(),
                })
                .await?;
        }
        Commands::Reformat {
            pattern,
            template,
            preset,
            count,
            source,
        } => {
            ReformatStrategy
                .execute(ReformatInput {
                    pattern,
                    template,
                    preset,
                    count,
                    source: source.into(),
                })
                .await?;
        }
        Commands::Check {
            pattern,
            preset,
            inputs,
        } => {
            CheckStrategy
                .execute(CheckInput {
                    pattern,
                    preset,
                    inputs,
                })
                .await?;
        }
        Commands::Init => InitStrategy.execute(()).await?,
        Commands::Info => InfoStrategy.execute(()).await?,
        Commands::Version => VersionStrategy.execute(()).await?,
    }

    Ok(())
}
