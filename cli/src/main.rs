use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use designfix_core::{default_passes, Element, ExecutionContext, PrimaryFont};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "designfix")]
#[command(about = "Post-process generated design markup into idiomatic utility-class code")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the conversion pipeline over a parsed markup tree
    Run {
        /// Input markup tree file (JSON, as produced by the parser)
        input: PathBuf,

        /// Output file for the mutated tree (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for the per-pass metrics report
        #[arg(long)]
        report: Option<PathBuf>,

        /// Primary font family detected upstream
        #[arg(long)]
        font_family: Option<String>,

        /// Primary font style detected upstream
        #[arg(long, default_value = "Regular")]
        font_style: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Pretty,
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for JSON.
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            input,
            output,
            report,
            font_family,
            font_style,
            format,
        } => {
            let file = File::open(&input)
                .with_context(|| format!("Failed to open input file: {}", input.display()))?;
            let reader = BufReader::new(file);
            let mut tree: Element = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse markup tree from: {}", input.display()))?;

            let mut ctx = match font_family {
                Some(family) => ExecutionContext::with_primary_font(PrimaryFont {
                    family,
                    style: font_style,
                }),
                None => ExecutionContext::new(),
            };

            designfix_core::run(&mut tree, &mut ctx, default_passes())
                .context("Pipeline failed")?;

            write_json(&tree, output.as_deref(), format)?;
            if let Some(report_path) = report {
                let file = File::create(&report_path).with_context(|| {
                    format!("Failed to create report file: {}", report_path.display())
                })?;
                serde_json::to_writer_pretty(BufWriter::new(file), ctx.report())
                    .context("Failed to write report")?;
            }
            Ok(())
        }
    }
}

fn write_json<T: serde::Serialize>(
    value: &T,
    path: Option<&std::path::Path>,
    format: OutputFormat,
) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            let writer = BufWriter::new(file);
            match format {
                OutputFormat::Pretty => serde_json::to_writer_pretty(writer, value)?,
                OutputFormat::Compact => serde_json::to_writer(writer, value)?,
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            match format {
                OutputFormat::Pretty => serde_json::to_writer_pretty(&mut writer, value)?,
                OutputFormat::Compact => serde_json::to_writer(&mut writer, value)?,
            }
            writeln!(writer)?;
        }
    }
    Ok(())
}
