// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};

use crate::app_config::Config;
use crate::pipeline::Pipeline;

mod app_config;
mod chunker;
mod document;
mod ebook;
mod errors;
mod file_utils;
mod pipeline;
mod preprocess;
mod providers;
mod translation;

/// Processing stage selected on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Stage {
    /// Split the input EPUB into per-chapter fragment files
    Chunk,
    /// Translate the chunked fragments
    Translate,
    /// Assemble translated fragments into the output EPUB
    Assemble,
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LevelFilter {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LevelFilter::Error,
            CliLogLevel::Warn => LevelFilter::Warn,
            CliLogLevel::Info => LevelFilter::Info,
            CliLogLevel::Debug => LevelFilter::Debug,
            CliLogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// bookwai - Book translation With AI
///
/// Translates EPUB books with an AI language model in three independent
/// stages that communicate through the filesystem.
#[derive(Parser, Debug)]
#[command(name = "bookwai")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered EPUB book translator")]
#[command(long_about = "bookwai splits an EPUB into per-chapter fragments, translates them with \
an AI language model and reassembles the result into a new EPUB.

EXAMPLES:
    bookwai --input book.epub --output work/ --output-language de --stage chunk
    bookwai --input book.epub --output work/ --output-language de --stage translate
    bookwai --input book.epub --output work/ --output-language de --stage assemble

CONFIGURATION (environment):
    OPENAI_API_KEY      required, credential for the translation service
    OPENAI_MODEL        optional, defaults to gpt-4
    OPENAI_ENDPOINT     optional, API endpoint override
    MAX_CHUNK_TOKENS    optional, chunk token budget, defaults to 600")]
struct CommandLineOptions {
    /// Path to the input EPUB file
    #[arg(long, value_name = "PATH")]
    input: PathBuf,

    /// Path to the working/output directory
    #[arg(long, value_name = "DIR")]
    output: PathBuf,

    /// Target language code (e.g. 'de', 'en', 'es')
    #[arg(long = "output-language", value_name = "CODE")]
    output_language: String,

    /// Processing stage to run
    #[arg(long, value_enum)]
    stage: Stage,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CommandLineOptions::parse();

    let level = cli
        .log_level
        .map(LevelFilter::from)
        .unwrap_or(LevelFilter::Info);
    CustomLogger::init(level).context("Failed to initialize logger")?;

    if isolang::Language::from_639_1(&cli.output_language).is_none() {
        warn!(
            "'{}' is not a known ISO 639-1 language code, passing it through anyway",
            cli.output_language
        );
    }

    // The credential is required before any stage runs; a missing key fails
    // here rather than halfway through a translation batch.
    let config = Config::from_env().map_err(|e| {
        error!("{}", e);
        anyhow::anyhow!(e)
    })?;

    let input_dir = cli.output.join("input");
    let output_dir = cli.output.join("output");
    file_utils::FileManager::ensure_dir(&input_dir)?;
    file_utils::FileManager::ensure_dir(&output_dir)?;

    let outcome = match cli.stage {
        Stage::Chunk => ebook::split_epub(&cli.input, &input_dir).map(|fragments| {
            info!("Wrote {} fragment file(s) to {:?}", fragments, input_dir);
        }),
        Stage::Translate => {
            let pipeline = Pipeline::new(&config);
            pipeline
                .translate_directory(&input_dir, &output_dir, &cli.output_language)
                .await
                .map(|_| ())
        }
        Stage::Assemble => ebook::assemble_epub(&cli.output).map(|book_path| {
            info!("Final book available at {:?}", book_path);
        }),
    };

    outcome.map_err(|e| {
        error!("An error occurred: {}", e);
        anyhow::anyhow!(e)
    })
}
