use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use cvsift_core::config_file::{self, ConfigFile};
use cvsift_ingest::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, FileTextExtractor, HttpPageFetcher};
use cvsift_parsing::{
    OutputMapping, ParsingConfigBuilder, ProfileExtractor, SectionKind, TextExtractor,
    combine_outputs, validate_profile_url,
};

mod output;

use output::ColorMode;

/// Extract structured candidate data from CVs and professional profile pages
#[derive(Parser, Debug)]
#[command(name = "cvsift", version, about)]
struct Cli {
    /// Path to a config file (overrides .cvsift.toml and the platform config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse one or more CV files
    Parse {
        /// CV files (.txt, .md, .html)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Emit JSON instead of the human-readable listing
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch and parse a public profile page
    Profile {
        /// Profile URL, e.g. https://www.linkedin.com/in/jane-doe
        url: String,

        /// Emit JSON instead of the human-readable listing
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Parse a saved profile page (text or HTML)
    ProfileFile {
        /// Saved profile page
        file: PathBuf,

        /// Emit JSON instead of the human-readable listing
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Show which sections are found in a document, without parsing fields
    Sections {
        /// Document to inspect
        file: PathBuf,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Check whether a URL is a recognised profile URL (exit code 1 if not)
    ValidateUrl {
        url: String,
    },

    /// Merge a CV result with a profile result
    Combine {
        /// JSON from `parse --json` (a single result) or a bare cv_data object
        resume: PathBuf,

        /// JSON from `profile --json` or a bare cv_data object
        profile: PathBuf,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present (silently ignore if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => config_file::read_config(path)?,
        None => config_file::load_config(),
    };

    match cli.command {
        Command::Parse {
            files,
            json,
            no_color,
            output,
        } => {
            for file in &files {
                if !file.exists() {
                    anyhow::bail!("File not found: {}", file.display());
                }
            }
            let extractor = build_extractor(&config)?;
            let outcomes = extractor.parse_batch(&files[..], &FileTextExtractor);

            let color = ColorMode(!no_color && output.is_none());
            let mut writer = open_writer(output.as_deref())?;
            if json {
                writeln!(writer, "{}", serde_json::to_string_pretty(&outcomes)?)?;
            } else {
                output::print_outcomes(&mut writer, &outcomes, color)?;
            }

            if !outcomes.iter().any(|o| o.is_parsed()) {
                anyhow::bail!("no document could be parsed");
            }
            Ok(())
        }

        Command::Profile {
            url,
            json,
            no_color,
            timeout,
        } => {
            let extractor = build_extractor(&config)?;
            let fetcher = build_fetcher(timeout, &config);
            let response = extractor
                .parse_profile_url(&url, &fetcher)
                .with_context(|| format!("cannot parse {}", url))?;

            let mut writer = open_writer(None)?;
            if json {
                writeln!(writer, "{}", serde_json::to_string_pretty(&response)?)?;
            } else {
                output::print_response(&mut writer, &response, ColorMode(!no_color))?;
            }
            Ok(())
        }

        Command::ProfileFile {
            file,
            json,
            no_color,
        } => {
            if !file.exists() {
                anyhow::bail!("File not found: {}", file.display());
            }
            let extractor = build_extractor(&config)?;
            let response = extractor.parse_profile_file(&file, &FileTextExtractor)?;

            let mut writer = open_writer(None)?;
            if json {
                writeln!(writer, "{}", serde_json::to_string_pretty(&response)?)?;
            } else {
                output::print_response(&mut writer, &response, ColorMode(!no_color))?;
            }
            Ok(())
        }

        Command::Sections { file, no_color } => {
            if !file.exists() {
                anyhow::bail!("File not found: {}", file.display());
            }
            let extractor = build_extractor(&config)?;
            let text = FileTextExtractor.extract_text(&file)?;
            let sections: Vec<(SectionKind, Option<String>)> = SectionKind::ALL
                .iter()
                .map(|&kind| (kind, extractor.locate_section(&text, kind)))
                .collect();

            let title = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| file.display().to_string());
            let mut writer = open_writer(None)?;
            output::print_sections(&mut writer, &title, &sections, ColorMode(!no_color))?;
            Ok(())
        }

        Command::ValidateUrl { url } => {
            if !validate_profile_url(&url) {
                anyhow::bail!("Not a profile URL: {}", url);
            }
            println!("{} {}", "valid".green(), url.trim());
            Ok(())
        }

        Command::Combine {
            resume,
            profile,
            output,
        } => {
            let resume = read_cv_data(&resume)?;
            let profile = read_cv_data(&profile)?;
            let combined = combine_outputs(&resume, &profile);

            let mut writer = open_writer(output.as_deref())?;
            writeln!(writer, "{}", serde_json::to_string_pretty(&combined)?)?;
            Ok(())
        }
    }
}

fn build_extractor(config: &ConfigFile) -> anyhow::Result<ProfileExtractor> {
    let parsing = ParsingConfigBuilder::from_config_file(config)
        .build()
        .context("invalid parsing configuration")?;
    Ok(ProfileExtractor::with_config(parsing))
}

fn build_fetcher(timeout_flag: Option<u64>, config: &ConfigFile) -> HttpPageFetcher {
    let fetch = config.fetch.clone().unwrap_or_default();

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let timeout_secs = timeout_flag
        .or_else(|| {
            std::env::var("CVSIFT_FETCH_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
        })
        .or(fetch.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    let user_agent = std::env::var("CVSIFT_USER_AGENT")
        .ok()
        .or(fetch.user_agent)
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

    tracing::debug!(timeout_secs, "configured page fetcher");
    HttpPageFetcher::new(Duration::from_secs(timeout_secs), &user_agent)
}

fn open_writer(output: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    })
}

/// Load a cv_data mapping from either a full parse result or a bare object.
fn read_cv_data(path: &Path) -> anyhow::Result<OutputMapping> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    let raw = std::fs::read_to_string(path)?;
    let value: Value =
        serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))?;

    match value {
        Value::Object(mut map) => match map.remove("cv_data") {
            Some(Value::Object(cv_data)) => Ok(cv_data),
            Some(_) => anyhow::bail!("cv_data in {} is not an object", path.display()),
            None => Ok(map),
        },
        _ => anyhow::bail!("{} does not hold a JSON object", path.display()),
    }
}
