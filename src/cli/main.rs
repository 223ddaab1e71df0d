use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;

use photo_meta::config::Config;
use photo_meta::exiftool::ExifTool;
use photo_meta::pipeline::{self, ExtractOptions, MediaPaths};
use photo_meta::value::TagValue;

#[derive(Parser, Debug)]
#[command(
    name = "photo-meta",
    version,
    about = "Batch photo metadata (EXIF/XMP) extraction and writing via exiftool"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract metadata as JSON (files or directories)
    Extract {
        /// Media files or directories to process
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        /// Canonicalize tag names to snake_case via the column map
        #[arg(long)]
        clean_keys: bool,

        /// Coerce string values to typed primitives
        #[arg(long)]
        clean_values: bool,
    },

    /// Write tag values onto files
    Write {
        /// Media files to modify
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        /// Tag assignments, repeatable: -t Artist="Ansel Adams"
        #[arg(short = 't', long = "tag", value_name = "TAG=VALUE", required = true)]
        tags: Vec<String>,
    },

    /// Remove tags from files
    Remove {
        /// Media files to modify
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        /// Tag names to remove, repeatable
        #[arg(short = 't', long = "tag", value_name = "TAG", required = true)]
        tags: Vec<String>,
    },

    /// Write a default config.json and exit
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    if let Command::Init = cli.command {
        let config = Config::default();
        config.save(cli.config.as_deref())?;
        let save_path = match cli.config.as_deref() {
            Some(p) => p.to_path_buf(),
            None => Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;
    let tool = ExifTool::locate(&config)?;

    match cli.command {
        Command::Extract {
            paths,
            clean_keys,
            clean_values,
        } => {
            let media = pipeline::collect_media(&paths);
            if media.is_empty() {
                anyhow::bail!("No supported media files found in the specified paths.");
            }
            let files = MediaPaths::new(media)?;

            let opts = ExtractOptions {
                clean_keys,
                clean_values,
            };
            let metadata = tool.extract(&files, &opts)?;
            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }

        Command::Write { paths, tags } => {
            let files = MediaPaths::new(paths)?;
            let attrs = parse_tag_assignments(&tags)?;

            let results = tool.write(&files, &attrs)?;
            let mut failed = false;
            for (path, ok) in &results {
                println!("{}: {}", path, if *ok { "ok" } else { "FAILED" });
                failed |= !ok;
            }
            if failed {
                anyhow::bail!("One or more tag writes failed.");
            }
        }

        Command::Remove { paths, tags } => {
            let files = MediaPaths::new(paths)?;
            tool.remove(&files, &tags)?;
            println!("Removed {} tag(s) from {} file(s)", tags.len(), files.len());
        }

        Command::Init => unreachable!("handled above"),
    }

    Ok(())
}

/// Parse repeated `Tag=Value` arguments into a tag map.
fn parse_tag_assignments(tags: &[String]) -> Result<BTreeMap<String, TagValue>> {
    let mut attrs = BTreeMap::new();
    for assignment in tags {
        let (tag, value) = assignment
            .split_once('=')
            .with_context(|| format!("Expected TAG=VALUE, got \"{assignment}\""))?;
        attrs.insert(tag.to_string(), TagValue::from(value));
    }
    Ok(attrs)
}
