//! # photo-meta
//!
//! Batch photo metadata (EXIF/XMP) extraction and writing, driven by Phil
//! Harvey's `exiftool`. This crate never parses binary EXIF itself — it
//! invokes exiftool with `-xmlFormat`, batching files under the command-line
//! length ceiling, and turns the XML responses into clean, typed, per-file
//! records.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use photo_meta::config::Config;
//! use photo_meta::exiftool::ExifTool;
//! use photo_meta::pipeline::{ExtractOptions, MediaPaths};
//!
//! fn main() -> photo_meta::error::Result<()> {
//!     let config = Config::default();
//!     let tool = ExifTool::locate(&config)?;
//!
//!     let files = MediaPaths::new(["/photos/a.jpg", "/photos/b.jpg"])?;
//!     let opts = ExtractOptions { clean_keys: true, clean_values: true };
//!     let metadata = tool.extract(&files, &opts)?;
//!
//!     for (path, record) in &metadata {
//!         println!("{path}: {} tags", record.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! Data flows strictly forward:
//!
//! ```text
//! paths → batches → XML per batch → tree per batch → normalized records
//!       → merged-by-path map → (clean_values) typed map → (clean_keys) renamed map
//! ```
//!
//! Extraction output is keyed by each file's own `Directory`/`FileName`
//! fields as reported by exiftool, not the caller-supplied path strings.
//!
//! ## Writing and removing tags
//!
//! ```rust,no_run
//! use photo_meta::config::Config;
//! use photo_meta::exiftool::ExifTool;
//! use photo_meta::pipeline::MediaPaths;
//! use photo_meta::value::TagValue;
//! use std::collections::BTreeMap;
//!
//! fn main() -> photo_meta::error::Result<()> {
//!     let tool = ExifTool::locate(&Config::default())?;
//!     let files = MediaPaths::single("/photos/a.jpg")?;
//!
//!     let mut attrs = BTreeMap::new();
//!     attrs.insert("Artist".to_string(), TagValue::from("Ansel Adams"));
//!     attrs.insert(
//!         "Keywords".to_string(),
//!         TagValue::List(vec!["sunset".into(), "beach".into()]),
//!     );
//!     let results = tool.write(&files, &attrs)?;
//!     assert!(results.values().all(|ok| *ok));
//!
//!     tool.remove(&files, &["Rating".to_string()])?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`exiftool`] — binary discovery, batching, invocation, XML decoding
//! - [`clean`] — key canonicalization and value type coercion
//! - [`config`] — process-scoped configuration
//! - [`pipeline`] — path validation and directory expansion
//! - [`value`] — the [`value::TagValue`] metadata value type
//! - [`error`] — the error taxonomy

pub mod clean;
pub mod config;
pub mod error;
pub mod exiftool;
pub mod pipeline;
pub mod value;

pub use error::{Error, Result};
pub use exiftool::ExifTool;
pub use pipeline::{ExtractOptions, MediaPaths};
pub use value::{MetadataMap, TagMap, TagValue};
