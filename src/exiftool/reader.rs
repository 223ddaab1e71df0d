//! The extraction pipeline: batch → invoke → decode → normalize → assemble.

use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use crate::clean;
use crate::error::{Error, Result};
use crate::pipeline::{ExtractOptions, MediaPaths};
use crate::value::{MetadataMap, TagMap, TagValue};

use super::xml::{self, XmlChild, XmlTree};
use super::{ExifTool, batch};

/// Matches the Clark-notation namespace prefix on a key, with or without the
/// attribute marker: `{http://...}Tag` and `@{http://...}Tag`.
fn ns_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^@?\{[^}]*\}").unwrap())
}

/// Matches a key that is *only* a namespace wrapper, as produced by nested
/// RDF containers (`rdf:Bag`, `rdf:Seq`, `rdf:li`).
fn ns_wrapper_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{http://[^}]*\}").unwrap())
}

impl ExifTool {
    /// Extract EXIF/XMP metadata for every file in `files`.
    ///
    /// Files are split into batches under the command-line character limit,
    /// each batch runs as one `exiftool -xmlFormat` invocation, and the XML
    /// responses are decoded and merged into a single map keyed by each
    /// file's own `Directory`/`FileName` fields. Batches run sequentially;
    /// the first failing batch aborts the whole extraction.
    ///
    /// `opts.clean_keys` canonicalizes tag names via the column map and
    /// `opts.clean_values` coerces string values to typed primitives.
    pub fn extract(&self, files: &MediaPaths, opts: &ExtractOptions) -> Result<MetadataMap> {
        if files.is_empty() {
            return Ok(MetadataMap::new());
        }

        log::info!("Extracting EXIF metadata for {} file(s)", files.len());
        let tool_name = self.bin().to_string_lossy().into_owned();
        let batches = batch::plan_batches(files.paths(), self.char_limit(), &tool_name);
        log::info!(
            "Split {} file(s) into {} batch(es)",
            files.len(),
            batches.len()
        );

        let mut metadata = MetadataMap::new();
        for (i, files_batch) in batches.iter().enumerate() {
            log::info!(
                "Running batch {} of {} containing {} file(s)",
                i + 1,
                batches.len(),
                files_batch.len()
            );

            let xml_text = self.run_xml(files_batch)?;
            let (root_tag, tree) = xml::decode(&xml_text)?;

            for description in xml::rdf_descriptions(&root_tag, tree)? {
                let record = description_record(description)?;
                let key = record_path(&record)?;
                if metadata.insert(key.clone(), record).is_some() {
                    log::warn!("Duplicate metadata entry for \"{key}\", keeping the latest");
                }
            }
        }

        if opts.clean_keys {
            metadata = clean::keys::clean_keys(metadata, self.columns());
            log::info!("Cleaned EXIF dictionary keys");
        }
        if opts.clean_values {
            metadata = clean::values::clean_values(metadata);
            log::info!("Cleaned EXIF dictionary values");
        }

        log::info!("EXIF metadata extraction complete");
        Ok(metadata)
    }
}

/// Turn one decoded `rdf:Description` into a flat record: strip namespace
/// prefixes from the top-level keys and unnest single-entry namespace
/// wrappers in the values.
pub(crate) fn description_record(tree: XmlTree) -> Result<TagMap> {
    let XmlTree::Node(map) = tree else {
        return Err(Error::MalformedXml(
            "Description element carries no fields".into(),
        ));
    };

    let mut record = TagMap::new();
    for (key, child) in map {
        let clean_key = strip_namespace(&key);
        record.insert(clean_key, unnest_wrappers(child_value(child)));
    }
    Ok(record)
}

/// Strip the `@?{uri}` prefix from a key, leaving the local name.
pub(crate) fn strip_namespace(key: &str) -> String {
    ns_prefix_re().replace(key, "").into_owned()
}

/// Collapse single-entry namespace-wrapper maps down to their terminal value.
///
/// RDF containers decode to shapes like
/// `{"{rdf}Bag": {"{rdf}li": ["a", "b"]}}`; descending through the wrappers
/// yields the list itself. The descent stops as soon as a map has more than
/// one entry or its sole key is not a namespace URI, so legitimately nested
/// data is left alone.
pub(crate) fn unnest_wrappers(mut value: TagValue) -> TagValue {
    loop {
        value = match value {
            TagValue::Map(mut map) if map.len() == 1 => {
                let key = map.keys().next().cloned().unwrap_or_default();
                if ns_wrapper_re().is_match(&key) {
                    map.remove(&key).unwrap_or(TagValue::Null)
                } else {
                    return TagValue::Map(map);
                }
            }
            other => return other,
        };
    }
}

/// Convert a decoded XML child slot into a metadata value. Nested node keys
/// are kept raw so the wrapper unnesting can still recognize them.
fn child_value(child: XmlChild) -> TagValue {
    match child {
        XmlChild::One(tree) => tree_value(tree),
        XmlChild::Many(trees) => TagValue::List(trees.into_iter().map(tree_value).collect()),
    }
}

fn tree_value(tree: XmlTree) -> TagValue {
    match tree {
        XmlTree::Empty => TagValue::Null,
        XmlTree::Text(s) => TagValue::Str(s),
        XmlTree::Node(map) => {
            let entries: BTreeMap<String, TagValue> = map
                .into_iter()
                .map(|(k, child)| (k, unnest_wrappers(child_value(child))))
                .collect();
            TagValue::Map(entries)
        }
    }
}

/// Reconstruct the result key from the record's own fields. This is the join
/// key for the final map, not the caller-supplied path string.
pub(crate) fn record_path(record: &TagMap) -> Result<String> {
    let dir = record
        .get("Directory")
        .and_then(TagValue::as_str)
        .ok_or(Error::MissingField("Directory"))?;
    let name = record
        .get("FileName")
        .and_then(TagValue::as_str)
        .ok_or(Error::MissingField("FileName"))?;
    Ok(Path::new(dir).join(name).to_string_lossy().into_owned())
}
