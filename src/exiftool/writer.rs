//! Writing and removing tags: thin command constructors over exiftool.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::pipeline::MediaPaths;
use crate::value::TagValue;

use super::ExifTool;

impl ExifTool {
    /// Write tag/value pairs onto every file in `files`.
    ///
    /// Returns a per-path success map. A path maps to `true` only if every
    /// tag write on it succeeded; exiftool reporting "nothing to do" counts
    /// as a failure even though the process exits cleanly.
    pub fn write(
        &self,
        files: &MediaPaths,
        attrs: &BTreeMap<String, TagValue>,
    ) -> Result<BTreeMap<String, bool>> {
        for tag in attrs.keys() {
            validate_tag_name(tag)?;
        }

        let mut tracker = BTreeMap::new();
        for path in files.paths() {
            let key = path.to_string_lossy().into_owned();
            tracker.insert(key.clone(), true);

            for (tag, value) in attrs {
                let args = write_args(tag, value);
                let response = self.run_tag_command(&args, path)?;

                if is_success_response(&response) {
                    log::info!("File \"{key}\" set tag \"{tag}\" to value \"{value}\"");
                } else {
                    log::error!(
                        "File \"{key}\" failed to set tag \"{tag}\" to value \"{value}\" \
                         but exiftool did not report an error"
                    );
                    tracker.insert(key.clone(), false);
                }
            }
        }

        Ok(tracker)
    }

    /// Remove the named tags from every file in `files`. Side effect only.
    pub fn remove(&self, files: &MediaPaths, tags: &[String]) -> Result<()> {
        for tag in tags {
            validate_tag_name(tag)?;
        }

        for path in files.paths() {
            log::info!("File: {}", path.display());

            for tag in tags {
                // An empty assignment clears the tag.
                let response = self.run_tag_command(&[format!("-{tag}=")], path)?;

                if is_success_response(&response) {
                    log::info!("Removed tag \"{tag}\"");
                } else {
                    log::error!("exiftool could not remove tag \"{tag}\"");
                    log::debug!("exiftool output: {response}");
                }
            }
        }

        Ok(())
    }
}

/// Render the `-Tag=value` argument(s) for one tag write.
///
/// `Keywords` is the special case: exiftool treats a comma-separated string
/// as one keyword, so multi-value keywords must render as repeated
/// `-Keywords=value` arguments.
pub(crate) fn write_args(tag: &str, value: &TagValue) -> Vec<String> {
    if tag == "Keywords" {
        let keywords: Vec<String> = match value {
            TagValue::List(items) => items.iter().map(ToString::to_string).collect(),
            TagValue::Str(s) if s.contains(',') => {
                s.split(',').map(|kw| kw.trim().to_string()).collect()
            }
            other => vec![other.to_string()],
        };
        if keywords.len() > 1 {
            return keywords.iter().map(|kw| format!("-Keywords={kw}")).collect();
        }
    }

    vec![format!("-{tag}={value}")]
}

/// Reject tag names exiftool command syntax cannot accept.
pub(crate) fn validate_tag_name(tag: &str) -> Result<()> {
    for ch in ['-', '_'] {
        if tag.contains(ch) {
            return Err(Error::IllegalTagName {
                tag: tag.to_string(),
                ch,
            });
        }
    }
    Ok(())
}

/// exiftool signals "no matching tag" through its text response rather than
/// the exit code. Callers must reproduce this exact substring check.
pub(crate) fn is_success_response(response: &str) -> bool {
    !response.to_lowercase().contains("nothing to do")
}
