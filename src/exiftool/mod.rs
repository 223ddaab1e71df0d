//! Driving the external `exiftool` binary: discovery, batching, invocation,
//! and the transforms over its XML output.
//!
//! - [`batch`] — splitting file lists under the command-line length ceiling
//! - [`xml`] — decoding `-xmlFormat` output into a generic tree
//! - [`reader`] — the extraction pipeline (`ExifTool::extract`)
//! - [`writer`] — tag writing and removal (`ExifTool::write` / `remove`)

pub mod batch;
pub mod reader;
pub mod writer;
pub mod xml;

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::clean::keys::ColumnMap;
use crate::config::Config;
use crate::error::{Error, Result};

/// Name of the external metadata binary searched for on PATH.
pub const EXIFTOOL: &str = "exiftool";

/// A located exiftool binary plus the process-scoped settings the pipelines
/// need. Construction fails if the binary cannot be found, so every method on
/// a live `ExifTool` can assume the tool exists.
#[derive(Debug, Clone)]
pub struct ExifTool {
    bin: PathBuf,
    char_limit: usize,
    columns: ColumnMap,
}

impl ExifTool {
    /// Locate the exiftool binary and load the column map.
    ///
    /// Honors `config.exiftool_bin` as an explicit override; otherwise every
    /// PATH entry is searched.
    pub fn locate(config: &Config) -> Result<Self> {
        let bin = match &config.exiftool_bin {
            Some(p) if p.is_file() => p.clone(),
            Some(p) => return Err(Error::ToolNotFound(p.display().to_string())),
            None => find_binary(EXIFTOOL)?,
        };
        log::info!("Found exiftool binary \"{}\"", bin.display());

        Ok(Self {
            bin,
            char_limit: config.char_limit,
            columns: ColumnMap::load(config.column_map.as_deref())?,
        })
    }

    /// Path of the located binary.
    pub fn bin(&self) -> &Path {
        &self.bin
    }

    pub(crate) fn char_limit(&self) -> usize {
        self.char_limit
    }

    pub(crate) fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    /// Run one extraction batch: `exiftool -xmlFormat <paths...>` with stderr
    /// discarded, capturing stdout as text. Launch failure and non-zero exit
    /// both surface as [`Error::ToolExecution`].
    pub(crate) fn run_xml(&self, batch: &[PathBuf]) -> Result<String> {
        let output = Command::new(&self.bin)
            .arg("-xmlFormat")
            .args(batch)
            .stderr(Stdio::null())
            .output()
            .map_err(|e| {
                Error::ToolExecution(format!("failed to launch {}: {e}", self.bin.display()))
            })?;

        if !output.status.success() {
            return Err(Error::ToolExecution(format!(
                "{} exited with {}",
                self.bin.display(),
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run one write/remove command: `exiftool -overwrite_original <tag args>
    /// <path>`, returning captured stdout for the success heuristic.
    pub(crate) fn run_tag_command(&self, tag_args: &[String], path: &Path) -> Result<String> {
        let output = Command::new(&self.bin)
            .arg("-overwrite_original")
            .args(tag_args)
            .arg(path)
            .stderr(Stdio::null())
            .output()
            .map_err(|e| {
                Error::ToolExecution(format!("failed to launch {}: {e}", self.bin.display()))
            })?;

        if !output.status.success() {
            return Err(Error::ToolExecution(format!(
                "{} exited with {}",
                self.bin.display(),
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Search every PATH entry for an executable with the given name.
fn find_binary(name: &str) -> Result<PathBuf> {
    let path_var = std::env::var_os("PATH").unwrap_or_default();
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    Err(Error::ToolNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_binary_missing_is_tool_not_found() {
        let err = find_binary("definitely-not-a-real-binary-name").unwrap_err();
        assert!(matches!(err, Error::ToolNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn locate_honors_explicit_override() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let bin = dir.path().join("exiftool");
        std::fs::write(&bin, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut config = Config::default();
        config.exiftool_bin = Some(bin.clone());
        let tool = ExifTool::locate(&config).unwrap();
        assert_eq!(tool.bin(), bin);
    }

    #[test]
    fn locate_rejects_bad_override() {
        let mut config = Config::default();
        config.exiftool_bin = Some("/nonexistent/exiftool".into());
        assert!(matches!(
            ExifTool::locate(&config),
            Err(Error::ToolNotFound(_))
        ));
    }
}
