use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Media extensions exiftool is asked about. exiftool itself understands far
/// more; this list just keeps directory expansion from feeding it stray
/// sidecars and text files.
const MEDIA_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "gif",
    "tif", "tiff",
    "heic", "heif", "avif",
    // RAW formats
    "cr3", "cr2", "dng", "nef", "arw", "raf", "orf", "rw2", "pef", "srw",
    // Video
    "mov", "mp4", "avi", "m4v",
];

/// Toggles for the optional cleaning passes applied after extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Canonicalize tag names via the column map.
    pub clean_keys: bool,
    /// Coerce string values to typed primitives.
    pub clean_values: bool,
}

/// A validated set of media file paths.
///
/// Every path is absolutized and existence-checked at construction, so the
/// pipelines downstream never have to re-verify. Accepts one path or many.
///
/// # Example
///
/// ```rust,no_run
/// use photo_meta::pipeline::MediaPaths;
///
/// let files = MediaPaths::new(["/photos/a.jpg", "/photos/b.jpg"])?;
/// assert_eq!(files.len(), 2);
/// # Ok::<(), photo_meta::error::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MediaPaths(Vec<PathBuf>);

impl MediaPaths {
    /// Validate and absolutize the given paths. Fails with
    /// [`Error::InvalidInput`] on the first path that is not an existing
    /// file.
    pub fn new<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut validated = Vec::new();
        for path in paths {
            let path = path.into();
            if !path.is_file() {
                return Err(Error::InvalidInput(path));
            }
            validated.push(std::path::absolute(&path)?);
        }
        Ok(Self(validated))
    }

    /// Wrap a single file path.
    pub fn single<P: Into<PathBuf>>(path: P) -> Result<Self> {
        Self::new([path.into()])
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Collect supported media files from the given paths.
///
/// Accepts a mix of file paths and directory paths. Directories are walked
/// recursively (following symlinks); only files with supported media
/// extensions are included.
pub fn collect_media(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut media = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_supported_media(path) {
                media.push(path.clone());
            } else {
                log::warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let p = entry.path();
                if p.is_file() && is_supported_media(p) {
                    media.push(p.to_path_buf());
                }
            }
        } else {
            log::warn!("Path does not exist: {}", path.display());
        }
    }

    media
}

/// Check if a file has a supported media extension.
fn is_supported_media(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| MEDIA_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // ── MediaPaths ───────────────────────────────────────────────────

    #[test]
    fn media_paths_validates_existence() {
        let err = MediaPaths::new(["/nonexistent/photo.jpg"]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn media_paths_absolutizes() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.jpg");
        fs::write(&file, b"fake").unwrap();

        let files = MediaPaths::new([&file]).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files.paths()[0].is_absolute());
    }

    #[test]
    fn media_paths_rejects_directories() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            MediaPaths::single(dir.path()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn media_paths_empty_input_is_fine() {
        let files = MediaPaths::new(Vec::<PathBuf>::new()).unwrap();
        assert!(files.is_empty());
    }

    // ── is_supported_media ───────────────────────────────────────────

    #[test]
    fn supported_media_extensions() {
        assert!(is_supported_media(Path::new("photo.jpg")));
        assert!(is_supported_media(Path::new("photo.JPEG")));
        assert!(is_supported_media(Path::new("photo.heic")));
        assert!(is_supported_media(Path::new("clip.mov")));
        assert!(is_supported_media(Path::new("photo.dng")));
    }

    #[test]
    fn unsupported_media_extensions() {
        assert!(!is_supported_media(Path::new("doc.pdf")));
        assert!(!is_supported_media(Path::new("notes.txt")));
        assert!(!is_supported_media(Path::new("sidecar.xmp")));
        assert!(!is_supported_media(Path::new("noext")));
    }

    // ── collect_media ────────────────────────────────────────────────

    #[test]
    fn collect_media_single_file() {
        let dir = TempDir::new().unwrap();
        let jpg = dir.path().join("test.jpg");
        fs::write(&jpg, b"fake").unwrap();

        let media = collect_media(&[jpg.clone()]);
        assert_eq!(media, vec![jpg]);
    }

    #[test]
    fn collect_media_directory_recursive() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();

        fs::write(dir.path().join("a.jpg"), b"fake").unwrap();
        fs::write(sub.join("b.heic"), b"fake").unwrap();
        fs::write(sub.join("c.txt"), b"fake").unwrap();

        let media = collect_media(&[dir.path().to_path_buf()]);
        assert_eq!(media.len(), 2);
    }

    #[test]
    fn collect_media_skips_unsupported_and_missing() {
        let dir = TempDir::new().unwrap();
        let txt = dir.path().join("readme.txt");
        fs::write(&txt, b"hello").unwrap();

        assert!(collect_media(&[txt]).is_empty());
        assert!(collect_media(&[PathBuf::from("/nonexistent/path")]).is_empty());
    }
}
