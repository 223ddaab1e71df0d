use std::path::PathBuf;

/// Rendered length of one path inside a command line: the path itself plus
/// two double quotes and a separating space.
fn rendered_len(path: &PathBuf) -> usize {
    path.as_os_str().len() + 3
}

/// Partition `paths` into ordered batches so that each batch's rendered
/// command line stays under `char_limit`.
///
/// exiftool takes every file as a positional argument:
///
/// ```text
/// exiftool -xmlFormat "file_1" "file_2" ... "file_n"
/// ```
///
/// so with enough files a single invocation would blow past the command-line
/// character ceiling. The split is greedy and order-preserving: the path that
/// would push the running total over the per-batch budget closes the current
/// batch and opens the next one. A path longer than the whole budget still
/// gets a batch of its own — paths are never split.
pub fn plan_batches(paths: &[PathBuf], char_limit: usize, tool_name: &str) -> Vec<Vec<PathBuf>> {
    // Reserve room for the binary name and the space after it.
    let budget = char_limit.saturating_sub(tool_name.len() + 1);

    let mut batches = Vec::new();
    let mut current: Vec<PathBuf> = Vec::new();
    let mut count = 0usize;

    for path in paths {
        let len = rendered_len(path);
        if !current.is_empty() && count + len > budget {
            batches.push(std::mem::take(&mut current));
            count = 0;
        }
        count += len;
        current.push(path.clone());
    }

    if !current.is_empty() {
        batches.push(current);
    }

    batches
}
