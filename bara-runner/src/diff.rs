//! Unified diff between the staged config document and a fresh render.

use std::io::ErrorKind;
use std::path::Path;

use similar::TextDiff;

use crate::error::{io_err, RunnerError};

/// Diff `rendered` against the document currently staged at `staged`.
///
/// A missing file diffs as empty. Returns `None` when nothing would change.
/// No files are written.
pub fn diff_staged(staged: &Path, rendered: &str) -> Result<Option<String>, RunnerError> {
    let existing = read_existing_or_empty(staged)?;
    let rendered = normalize_line_endings(rendered);
    if existing == rendered {
        return Ok(None);
    }

    let old_header = format!("a/{}", staged.display());
    let new_header = format!("b/{}", staged.display());
    let unified = TextDiff::from_lines(&existing, &rendered)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string();
    Ok(Some(unified))
}

fn read_existing_or_empty(path: &Path) -> Result<String, RunnerError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(normalize_line_endings(&content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}

fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn identical_content_has_no_diff() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("copy.bara.sky");
        std::fs::write(&path, "A = 1\r\n").unwrap();
        assert_eq!(diff_staged(&path, "A = 1\n").unwrap(), None);
    }

    #[test]
    fn missing_file_diffs_against_empty() {
        let dir = TempDir::new().unwrap();
        let diff = diff_staged(&dir.path().join("copy.bara.sky"), "A = 1\n")
            .unwrap()
            .expect("diff");
        assert!(diff.contains("+A = 1"));
    }

    #[test]
    fn changed_line_shows_both_sides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("copy.bara.sky");
        std::fs::write(&path, "SOT_BRANCH = \"main\"\n").unwrap();
        let diff = diff_staged(&path, "SOT_BRANCH = \"trunk\"\n").unwrap().unwrap();
        assert!(diff.contains("-SOT_BRANCH = \"main\""));
        assert!(diff.contains("+SOT_BRANCH = \"trunk\""));
    }
}
