//! Filesystem helpers: content discovery, asset copying and page writing.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::BuildError;
use crate::exclude::ExcludeSet;

/// Recursively list every file under `root`, skipping excluded paths.
///
/// Entries are visited in file-name order so the result is stable across runs.
pub fn discover_files(root: &Path, exclude: &[String]) -> Result<Vec<PathBuf>, BuildError> {
    if !root.is_dir() {
        return Err(BuildError::ReadError(format!(
            "Content directory not found: {}",
            root.display()
        )));
    }

    let excludes = ExcludeSet::new(exclude)?;
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| BuildError::ReadError(e.to_string()))?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if excludes.is_excluded(path, root) {
            tracing::debug!("Excluded {}", path.display());
            continue;
        }

        files.push(path.to_path_buf());
    }

    Ok(files)
}

/// Copy the tree under `src` into `dest`, merging with what is already there.
///
/// Returns the number of files copied.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<usize, BuildError> {
    let mut copied = 0;

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| BuildError::CopyError(e.to_string()))?;
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| BuildError::CopyError(format!("{}: {}", target.display(), e)))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| {
                BuildError::CopyError(format!(
                    "{} -> {}: {}",
                    entry.path().display(),
                    target.display(),
                    e
                ))
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Write `contents` to `path`, creating parent directories as needed.
pub fn ensure_and_write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| BuildError::WriteError(format!("{}: {}", parent.display(), e)))?;
    }

    fs::write(path, contents)
        .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn discovers_files_in_stable_order() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("posts/2024")).unwrap();
        fs::write(root.join("b.md"), "").unwrap();
        fs::write(root.join("a.md"), "").unwrap();
        fs::write(root.join("posts/2024/first.md"), "").unwrap();

        let files = discover_files(root, &[]).unwrap();

        assert_eq!(
            files,
            vec![
                root.join("a.md"),
                root.join("b.md"),
                root.join("posts/2024/first.md"),
            ]
        );
    }

    #[test]
    fn applies_exclusions() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("drafts")).unwrap();
        fs::write(root.join("index.md"), "").unwrap();
        fs::write(root.join("_layout.md"), "").unwrap();
        fs::write(root.join("drafts/idea.md"), "").unwrap();

        let exclude = vec!["**/_*".to_string(), "drafts/**".to_string()];
        let files = discover_files(root, &exclude).unwrap();

        assert_eq!(files, vec![root.join("index.md")]);
    }

    #[test]
    fn empty_directory_yields_no_files() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("empty/nested")).unwrap();

        let files = discover_files(temp.path(), &[]).unwrap();

        assert!(files.is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = tempdir().unwrap();

        let result = discover_files(&temp.path().join("missing"), &[]);

        assert!(matches!(result, Err(BuildError::ReadError(_))));
    }

    #[test]
    fn brackets_in_patterns_are_literal() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("[wip].md"), "").unwrap();
        fs::write(temp.path().join("w.md"), "").unwrap();

        let files = discover_files(temp.path(), &["[wip].md".to_string()]).unwrap();

        assert_eq!(files, vec![temp.path().join("w.md")]);
    }

    #[test]
    fn copies_tree_and_merges() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("static");
        let dest = temp.path().join("dist");
        fs::create_dir_all(src.join("css")).unwrap();
        fs::create_dir_all(dest.join("about")).unwrap();
        fs::write(src.join("favicon.ico"), [0u8, 1, 2]).unwrap();
        fs::write(src.join("css/site.css"), "body {}").unwrap();
        fs::write(dest.join("about/index.html"), "<p>about</p>").unwrap();

        let copied = copy_tree(&src, &dest).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(fs::read(dest.join("favicon.ico")).unwrap(), vec![0u8, 1, 2]);
        assert_eq!(
            fs::read_to_string(dest.join("css/site.css")).unwrap(),
            "body {}"
        );
        assert_eq!(
            fs::read_to_string(dest.join("about/index.html")).unwrap(),
            "<p>about</p>"
        );
    }

    #[test]
    fn writes_file_creating_parents_and_overwriting() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("a/b/index.html");

        ensure_and_write_file(&path, "first").unwrap();
        ensure_and_write_file(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }
}
