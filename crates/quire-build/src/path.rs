//! Output path derivation.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::config::BuildConfig;

/// Map a content file to the page it produces under `dist_dir`.
///
/// The configured index file becomes `dist_dir/index.html`. Every other file
/// becomes `dist_dir/<relative dir>/<stem>/index.html`, so `posts/hello.md`
/// is served at `/posts/hello/`.
pub fn resolve_output_path(file: &Path, config: &BuildConfig) -> PathBuf {
    let file = without_cur_dir(file);
    if file == without_cur_dir(&config.contents.index) {
        return config.dist_dir.join("index.html");
    }

    let src_dir = without_cur_dir(&config.contents.src_dir);
    let relative = file.strip_prefix(&src_dir).unwrap_or(&file);

    // Keep only plain segments so a stray file can never escape dist_dir
    let dir: PathBuf = relative
        .parent()
        .map(|parent| {
            parent
                .components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .collect()
        })
        .unwrap_or_default();

    let stem = relative.file_stem().unwrap_or(OsStr::new("index"));

    config.dist_dir.join(dir).join(stem).join("index.html")
}

/// `./contents/index.md` and `contents/index.md` name the same file.
fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> BuildConfig {
        let mut config = BuildConfig::default();
        config.dist_dir = PathBuf::from("dist");
        config.contents.src_dir = PathBuf::from("contents");
        config.contents.index = PathBuf::from("contents/pages/top.md");
        config
    }

    #[test]
    fn index_maps_to_root() {
        let path = resolve_output_path(Path::new("contents/pages/top.md"), &config());

        assert_eq!(path, PathBuf::from("dist/index.html"));
    }

    #[test]
    fn top_level_file_gets_pretty_url() {
        let path = resolve_output_path(Path::new("contents/about.md"), &config());

        assert_eq!(path, PathBuf::from("dist/about/index.html"));
    }

    #[test]
    fn nested_file_keeps_directory() {
        let path = resolve_output_path(Path::new("contents/posts/2024/hello.markdown"), &config());

        assert_eq!(path, PathBuf::from("dist/posts/2024/hello/index.html"));
    }

    #[test]
    fn extension_is_discarded() {
        let a = resolve_output_path(Path::new("contents/notes.md"), &config());
        let b = resolve_output_path(Path::new("contents/notes.html"), &config());

        assert_eq!(a, b);
    }

    #[test]
    fn non_index_file_named_index_is_not_special() {
        let path = resolve_output_path(Path::new("contents/index.md"), &config());

        assert_eq!(path, PathBuf::from("dist/index/index.html"));
    }

    #[test]
    fn file_outside_source_stays_inside_dist() {
        let path = resolve_output_path(Path::new("/elsewhere/../x/page.md"), &config());

        assert_eq!(path, PathBuf::from("dist/elsewhere/x/page/index.html"));
    }

    #[test]
    fn leading_cur_dir_is_ignored() {
        let mut config = config();
        config.contents.src_dir = PathBuf::from("./contents");
        config.contents.index = PathBuf::from("./contents/pages/top.md");

        assert_eq!(
            resolve_output_path(Path::new("contents/pages/top.md"), &config),
            PathBuf::from("dist/index.html")
        );
        assert_eq!(
            resolve_output_path(Path::new("contents/posts/hello.md"), &config),
            PathBuf::from("dist/posts/hello/index.html")
        );
        assert_eq!(
            resolve_output_path(Path::new("./contents/pages/top.md"), &self::config()),
            PathBuf::from("dist/index.html")
        );
    }

    #[test]
    fn is_deterministic() {
        let file = Path::new("contents/a/b.md");

        assert_eq!(
            resolve_output_path(file, &config()),
            resolve_output_path(file, &config())
        );
    }
}
