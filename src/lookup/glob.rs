use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::PathBuf;
use tracing::debug;
use walkdir::WalkDir;

use super::{Discover, LookupOptions};
use crate::errors::LookupErrorKind;

/// Walks [`LookupOptions::root`] and collects files matching any of the patterns.
///
/// Paths are matched relative to the root and returned joined with it, sorted by file name within a directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobDiscovery;

impl Discover for GlobDiscovery {
    fn discover(&self, patterns: &[&str], options: &LookupOptions) -> Result<Vec<PathBuf>, LookupErrorKind> {
        let include = glob_set(patterns)?;
        let ignore = glob_set(&options.ignore)?;

        let mut walker = WalkDir::new(&options.root)
            .follow_links(options.follow_links)
            .sort_by_file_name();
        if let Some(max_depth) = options.max_depth {
            walker = walker.max_depth(max_depth);
        }

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(&options.root).unwrap_or(entry.path());
            if !include.is_match(relative) {
                continue;
            }
            if ignore.is_match(relative) {
                debug!(file = %relative.display(), "Ignored");
                continue;
            }
            files.push(entry.into_path());
        }
        Ok(files)
    }
}

fn glob_set<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern.as_ref())?);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::GlobDiscovery;
    use crate::{
        lookup::{Discover as _, LookupOptions},
        LookupErrorKind,
    };

    use std::{fs, path::Path};
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn relative(root: &Path, files: Vec<std::path::PathBuf>) -> Vec<String> {
        files
            .into_iter()
            .map(|file| file.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_discover() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.rs");
        touch(dir.path(), "a.rs");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "nested/c.rs");
        touch(dir.path(), "nested/skip/d.rs");

        let options = LookupOptions::default().with_root(dir.path());
        let files = GlobDiscovery.discover(&["**/*.rs"], &options).unwrap();
        assert_eq!(relative(dir.path(), files), ["a.rs", "b.rs", "nested/c.rs", "nested/skip/d.rs"]);

        let options = options.with_ignore("**/skip/**");
        let files = GlobDiscovery.discover(&["**/*.rs", "*.txt"], &options).unwrap();
        assert_eq!(relative(dir.path(), files), ["a.rs", "b.rs", "nested/c.rs", "notes.txt"]);

        let options = LookupOptions::default().with_root(dir.path()).with_max_depth(1);
        let files = GlobDiscovery.discover(&["**/*.rs"], &options).unwrap();
        assert_eq!(relative(dir.path(), files), ["a.rs", "b.rs"]);
    }

    #[test]
    fn test_discover_invalid_pattern() {
        let dir = TempDir::new().unwrap();
        let options = LookupOptions::default().with_root(dir.path());

        let Err(LookupErrorKind::Pattern(_)) = GlobDiscovery.discover(&["a[.rs"], &options) else {
            panic!("invalid pattern should be reported");
        };
    }
}
