use core::future::Future;
use std::{collections::BTreeMap, path::Path};
use tracing::{debug, warn};

use super::FileLookup;
use crate::{definition::Definition, errors::LookupErrorKind, module::ModuleDescriptor};

const MARKER: &str = "@injectable(";

/// Finds `@injectable(name)` markers in a file and pairs each name with a definition from the catalog.
///
/// The file only declares which modules it provides; factories are supplied by the catalog,
/// so one catalog can serve many files.
#[derive(Debug, Clone, Default)]
pub struct AnnotationLookup {
    catalog: BTreeMap<Box<str>, Definition>,
}

impl AnnotationLookup {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn provide(mut self, name: impl Into<Box<str>>, definition: Definition) -> Self {
        self.insert(name, definition);
        self
    }

    #[inline]
    pub fn insert(&mut self, name: impl Into<Box<str>>, definition: Definition) -> Option<Definition> {
        self.catalog.insert(name.into(), definition)
    }
}

impl AnnotationLookup {
    async fn descriptors(&self, path: &Path) -> Result<Vec<ModuleDescriptor>, LookupErrorKind> {
        let source = tokio::fs::read_to_string(path).await.map_err(|source| LookupErrorKind::Read {
            path: path.to_path_buf(),
            source,
        })?;

        annotations(&source)
            .map(|name| match self.catalog.get(name) {
                Some(definition) => Ok(ModuleDescriptor::new(name, definition.clone())),
                None => Err(LookupErrorKind::UnknownModule {
                    path: path.to_path_buf(),
                    name: name.into(),
                }),
            })
            .collect()
    }
}

impl FileLookup for AnnotationLookup {
    #[inline]
    fn lookup_file(&self, path: &Path) -> impl Future<Output = Result<Vec<ModuleDescriptor>, LookupErrorKind>> + Send {
        self.descriptors(path)
    }
}

/// Names of `@injectable(name)` markers in order of appearance.
/// A marker is closed on its own line, unclosed ones are skipped.
fn annotations(source: &str) -> impl Iterator<Item = &str> {
    source
        .match_indices(MARKER)
        .filter_map(|(index, _)| {
            let rest = &source[index + MARKER.len()..];
            let line = rest.find('\n').map_or(rest, |end| &rest[..end]);
            let Some(end) = line.find(')') else {
                warn!("Unclosed injectable marker");
                return None;
            };
            Some(line[..end].trim())
        })
        .filter(|name| {
            if name.is_empty() {
                debug!("Injectable marker without name skipped");
            }
            !name.is_empty()
        })
}

#[cfg(test)]
mod tests {
    use super::{annotations, AnnotationLookup};
    use crate::{lookup::FileLookup as _, Definition, InstantiateErrorKind, LookupErrorKind};

    use std::fs;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    #[test]
    fn test_annotations() {
        let source = "
            /// @injectable(logger)
            struct Logger;

            /** @injectable( db ) */
            struct Db;

            // @injectable() is skipped
            // @injectable(broken
        ";

        assert_eq!(annotations(source).collect::<Vec<_>>(), ["logger", "db"]);
        assert_eq!(annotations("struct Plain;").count(), 0);
        assert_eq!(
            annotations("// @injectable(broken\nfn main() {}\n// @injectable(app)\n").collect::<Vec<_>>(),
            ["app"]
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn test_lookup_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logger.rs");
        fs::write(&path, "/// @injectable(logger)\nstruct Logger;\n").unwrap();

        let lookup = AnnotationLookup::new().provide("logger", Definition::from_fn(|_| Ok::<_, InstantiateErrorKind>("app:")));
        let descriptors = lookup.lookup_file(&path).await.unwrap();

        assert_eq!(descriptors.len(), 1);
        assert_eq!(&*descriptors[0].name, "logger");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_lookup_file_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("unknown.rs");
        fs::write(&path, "// @injectable(unknown)").unwrap();

        let lookup = AnnotationLookup::new();
        let Err(LookupErrorKind::UnknownModule { name, .. }) = lookup.lookup_file(&path).await else {
            panic!("unknown module should be reported");
        };
        assert_eq!(&*name, "unknown");

        let Err(LookupErrorKind::Read { .. }) = lookup.lookup_file(&dir.path().join("missing.rs")).await else {
            panic!("missing file should be reported");
        };
    }
}
