//! Discovery of modules in files.
//!
//! Files are found with [`Discover`] (by default with [`GlobDiscovery`]),
//! then each of them is turned into module descriptors with [`FileLookup`] and registered in the container.

mod annotation;
mod glob;

pub use annotation::AnnotationLookup;
pub use glob::GlobDiscovery;

use core::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, debug_span, error, Instrument as _};

use crate::{container::Container, errors::LookupErrorKind, module::ModuleDescriptor};

/// Options of file discovery
/// ## Fields
/// - `root`:
///   Directory to search in. Patterns are matched against paths relative to it.
/// - `ignore`:
///   Glob patterns of files to skip, even if they match the lookup patterns.
/// - `follow_links`:
///   If `true`, symbolic links are followed.
/// - `max_depth`:
///   Maximum depth of the search relative to `root`, unbounded if `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOptions {
    pub root: PathBuf,
    pub ignore: Vec<String>,
    pub follow_links: bool,
    pub max_depth: Option<usize>,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            ignore: Vec::new(),
            follow_links: false,
            max_depth: None,
        }
    }
}

impl LookupOptions {
    #[inline]
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_ignore(mut self, pattern: impl Into<String>) -> Self {
        self.ignore.push(pattern.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// Finds files matching glob patterns
pub trait Discover {
    /// # Errors
    /// Returns an error if a pattern is invalid or the search fails
    fn discover(&self, patterns: &[&str], options: &LookupOptions) -> Result<Vec<PathBuf>, LookupErrorKind>;
}

/// Extracts module descriptors from a file
pub trait FileLookup {
    fn lookup_file(&self, path: &Path) -> impl Future<Output = Result<Vec<ModuleDescriptor>, LookupErrorKind>> + Send;
}

/// Modules registered from a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovered {
    pub file: PathBuf,
    pub modules: Vec<Box<str>>,
}

impl Container {
    /// Registers modules of files matching `patterns`, found with [`GlobDiscovery`].
    ///
    /// # Errors
    /// See [`Container::lookup_with`]
    #[inline]
    pub async fn lookup<L: FileLookup>(
        &self,
        patterns: &[&str],
        options: &LookupOptions,
        file_lookup: &L,
    ) -> Result<Vec<Discovered>, LookupErrorKind> {
        self.lookup_with(&GlobDiscovery, patterns, options, file_lookup).await
    }

    /// Registers modules of files matching `patterns`, found with `discovery`.
    /// Discovery runs on the blocking thread pool, files are handled in the order of discovery.
    ///
    /// # Warning
    /// Modules registered before a failure are kept, including ones of the failed file.
    ///
    /// # Errors
    /// - Returns errors of `discovery` and `file_lookup`
    /// - Returns [`LookupErrorKind::Join`] if the discovery task panics
    /// - Returns [`LookupErrorKind::Register`] if a module can't be registered
    pub async fn lookup_with<D: Discover + Clone + Send + 'static, L: FileLookup>(
        &self,
        discovery: &D,
        patterns: &[&str],
        options: &LookupOptions,
        file_lookup: &L,
    ) -> Result<Vec<Discovered>, LookupErrorKind> {
        let files = discover_blocking(discovery, patterns, options)
            .await
            .inspect_err(|err| error!("{}", err))?;
        debug!(count = files.len(), "Files discovered");

        let mut discovered = Vec::with_capacity(files.len());
        for file in files {
            let modules = self
                .register_file(&file, file_lookup)
                .instrument(debug_span!("lookup", file = %file.display()))
                .await?;
            discovered.push(Discovered { file, modules });
        }
        Ok(discovered)
    }

    async fn register_file<L: FileLookup>(&self, file: &Path, file_lookup: &L) -> Result<Vec<Box<str>>, LookupErrorKind> {
        let descriptors = file_lookup.lookup_file(file).await.inspect_err(|err| error!("{}", err))?;

        let mut modules = Vec::with_capacity(descriptors.len());
        for ModuleDescriptor { name, definition } in descriptors {
            self.register(name.clone(), definition)
                .map_err(|source| LookupErrorKind::Register {
                    path: file.to_path_buf(),
                    source,
                })?;
            modules.push(name);
        }

        debug!(?modules, "Registered");
        Ok(modules)
    }
}

async fn discover_blocking<D: Discover + Clone + Send + 'static>(
    discovery: &D,
    patterns: &[&str],
    options: &LookupOptions,
) -> Result<Vec<PathBuf>, LookupErrorKind> {
    let discovery = discovery.clone();
    let patterns = patterns.iter().map(ToString::to_string).collect::<Vec<_>>();
    let options = options.clone();

    tokio::task::spawn_blocking(move || {
        let patterns = patterns.iter().map(String::as_str).collect::<Vec<_>>();
        discovery.discover(&patterns, &options)
    })
    .await?
}
