//! Static resource serving
//!
//! Static resources are checked before any registered controller: a request
//! path naming a regular file under the static root is answered with that
//! file. Existence is checked first and the file read afterwards, so a file
//! removed in between turns into a read error (500), not a 404.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use ahash::AHashMap;
use kite_core::{HttpRequest, HttpResponse, StatusCode};
use tracing::debug;

use crate::controller::Controller;
use crate::error::ServerResult;

/// Source of static resources addressed by request path
pub trait StaticResourceStore: Send + Sync {
    /// Whether `path` names a servable resource
    fn exists(&self, path: &str) -> bool;

    /// Load the whole resource
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;

    /// Content-Type to send with the resource
    fn content_type_for(&self, path: &str) -> String;
}

/// Extension -> Content-Type table
///
/// Keys are lowercase extensions without the dot. Anything not in the table
/// is resolved through `mime_guess`, ending at `application/octet-stream`.
#[derive(Debug, Clone)]
pub struct ContentTypes {
    types: AHashMap<String, String>,
}

impl ContentTypes {
    /// Create a table without the built-in entries
    pub fn empty() -> Self {
        Self {
            types: AHashMap::new(),
        }
    }

    /// Add or replace a mapping
    pub fn insert<E: AsRef<str>, V: Into<String>>(&mut self, extension: E, content_type: V) {
        let extension = extension.as_ref().trim_start_matches('.').to_ascii_lowercase();
        self.types.insert(extension, content_type.into());
    }

    /// Content-Type for a file path
    pub fn for_path(&self, path: &Path) -> String {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        if let Some(content_type) = extension.and_then(|ext| self.types.get(&ext)) {
            return content_type.clone();
        }

        mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string()
    }
}

impl Default for ContentTypes {
    fn default() -> Self {
        let mut types = Self::empty();
        types.insert("html", "text/html;charset=utf-8");
        types.insert("css", "text/css;charset=utf-8");
        types.insert("js", "application/javascript;charset=utf-8");
        types
    }
}

impl<K: AsRef<str>, V: Into<String>> Extend<(K, V)> for ContentTypes {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (extension, content_type) in iter {
            self.insert(extension, content_type);
        }
    }
}

/// Static resources read from a directory on disk
#[derive(Debug, Clone)]
pub struct FsResourceStore {
    root: PathBuf,
    content_types: ContentTypes,
}

impl FsResourceStore {
    /// Serve files under `root` with the built-in content types
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self::with_content_types(root, ContentTypes::default())
    }

    pub fn with_content_types<P: Into<PathBuf>>(root: P, content_types: ContentTypes) -> Self {
        Self {
            root: root.into(),
            content_types,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a request path onto the file system
    ///
    /// Only plain name components are accepted; `..`, `.`, an absolute path
    /// after the leading slash, or nothing at all yields `None`.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));

        let mut components = relative.components().peekable();
        components.peek()?;
        if !components.all(|component| matches!(component, Component::Normal(_))) {
            return None;
        }

        Some(self.root.join(relative))
    }
}

impl StaticResourceStore for FsResourceStore {
    fn exists(&self, path: &str) -> bool {
        self.resolve(path)
            .and_then(|file| std::fs::metadata(file).ok())
            .is_some_and(|metadata| metadata.is_file())
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        let file = self.resolve(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("path {:?} is outside the static root", path),
            )
        })?;
        std::fs::read(file)
    }

    fn content_type_for(&self, path: &str) -> String {
        self.content_types.for_path(Path::new(path))
    }
}

/// Serves static resources for GET; every other method is 405
pub struct StaticResourceController {
    store: Arc<dyn StaticResourceStore>,
}

impl StaticResourceController {
    pub fn new(store: Arc<dyn StaticResourceStore>) -> Self {
        Self { store }
    }
}

impl Controller for StaticResourceController {
    fn matched_path(&self) -> &str {
        "<static>"
    }

    fn do_get(&self, request: &HttpRequest, response: &mut HttpResponse) -> ServerResult<()> {
        let path = request.path();
        let contents = self.store.read(path)?;
        debug!("Serving static resource {} ({} bytes)", path, contents.len());

        response
            .set_status(StatusCode::OK)
            .set_content_type(self.store.content_type_for(path))
            .set_body(contents);
        Ok(())
    }
}
