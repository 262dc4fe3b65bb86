//! Bidirectional translation between protocol-space URIs and engine-space
//! script addresses.
//!
//! The editor names documents by URI; the engine names them by absolute
//! path. The bridge is the only place where the two schemes meet, and the
//! translation must be bijective over the addressable domain so a document
//! never acquires two identities.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tower_lsp_server::ls_types::Uri;

use crate::workspace::Workspace;

/// File extension shared by every addressable Quill document.
pub const SOURCE_EXTENSION: &str = "quill";

/// Engine-space address of a script document.
///
/// A newtype so protocol URIs and engine paths cannot be confused: every
/// crossing between the two spaces goes through [`VfsBridge`].
///
/// # Examples
///
/// ```
/// use quill_analysis::ScriptPath;
///
/// let path = ScriptPath::new("/proj/main.quill");
/// assert_eq!(path.as_str(), "/proj/main.quill");
/// assert_eq!(path.to_string(), "/proj/main.quill");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScriptPath(String);

impl ScriptPath {
    /// Wraps an engine-space path string.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The raw path string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory portion of the address, without the trailing separator.
    pub(crate) fn parent(&self) -> &str {
        match self.0.rfind('/') {
            Some(0) | None => "/",
            Some(idx) => &self.0[..idx],
        }
    }
}

impl fmt::Display for ScriptPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Translates document identities between the two addressing schemes and
/// answers existence/read questions by delegating to the workspace
/// collaborator.
pub struct VfsBridge<W> {
    files: Arc<W>,
}

impl<W: Workspace> VfsBridge<W> {
    /// Creates a bridge over the given collaborator.
    pub fn new(files: Arc<W>) -> Self {
        Self { files }
    }

    /// Protocol URI to engine address.
    ///
    /// Returns `None` for URIs outside the addressable domain (anything that
    /// is not a file-scheme document identifier).
    pub fn engine_path(&self, uri: &Uri) -> Option<ScriptPath> {
        let path = uri.to_file_path()?;
        Some(ScriptPath::new(path.to_string_lossy().into_owned()))
    }

    /// Engine address to protocol URI. Inverse of [`Self::engine_path`].
    pub fn protocol_uri(&self, path: &ScriptPath) -> Option<Uri> {
        Uri::from_file_path(Path::new(path.as_str()))
    }

    /// Whether the collaborator can see a document at `path`.
    pub fn exists(&self, path: &ScriptPath) -> bool {
        self.files.exists(path)
    }

    /// Current text at `path`. `None` marks the document as structurally
    /// absent; the engine then treats the address as missing.
    pub fn read(&self, path: &ScriptPath) -> Option<String> {
        self.files.read(path)
    }
}
