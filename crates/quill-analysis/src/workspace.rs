//! The capability surface the adapter depends on.
//!
//! Everything the script host needs from the outside world fits in five
//! functions: file existence, file read, module resolution, the fixed
//! compiler settings, and the default-library identity. Keeping the surface
//! this narrow is what makes the whole core testable by substitution.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::vfs::{SOURCE_EXTENSION, ScriptPath};

/// Fixed configuration handed to the analysis engine.
///
/// The adapter never varies these per request or per document; one value is
/// chosen when the host is built and returned unchanged for its lifetime.
/// Whether the engine emits diagnostics for unresolved imports is governed
/// by `report_unresolved_imports`; that behavior belongs to the engine's
/// resolution strictness, not to the adapter.
///
/// # Examples
///
/// ```
/// use quill_analysis::CompilerSettings;
///
/// let settings = CompilerSettings::default();
/// assert!(settings.strict);
/// assert!(!settings.report_unresolved_imports);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerSettings {
    /// Enable the engine's strict checking mode.
    pub strict: bool,
    /// Emit diagnostics for imports that fail to resolve.
    pub report_unresolved_imports: bool,
    /// Type-check the default library alongside user documents.
    pub checked_library: bool,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            strict: true,
            report_unresolved_imports: false,
            checked_library: false,
        }
    }
}

/// External collaborator backing file reads and module resolution.
///
/// All paths are engine-space addresses. Absence is an explicit outcome,
/// never an error: `read` returns `None` for a document that cannot be read,
/// and `resolve_module` returns `None` for a specifier that does not resolve.
/// Callers degrade per their own contracts; nothing here aborts an analysis.
pub trait Workspace: Send + Sync {
    /// Whether a document exists at `path`.
    fn exists(&self, path: &ScriptPath) -> bool;

    /// Current text of the document at `path`, or `None` if unreadable.
    fn read(&self, path: &ScriptPath) -> Option<String>;

    /// Resolves an import specifier relative to its containing document.
    ///
    /// Returns the raw resolved path, or `None` when the specifier does not
    /// name a known module. The returned path may omit the source extension;
    /// [`crate::resolver::ModuleResolver`] canonicalizes it.
    fn resolve_module(&self, specifier: &str, containing: &ScriptPath) -> Option<String>;

    /// The fixed compiler settings for this workspace.
    fn compiler_settings(&self) -> CompilerSettings;

    /// Engine-space address of the default library.
    fn default_library(&self) -> ScriptPath;
}

/// In-memory [`Workspace`] for embedding tests and benchmarks.
///
/// Holds documents in a concurrent map and resolves relative import
/// specifiers (`./`, `../`) against the containing document's directory.
/// Bare specifiers are reported unresolved.
///
/// # Examples
///
/// ```
/// use quill_analysis::{MemoryWorkspace, ScriptPath, Workspace};
///
/// let files = MemoryWorkspace::new();
/// files.insert(ScriptPath::new("/proj/main.quill"), "import \"./util\"");
/// files.insert(ScriptPath::new("/proj/util.quill"), "export const n = 1");
///
/// let containing = ScriptPath::new("/proj/main.quill");
/// let resolved = files.resolve_module("./util", &containing);
/// assert_eq!(resolved.as_deref(), Some("/proj/util.quill"));
/// assert_eq!(files.resolve_module("net", &containing), None);
/// ```
#[derive(Debug)]
pub struct MemoryWorkspace {
    files: DashMap<ScriptPath, String>,
    settings: CompilerSettings,
    default_library: ScriptPath,
}

impl MemoryWorkspace {
    /// Creates an empty workspace with default settings and the conventional
    /// default-library address.
    pub fn new() -> Self {
        Self {
            files: DashMap::new(),
            settings: CompilerSettings::default(),
            default_library: ScriptPath::new("/quill/lib/core.quill"),
        }
    }

    /// Inserts or replaces a document.
    pub fn insert(&self, path: ScriptPath, text: impl Into<String>) {
        self.files.insert(path, text.into());
    }

    /// Removes a document, if present.
    pub fn remove(&self, path: &ScriptPath) {
        self.files.remove(path);
    }

    /// Number of documents currently held.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the workspace holds no documents.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Default for MemoryWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace for MemoryWorkspace {
    fn exists(&self, path: &ScriptPath) -> bool {
        self.files.contains_key(path)
    }

    fn read(&self, path: &ScriptPath) -> Option<String> {
        self.files.get(path).map(|text| text.clone())
    }

    fn resolve_module(&self, specifier: &str, containing: &ScriptPath) -> Option<String> {
        if !specifier.starts_with("./") && !specifier.starts_with("../") {
            return None;
        }

        let joined = format!("{}/{}", containing.parent(), specifier);
        let mut candidate = normalize_path(&joined);
        if !candidate.ends_with(&format!(".{SOURCE_EXTENSION}")) {
            candidate.push('.');
            candidate.push_str(SOURCE_EXTENSION);
        }

        let resolved = ScriptPath::new(candidate);
        if self.exists(&resolved) {
            Some(resolved.as_str().to_owned())
        } else {
            None
        }
    }

    fn compiler_settings(&self) -> CompilerSettings {
        self.settings.clone()
    }

    fn default_library(&self) -> ScriptPath {
        self.default_library.clone()
    }
}

/// Collapses `.` and `..` segments in an absolute slash-separated path.
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    let mut normalized = String::new();
    for segment in segments {
        normalized.push('/');
        normalized.push_str(segment);
    }
    if normalized.is_empty() {
        normalized.push('/');
    }
    normalized
}
