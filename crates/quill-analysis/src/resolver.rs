//! Import-specifier resolution against the workspace collaborator.

use std::sync::Arc;

use crate::vfs::{SOURCE_EXTENSION, ScriptPath};
use crate::workspace::Workspace;

/// Resolves import specifiers to canonical engine-space addresses.
///
/// The collaborator decides what a specifier means; this type only
/// canonicalizes the outcome to the fixed source extension. `None` is the
/// explicit unresolved marker: an unresolved import degrades that one
/// symbol's type information downstream and never aborts the surrounding
/// analysis.
pub struct ModuleResolver<W> {
    files: Arc<W>,
}

impl<W: Workspace> ModuleResolver<W> {
    /// Creates a resolver over the given collaborator.
    pub fn new(files: Arc<W>) -> Self {
        Self { files }
    }

    /// Resolves `specifier` relative to the document importing it.
    pub fn resolve(&self, specifier: &str, containing: &ScriptPath) -> Option<ScriptPath> {
        let raw = self.files.resolve_module(specifier, containing)?;
        Some(ScriptPath::new(with_source_extension(raw)))
    }
}

/// Appends the canonical source extension unless already present.
fn with_source_extension(mut path: String) -> String {
    let suffix = format!(".{SOURCE_EXTENSION}");
    if !path.ends_with(&suffix) {
        path.push_str(&suffix);
    }
    path
}
