//! Open-document overlay over the embedding application's workspace.

use std::sync::Arc;

use dashmap::DashMap;
use quill_analysis::{CompilerSettings, ScriptPath, Workspace};

/// A [`Workspace`] that serves editor buffers before falling back to the
/// backing collaborator.
///
/// `didOpen`/`didChange` notifications feed the overlay; `didClose` clears
/// it. The script host keeps reading through the same five-function
/// capability and never learns which of the two stores answered; unsaved
/// editor state and on-store state are indistinguishable to the engine.
///
/// Module resolution stays with the backing collaborator: an open buffer
/// does not create importable modules the store cannot see.
pub struct WorkspaceOverlay<W> {
    open: DashMap<ScriptPath, String>,
    fallback: Arc<W>,
}

impl<W: Workspace> WorkspaceOverlay<W> {
    /// Creates an empty overlay in front of `fallback`.
    pub fn new(fallback: Arc<W>) -> Self {
        Self {
            open: DashMap::new(),
            fallback,
        }
    }

    /// Installs or replaces the buffer for an open document.
    pub fn set(&self, path: ScriptPath, text: String) {
        self.open.insert(path, text);
    }

    /// Drops the buffer for a closed document. Returns whether one existed.
    pub fn clear(&self, path: &ScriptPath) -> bool {
        self.open.remove(path).is_some()
    }

    /// Number of open buffers.
    pub fn open_count(&self) -> usize {
        self.open.len()
    }
}

impl<W: Workspace> Workspace for WorkspaceOverlay<W> {
    fn exists(&self, path: &ScriptPath) -> bool {
        self.open.contains_key(path) || self.fallback.exists(path)
    }

    fn read(&self, path: &ScriptPath) -> Option<String> {
        if let Some(buffer) = self.open.get(path) {
            return Some(buffer.clone());
        }
        self.fallback.read(path)
    }

    fn resolve_module(&self, specifier: &str, containing: &ScriptPath) -> Option<String> {
        self.fallback.resolve_module(specifier, containing)
    }

    fn compiler_settings(&self) -> CompilerSettings {
        self.fallback.compiler_settings()
    }

    fn default_library(&self) -> ScriptPath {
        self.fallback.default_library()
    }
}
