//! The script host: the capability surface the analysis engine runs against.
//!
//! The engine sees the world exclusively through one of these: which
//! documents exist, what their text and version are, how imports resolve,
//! and which compiler settings apply. The host in turn sees the world only
//! through the five-function [`Workspace`] collaborator.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashSet;

use crate::error::{AnalysisError, Result};
use crate::resolver::ModuleResolver;
use crate::text::SourceText;
use crate::vfs::{ScriptPath, VfsBridge};
use crate::workspace::{CompilerSettings, Workspace};

/// An immutable (text, version) pairing handed to the engine for one
/// analysis cycle.
#[derive(Debug, Clone)]
pub struct Snapshot {
    text: Arc<str>,
    version: u64,
}

impl Snapshot {
    /// The snapshotted text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The version stamp issued with this snapshot.
    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Capability provider binding one analysis engine to one workspace.
///
/// Tracks the set of documents the engine should enumerate and issues the
/// version stamps that control the engine's cache reuse. All state is
/// internally synchronized; requests from a concurrent server loop need no
/// external locking.
pub struct ScriptHost<W> {
    files: Arc<W>,
    bridge: VfsBridge<W>,
    resolver: ModuleResolver<W>,
    tracked: DashSet<ScriptPath>,
    version: AtomicU64,
}

impl<W: Workspace> ScriptHost<W> {
    /// Creates a host over the given collaborator.
    pub fn new(files: Arc<W>) -> Self {
        Self {
            bridge: VfsBridge::new(Arc::clone(&files)),
            resolver: ModuleResolver::new(Arc::clone(&files)),
            files,
            tracked: DashSet::new(),
            version: AtomicU64::new(0),
        }
    }

    /// The URI ↔ engine-path bridge for this host.
    pub fn bridge(&self) -> &VfsBridge<W> {
        &self.bridge
    }

    /// The import resolver for this host.
    pub fn resolver(&self) -> &ModuleResolver<W> {
        &self.resolver
    }

    /// Admits a document opened by the editor into the tracked set.
    pub fn open_document(&self, path: ScriptPath) {
        tracing::debug!("document opened: {path}");
        self.tracked.insert(path);
        self.version.fetch_add(1, Ordering::SeqCst);
    }

    /// Records an editor-side change. The content itself is fetched on
    /// demand through the collaborator; only the generation advances here.
    pub fn notify_changed(&self, path: &ScriptPath) {
        tracing::trace!("document changed: {path}");
        self.version.fetch_add(1, Ordering::SeqCst);
    }

    /// Removes a closed document from the tracked set.
    pub fn close_document(&self, path: &ScriptPath) -> bool {
        tracing::debug!("document closed: {path}");
        self.version.fetch_add(1, Ordering::SeqCst);
        self.tracked.remove(path).is_some()
    }

    /// Ensures a document is tracked without a matching close.
    ///
    /// Diagnostics requests call this for every document they name, so a
    /// document enters the engine's world the first time diagnostics are
    /// requested for it, even when the resulting list is empty. Returns
    /// whether the document was newly added.
    pub fn track(&self, path: ScriptPath) -> bool {
        self.tracked.insert(path)
    }

    /// Whether a document is currently tracked.
    pub fn is_tracked(&self, path: &ScriptPath) -> bool {
        self.tracked.contains(path)
    }

    /// Engine-space addresses of every tracked document, sorted for
    /// deterministic enumeration.
    pub fn tracked_documents(&self) -> Vec<ScriptPath> {
        let mut documents: Vec<ScriptPath> =
            self.tracked.iter().map(|entry| entry.key().clone()).collect();
        documents.sort();
        documents
    }

    /// Number of tracked documents.
    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    /// Issues a version stamp for `document`.
    ///
    /// Every call returns a value never returned before, for any document,
    /// even when the content is unchanged. The host has no change
    /// notification channel from the backing store, so every read may see
    /// new content; a fresh stamp forces the engine to discard previously
    /// cached incremental state and reanalyze from scratch.
    pub fn next_version(&self, document: &ScriptPath) -> u64 {
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!("version {version} issued for {document}");
        version
    }

    /// Builds an immutable snapshot of the document's current content.
    pub fn snapshot(&self, path: &ScriptPath) -> Result<Snapshot> {
        let text = self
            .bridge
            .read(path)
            .ok_or_else(|| AnalysisError::DocumentUnreadable { path: path.clone() })?;
        Ok(Snapshot {
            text: Arc::from(text),
            version: self.next_version(path),
        })
    }

    /// Re-derives the document's text and line table from current content.
    ///
    /// Nothing is cached: two calls may observe different text if the
    /// backing store changed in between, which is exactly the point.
    pub fn source_text(&self, path: &ScriptPath) -> Result<SourceText> {
        let text = self
            .bridge
            .read(path)
            .ok_or_else(|| AnalysisError::DocumentUnreadable { path: path.clone() })?;
        Ok(SourceText::new(text))
    }

    /// Resolves a batch of import specifiers for one containing document.
    ///
    /// One outcome per specifier, in order. An unresolved specifier yields
    /// `None` in its slot and never fails the batch.
    pub fn resolve_imports(
        &self,
        specifiers: &[String],
        containing: &ScriptPath,
    ) -> Vec<Option<ScriptPath>> {
        specifiers
            .iter()
            .map(|specifier| {
                let resolved = self.resolver.resolve(specifier, containing);
                if resolved.is_none() {
                    tracing::debug!("unresolved import {specifier:?} in {containing}");
                }
                resolved
            })
            .collect()
    }

    /// The fixed compiler settings.
    pub fn compiler_settings(&self) -> CompilerSettings {
        self.files.compiler_settings()
    }

    /// Identity of the default library.
    pub fn default_library(&self) -> ScriptPath {
        self.files.default_library()
    }
}
