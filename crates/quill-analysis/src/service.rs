//! The analysis service: one engine instance bound to one script host.

use std::sync::Arc;

use crate::engine::{
    AnalysisEngine, CompletionEntry, DocumentSpan, EngineDiagnostic, HighlightGroup, QuickInfo,
    RenameEligibility,
};
use crate::host::ScriptHost;
use crate::vfs::{ScriptPath, VfsBridge};
use crate::workspace::Workspace;

/// Owns the engine collaborator and the host it is bound to, and exposes the
/// feature-level queries the protocol handlers consume.
///
/// The service holds no request state of its own; everything mutable lives
/// in the host. Handlers are pure functions over a shared `Arc` of this.
pub struct AnalysisService<W> {
    engine: Arc<dyn AnalysisEngine>,
    host: Arc<ScriptHost<W>>,
}

impl<W: Workspace> AnalysisService<W> {
    /// Binds `engine` to `host`.
    ///
    /// The engine implementation is expected to hold its own reference to
    /// the same host for snapshot and resolution callbacks.
    pub fn new(engine: Arc<dyn AnalysisEngine>, host: Arc<ScriptHost<W>>) -> Self {
        Self { engine, host }
    }

    /// The script host this service is bound to.
    pub fn host(&self) -> &ScriptHost<W> {
        &self.host
    }

    /// Shorthand for the host's URI ↔ path bridge.
    pub fn bridge(&self) -> &VfsBridge<W> {
        self.host.bridge()
    }

    /// Completion candidates at an offset.
    pub fn completions_at(
        &self,
        document: &ScriptPath,
        offset: usize,
    ) -> Option<Vec<CompletionEntry>> {
        self.engine.completions_at(document, offset)
    }

    /// Semantic diagnostics for a document.
    pub fn semantic_diagnostics(&self, document: &ScriptPath) -> Vec<EngineDiagnostic> {
        self.engine.semantic_diagnostics(document)
    }

    /// Definition sites for the symbol at an offset.
    pub fn definitions_at(&self, document: &ScriptPath, offset: usize) -> Option<Vec<DocumentSpan>> {
        self.engine.definitions_at(document, offset)
    }

    /// Quick-info at an offset.
    pub fn quick_info_at(&self, document: &ScriptPath, offset: usize) -> Option<QuickInfo> {
        self.engine.quick_info_at(document, offset)
    }

    /// Reference locations for the symbol at an offset.
    pub fn references_at(&self, document: &ScriptPath, offset: usize) -> Option<Vec<DocumentSpan>> {
        self.engine.references_at(document, offset)
    }

    /// Occurrence highlights across the tracked set plus `document`.
    pub fn highlights_at(&self, document: &ScriptPath, offset: usize) -> Option<Vec<HighlightGroup>> {
        let mut scope = self.host.tracked_documents();
        if !scope.contains(document) {
            scope.push(document.clone());
        }
        self.engine.highlights_at(document, offset, &scope)
    }

    /// Rename eligibility for the token at an offset.
    pub fn rename_info_at(&self, document: &ScriptPath, offset: usize) -> RenameEligibility {
        self.engine.rename_info_at(document, offset)
    }

    /// Every location a rename must edit.
    pub fn rename_locations_at(
        &self,
        document: &ScriptPath,
        offset: usize,
    ) -> Option<Vec<DocumentSpan>> {
        self.engine.rename_locations_at(document, offset)
    }
}
