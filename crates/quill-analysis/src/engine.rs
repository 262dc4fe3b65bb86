//! Engine-space data model and the analysis-engine collaborator trait.
//!
//! The engine is external: it parses, type-checks, and resolves symbols on
//! its own, pulling text through the script host. This module only fixes the
//! vocabulary the adapter and the engine share. All offsets and spans are in
//! Unicode scalar values within the addressed document.

use crate::vfs::ScriptPath;

/// An (offset, length) pair in engine space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Offset of the first character covered.
    pub start: usize,
    /// Number of characters covered.
    pub length: usize,
}

impl Span {
    /// Creates a span from its start offset and length.
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Offset one past the last character covered.
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// A span anchored to a specific document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSpan {
    /// Engine-space address of the document.
    pub path: ScriptPath,
    /// Location within that document.
    pub span: Span,
}

/// Broad classification of a completion entry, mapped onto protocol item
/// kinds by the completion handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompletionEntryKind {
    Function,
    Method,
    Property,
    Variable,
    Constant,
    Class,
    Module,
    Keyword,
}

/// One completion candidate produced by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionEntry {
    /// Label inserted when the entry is accepted.
    pub name: String,
    /// Classification for display purposes.
    pub kind: CompletionEntryKind,
    /// Optional signature or type rendering.
    pub detail: Option<String>,
    /// Span of existing text the entry replaces, when the engine knows it.
    pub replacement: Option<Span>,
}

/// Severity of an engine diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Suggestion,
}

/// A possibly nested diagnostic message.
///
/// Engines report elaborated messages as chains; the adapter flattens them
/// to indented text before they cross the protocol boundary.
///
/// # Examples
///
/// ```
/// use quill_analysis::engine::MessageChain;
///
/// let message = MessageChain {
///     text: "type mismatch".into(),
///     details: vec![MessageChain::plain("expected Number")],
/// };
/// assert_eq!(message.flatten(), "type mismatch\n  expected Number");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageChain {
    /// Message for this level of the chain.
    pub text: String,
    /// Elaborations, each one level deeper.
    pub details: Vec<MessageChain>,
}

impl MessageChain {
    /// A single-level message with no elaborations.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            details: Vec::new(),
        }
    }

    /// Renders the chain as indented plain text, two spaces per level.
    pub fn flatten(&self) -> String {
        let mut out = String::new();
        self.flatten_into(&mut out, 0);
        out
    }

    fn flatten_into(&self, out: &mut String, depth: usize) {
        if depth > 0 {
            out.push('\n');
            for _ in 0..depth {
                out.push_str("  ");
            }
        }
        out.push_str(&self.text);
        for detail in &self.details {
            detail.flatten_into(out, depth + 1);
        }
    }
}

/// One semantic diagnostic as reported by the engine.
///
/// `span` is optional: the engine may produce file-level diagnostics with no
/// position, and those are dropped before reaching the protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineDiagnostic {
    /// Location of the problem, if the engine attached one.
    pub span: Option<Span>,
    /// Severity classification.
    pub severity: Severity,
    /// Engine-assigned diagnostic code.
    pub code: Option<i32>,
    /// Structured message.
    pub message: MessageChain,
}

/// Quick-info (hover) payload: rendered display text plus the span it
/// describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickInfo {
    /// Display text, already rendered by the engine.
    pub text: String,
    /// Span of the token the text describes.
    pub span: Span,
}

/// All highlight spans the engine found within one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightGroup {
    /// Document the spans belong to.
    pub path: ScriptPath,
    /// Highlighted spans within that document.
    pub spans: Vec<Span>,
}

/// Outcome of a rename-eligibility query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameEligibility {
    /// The token can be renamed.
    Renameable {
        /// Current token text, used as the placeholder.
        placeholder: String,
        /// Span of the token that triggered the rename.
        span: Span,
    },
    /// The token cannot be renamed (keywords, literals, library symbols).
    NotRenameable {
        /// Engine-provided explanation, for logging only.
        reason: String,
    },
}

/// The external analysis engine.
///
/// One instance is bound to one [`crate::ScriptHost`] for its lifetime; it
/// pulls tracked documents, versions, snapshots, settings, and import
/// resolution from the host, and nothing else. Queries are synchronous,
/// deterministic apart from version stamps, and treated as bounded-time,
/// non-interruptible calls. A `None` result means the engine has nothing to
/// say for that query; it is never an error.
pub trait AnalysisEngine: Send + Sync {
    /// Completion candidates at an offset.
    fn completions_at(&self, document: &ScriptPath, offset: usize) -> Option<Vec<CompletionEntry>>;

    /// Semantic diagnostics for a whole document.
    fn semantic_diagnostics(&self, document: &ScriptPath) -> Vec<EngineDiagnostic>;

    /// Definition sites for the symbol at an offset.
    fn definitions_at(&self, document: &ScriptPath, offset: usize) -> Option<Vec<DocumentSpan>>;

    /// Quick-info for the token at an offset.
    fn quick_info_at(&self, document: &ScriptPath, offset: usize) -> Option<QuickInfo>;

    /// Every reference to the symbol at an offset.
    fn references_at(&self, document: &ScriptPath, offset: usize) -> Option<Vec<DocumentSpan>>;

    /// Occurrence highlights for the symbol at an offset, searched across
    /// `scope`.
    fn highlights_at(
        &self,
        document: &ScriptPath,
        offset: usize,
        scope: &[ScriptPath],
    ) -> Option<Vec<HighlightGroup>>;

    /// Whether the token at an offset may be renamed.
    fn rename_info_at(&self, document: &ScriptPath, offset: usize) -> RenameEligibility;

    /// Every location a rename of the symbol at an offset must edit.
    fn rename_locations_at(&self, document: &ScriptPath, offset: usize)
    -> Option<Vec<DocumentSpan>>;
}
