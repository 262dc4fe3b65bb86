//! LSP protocol handlers.
//!
//! One module per protocol feature:
//!
//! - [`completion`]: member and symbol completions with replacement edits
//! - [`diagnostics`]: semantic diagnostics (pull model)
//! - [`definition`]: go-to-definition
//! - [`hover`]: quick-info rendering
//! - [`references`]: find-all-references
//! - [`highlight`]: occurrence highlights
//! - [`rename`]: rename eligibility and workspace edits
//!
//! # Handler Architecture
//!
//! Every handler is a pure function of the shared `AnalysisService` and the
//! request parameters; no handler keeps state between calls beyond what the
//! script host already tracks. The common shape is:
//!
//! 1. Translate the document URI into an engine-space address
//! 2. Rebuild the document's `SourceText` and translate the position to an
//!    offset
//! 3. Run the engine query
//! 4. Translate result spans back into ranges using the owning document's
//!    current text
//!
//! Degradation is silent by contract: an unreadable document, an unresolved
//! target, or a malformed engine record produces the handler's null/empty
//! outcome, never an error the client would see.

pub mod completion;
pub mod definition;
pub mod diagnostics;
pub mod highlight;
pub mod hover;
pub mod references;
pub mod rename;
