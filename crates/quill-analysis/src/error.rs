use thiserror::Error;

use crate::vfs::ScriptPath;

/// Error types for the adapter core.
///
/// These never cross a feature-handler boundary: handlers translate every
/// variant into the null/empty outcome their contract prescribes. The enum
/// exists so the host can say precisely *why* a request short-circuited.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The backing store reported the document absent or unreadable.
    #[error("document is not readable: {path}")]
    DocumentUnreadable {
        /// Engine-space address of the missing document.
        path: ScriptPath,
    },

    /// A protocol URI that does not map into the engine's address space.
    #[error("URI is outside the addressable document space: {uri}")]
    OutsideWorkspace {
        /// The offending URI, rendered for logging.
        uri: String,
    },
}

/// Convenience type alias for `Result<T, AnalysisError>`.
pub type Result<T> = std::result::Result<T, AnalysisError>;
