//! Error types for library location and loading

use crate::platform::Platform;
use thiserror::Error;

/// Errors that can occur while locating or loading a native library
#[derive(Debug, Error)]
pub enum LibraryError {
    /// No candidate file exists after exhausting the search strategy
    #[error("{label} not found: {name} (searched {search_var})")]
    NotFound {
        /// File name that was searched for
        name: String,
        /// Environment variable whose directories were searched
        search_var: String,
        /// Human-readable label for the thing being looked up
        label: String,
    },

    /// A required string input was empty or missing
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The detected platform has no loader backend
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(Platform),

    /// The OS loader rejected a file (bad format, missing dependencies,
    /// architecture mismatch), or the file could not be mapped at all
    #[error("Failed to load {path}: {detail}")]
    NativeLoadFailure {
        /// Path that was handed to the OS loader
        path: String,
        /// Loader's last-error text
        detail: String,
    },

    /// The OS loader refused to release a handle during explicit disposal
    #[error("Failed to unload {path}: {detail}")]
    ReleaseFailure {
        /// Path the library was loaded from
        path: String,
        /// Loader's last-error text
        detail: String,
    },

    /// Handle bookkeeping broke: release attempted while the handle still
    /// claims validity but no backend is bound
    #[error("Internal consistency error: {0}")]
    InternalConsistency(String),
}
