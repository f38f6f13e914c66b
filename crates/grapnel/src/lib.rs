//! grapnel: cross-platform location and loading of native shared libraries
//!
//! This crate provides:
//! - Platform detection with macOS disambiguation (Platform)
//! - Search-variable based library path resolution (SearchPath, resolve_first_full_path)
//! - A uniform loader capability surface over the OS primitives (LoaderBackend)
//! - An RAII handle owning one loaded library (NativeLibrary)
//!
//! Scope ends at raw entry points: no calling-convention marshaling, no
//! symbol-signature binding, no versioned-library resolution.

pub mod backend;
pub mod error;
pub mod library;
pub mod path;
pub mod platform;

// Re-export the public surface
pub use backend::{backend_for, LoaderBackend, RawHandle};
pub use error::LibraryError;
pub use library::NativeLibrary;
pub use path::{
    find_candidates, find_via_env_var, library_file_name, resolve_first_full_path, SearchPath,
    DEFAULT_LABEL,
};
pub use platform::Platform;
