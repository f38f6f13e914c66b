//! RAII handle over one loaded native library
//!
//! A `NativeLibrary` owns exactly one OS library handle. The backend is
//! chosen once from the platform at construction; release happens exactly
//! once, either through an explicit [`NativeLibrary::close`] or the `Drop`
//! safety net, and a repeat release is a no-op.

use std::ptr;

use crate::backend::{backend_for, LoaderBackend, RawHandle};
use crate::error::LibraryError;
use crate::path::{self, DEFAULT_LABEL};
use crate::platform::Platform;

/// A loaded native library.
///
/// States: Unloaded (never observable from outside), Loaded, Released.
/// The raw handle is never exposed and the type is not `Clone`, so a
/// handle has exactly one owner for its whole lifetime.
pub struct NativeLibrary {
    backend: Option<&'static dyn LoaderBackend>,
    handle: RawHandle,
    path: String,
}

impl NativeLibrary {
    /// Load the library at `path` using the backend for `platform`.
    ///
    /// Fails with [`LibraryError::UnsupportedPlatform`] when no backend
    /// serves the platform, and with [`LibraryError::NativeLoadFailure`]
    /// (carrying the loader's last-error text) when the OS loader returns
    /// an invalid handle.
    pub fn open(platform: Platform, path: &str) -> Result<Self, LibraryError> {
        let backend = backend_for(platform)?;

        let handle = backend.load(path);
        if handle.is_null() {
            return Err(LibraryError::NativeLoadFailure {
                path: path.to_string(),
                detail: backend.last_error(),
            });
        }

        Ok(NativeLibrary {
            backend: Some(backend),
            handle,
            path: path.to_string(),
        })
    }

    /// Load a library by its short name: applies the platform file-name
    /// convention, resolves the first existing candidate on the default
    /// search variable, then loads it.
    pub fn open_by_name(platform: Platform, base_name: &str) -> Result<Self, LibraryError> {
        let file_name = path::library_file_name(platform, base_name)?;
        let full_path =
            path::resolve_first_full_path(platform, &file_name, DEFAULT_LABEL, None)?;
        Self::open(platform, &full_path.to_string_lossy())
    }

    /// Look up an exported symbol and return its raw address.
    ///
    /// Forwards straight to the backend: a missing symbol yields a null
    /// address rather than an error, and the caller must check before use.
    pub fn symbol_address(&self, symbol: &str) -> RawHandle {
        match self.backend {
            Some(backend) if !self.handle.is_null() => {
                backend.resolve_symbol(self.handle, symbol)
            }
            _ => ptr::null_mut(),
        }
    }

    /// The backend's most recent error text
    pub fn last_error(&self) -> String {
        match self.backend {
            Some(backend) => backend.last_error(),
            None => String::new(),
        }
    }

    /// Path the library was loaded from
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the handle is still live (not yet released)
    pub fn is_loaded(&self) -> bool {
        !self.handle.is_null()
    }

    /// Release the library handle.
    ///
    /// Idempotent: a handle that was already released is a no-op, never an
    /// error. A live handle with no backend bound indicates broken
    /// bookkeeping and reports [`LibraryError::InternalConsistency`]. A
    /// backend free that fails leaves the handle live and surfaces
    /// [`LibraryError::ReleaseFailure`] to the explicit caller.
    pub fn close(&mut self) -> Result<(), LibraryError> {
        if self.handle.is_null() {
            return Ok(());
        }

        let backend = self.backend.ok_or_else(|| {
            LibraryError::InternalConsistency(format!(
                "live handle for {} has no loader backend bound",
                self.path
            ))
        })?;

        if backend.free(self.handle) {
            self.handle = ptr::null_mut();
            Ok(())
        } else {
            Err(LibraryError::ReleaseFailure {
                path: self.path.clone(),
                detail: backend.last_error(),
            })
        }
    }
}

impl Drop for NativeLibrary {
    fn drop(&mut self) {
        // Best-effort cleanup; failures must not propagate past teardown
        let _ = self.close();
    }
}

// The OS loaders allow concurrent read-only symbol resolution; release
// takes &mut self, so only one release can ever run.
unsafe impl Send for NativeLibrary {}
unsafe impl Sync for NativeLibrary {}
