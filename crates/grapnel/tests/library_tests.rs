//! Integration tests for the library handle lifecycle
//!
//! The real-loader tests are gated to Linux, where a glibc shared object
//! with a stable path and well-known exports is available to open.

use grapnel::{LibraryError, NativeLibrary, Platform};

#[test]
fn test_unsupported_platform_fails_construction() {
    let result = NativeLibrary::open(Platform::Other, "libexample.so");
    assert!(matches!(
        result,
        Err(LibraryError::UnsupportedPlatform(Platform::Other))
    ));
}

#[cfg(unix)]
#[test]
fn test_missing_library_carries_loader_detail() {
    let result = NativeLibrary::open(Platform::Unix, "/nonexistent/libgrapnel_missing.so");
    match result {
        Err(LibraryError::NativeLoadFailure { path, detail }) => {
            assert_eq!(path, "/nonexistent/libgrapnel_missing.so");
            assert!(!detail.is_empty());
        }
        Err(other) => panic!("expected NativeLoadFailure, got {}", other),
        Ok(_) => panic!("expected NativeLoadFailure, got a loaded library"),
    }
}

#[cfg(target_os = "linux")]
mod linux {
    use super::*;
    use std::path::PathBuf;

    /// Locate the system C library at one of its usual homes
    fn find_system_libc() -> Option<PathBuf> {
        [
            "/lib/x86_64-linux-gnu/libc.so.6",
            "/usr/lib/x86_64-linux-gnu/libc.so.6",
            "/lib/aarch64-linux-gnu/libc.so.6",
            "/usr/lib/aarch64-linux-gnu/libc.so.6",
            "/lib64/libc.so.6",
            "/usr/lib64/libc.so.6",
            "/usr/lib/libc.so.6",
        ]
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
    }

    #[test]
    fn test_load_and_resolve_symbol() {
        let Some(libc_path) = find_system_libc() else {
            return;
        };

        let lib = NativeLibrary::open(Platform::Unix, libc_path.to_str().unwrap()).unwrap();
        assert!(lib.is_loaded());
        assert_eq!(lib.path(), libc_path.to_str().unwrap());

        let strlen = lib.symbol_address("strlen");
        assert!(!strlen.is_null());
    }

    #[test]
    fn test_missing_symbol_yields_null_without_failing_handle() {
        let Some(libc_path) = find_system_libc() else {
            return;
        };

        let lib = NativeLibrary::open(Platform::Unix, libc_path.to_str().unwrap()).unwrap();

        let absent = lib.symbol_address("grapnel_definitely_not_a_libc_symbol");
        assert!(absent.is_null());

        // The handle stays usable after a failed lookup
        assert!(lib.is_loaded());
        assert!(!lib.symbol_address("strlen").is_null());
    }

    #[test]
    fn test_double_close_is_a_no_op() {
        let Some(libc_path) = find_system_libc() else {
            return;
        };

        let mut lib = NativeLibrary::open(Platform::Unix, libc_path.to_str().unwrap()).unwrap();
        assert!(lib.is_loaded());

        lib.close().unwrap();
        assert!(!lib.is_loaded());

        // Releasing again must not fault or error
        lib.close().unwrap();
        assert!(!lib.is_loaded());
    }

    #[test]
    fn test_symbol_lookup_after_release_yields_null() {
        let Some(libc_path) = find_system_libc() else {
            return;
        };

        let mut lib = NativeLibrary::open(Platform::Unix, libc_path.to_str().unwrap()).unwrap();
        lib.close().unwrap();

        assert!(lib.symbol_address("strlen").is_null());
    }

    #[test]
    fn test_open_by_name_resolves_through_search_variable() {
        let Some(libc_path) = find_system_libc() else {
            return;
        };

        // Stage a copy under the conventional libexample.so name and point
        // the default search variable at it
        let temp = tempfile::tempdir().unwrap();
        let staged = temp.path().join("libexample.so");
        std::fs::copy(&libc_path, &staged).unwrap();
        std::env::set_var("LD_LIBRARY_PATH", temp.path());

        let lib = NativeLibrary::open_by_name(Platform::Unix, "example").unwrap();
        assert_eq!(lib.path(), staged.to_str().unwrap());
        assert!(!lib.symbol_address("strlen").is_null());
    }
}
