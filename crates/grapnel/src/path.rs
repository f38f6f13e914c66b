//! Library path resolution
//!
//! Turns a short library name into the full path of an existing file by
//! searching the directories listed in an environment variable, applying
//! the platform file-name convention on the way in. No filesystem mutation
//! occurs here; everything is existence checks and joins.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::LibraryError;
use crate::platform::Platform;

/// Label used in NotFound messages when the caller does not supply one
pub const DEFAULT_LABEL: &str = "native library";

/// Ordered list of directories parsed from a search variable.
///
/// Order is search priority: the first directory containing a candidate
/// wins. Duplicates are preserved.
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    /// Parse the named environment variable on the platform path-list
    /// separator. A missing or empty variable yields an empty list, not
    /// an error.
    pub fn from_env(var: &str) -> SearchPath {
        let dirs = match env::var_os(var) {
            Some(value) if !value.is_empty() => env::split_paths(&value)
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
            _ => Vec::new(),
        };
        SearchPath { dirs }
    }

    /// Build a search path from an explicit directory list
    pub fn from_dirs<I, P>(dirs: I) -> SearchPath
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        SearchPath {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// Directories in search-priority order
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Join `file_name` against each directory and return every join that
    /// exists, in directory order
    pub fn find(&self, file_name: &str) -> Vec<PathBuf> {
        self.dirs
            .iter()
            .map(|dir| dir.join(file_name))
            .filter(|candidate| candidate.exists())
            .collect()
    }
}

/// Return every existing `dir/file_name` join, in the given directory order
pub fn find_candidates<I, P>(file_name: &str, dirs: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    SearchPath::from_dirs(dirs).find(file_name)
}

/// Search the directories listed in `env_var` for `file_name`
pub fn find_via_env_var(file_name: &str, env_var: &str) -> Vec<PathBuf> {
    SearchPath::from_env(env_var).find(file_name)
}

/// Resolve a short or absolute library file name to the first existing
/// full path.
///
/// An absolute input is verified directly: it is returned unchanged if it
/// exists and fails with [`LibraryError::NotFound`] otherwise, with no
/// directory search. A relative input is searched via the override
/// variable if one is given (an empty override counts as absent), else
/// `PATH` on Windows and `LD_LIBRARY_PATH` elsewhere. On Windows only,
/// a bare name that exists relative to the working directory is accepted
/// when the variable search comes up empty, mirroring the OS loader's
/// implicit working-directory search.
pub fn resolve_first_full_path(
    platform: Platform,
    name: &str,
    label: &str,
    env_var_override: Option<&str>,
) -> Result<PathBuf, LibraryError> {
    if name.is_empty() {
        return Err(LibraryError::InvalidArgument(
            "library file name must not be empty".to_string(),
        ));
    }

    let search_var = env_var_override
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| platform.search_path_var());

    let path = Path::new(name);
    if path.is_absolute() {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(not_found(name, search_var, label));
    }

    if let Some(first) = find_via_env_var(name, search_var).into_iter().next() {
        return Ok(first);
    }

    // The Windows loader also searches the working directory implicitly
    if platform == Platform::Windows && path.exists() {
        return Ok(path.to_path_buf());
    }

    Err(not_found(name, search_var, label))
}

/// Apply the platform shared-library naming convention to a base name:
/// `<base>.dll` on Windows, `lib<base>.so` everywhere else.
///
/// macOS gets `lib<base>.so` too; the `.dylib` suffix is deliberately not
/// produced. Known limitation carried over from the original convention.
pub fn library_file_name(platform: Platform, base_name: &str) -> Result<String, LibraryError> {
    if base_name.is_empty() {
        return Err(LibraryError::InvalidArgument(
            "library base name must not be empty".to_string(),
        ));
    }

    Ok(match platform {
        Platform::Windows => format!("{}.dll", base_name),
        _ => format!("lib{}.so", base_name),
    })
}

fn not_found(name: &str, search_var: &str, label: &str) -> LibraryError {
    LibraryError::NotFound {
        name: name.to_string(),
        search_var: search_var.to_string(),
        label: label.to_string(),
    }
}
