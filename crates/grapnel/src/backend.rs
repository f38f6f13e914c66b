//! Loader backends: platform-specific load/free/resolve/last-error calls
//!
//! Each backend is a thin forward to the OS primitive. The value of the
//! abstraction is the uniform capability surface: the handle wrapper picks
//! a backend once at construction and never branches on platform again.

use std::ffi::c_void;

use crate::error::LibraryError;
use crate::platform::Platform;

/// Raw library handle as issued by the OS loader; null means invalid
pub type RawHandle = *mut c_void;

/// Uniform capability surface over the platform loaders
pub trait LoaderBackend: Send + Sync {
    /// Map the library at `path` into the process. A null return means
    /// failure; the cause is retrievable via [`LoaderBackend::last_error`].
    fn load(&self, path: &str) -> RawHandle;

    /// Release a handle obtained from [`LoaderBackend::load`]
    fn free(&self, handle: RawHandle) -> bool;

    /// Look up an exported symbol; null means the symbol is absent
    fn resolve_symbol(&self, handle: RawHandle, symbol: &str) -> RawHandle;

    /// The OS loader's most recent error, rendered human-readable
    fn last_error(&self) -> String;
}

/// Select the backend serving `platform`.
///
/// The set is closed: Windows and the Unix family are the only supported
/// choices, and a platform the current binary was not compiled for is
/// unsupported as well.
pub fn backend_for(platform: Platform) -> Result<&'static dyn LoaderBackend, LibraryError> {
    match platform {
        #[cfg(windows)]
        Platform::Windows => Ok(&WindowsLoader),
        #[cfg(unix)]
        Platform::Unix | Platform::MacOsx => Ok(&UnixLoader),
        other => Err(LibraryError::UnsupportedPlatform(other)),
    }
}

// ============================================================================
// Unix Implementation (Linux, macOS, BSD)
// ============================================================================

#[cfg(unix)]
pub struct UnixLoader;

#[cfg(unix)]
impl LoaderBackend for UnixLoader {
    fn load(&self, path: &str) -> RawHandle {
        let c_path = match std::ffi::CString::new(path) {
            Ok(p) => p,
            Err(_) => return std::ptr::null_mut(),
        };

        unsafe {
            // RTLD_NOW: resolve all symbols immediately
            // RTLD_LOCAL: symbols not visible to subsequently loaded libraries
            libc::dlopen(c_path.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL)
        }
    }

    fn free(&self, handle: RawHandle) -> bool {
        unsafe { libc::dlclose(handle) == 0 }
    }

    fn resolve_symbol(&self, handle: RawHandle, symbol: &str) -> RawHandle {
        let c_name = match std::ffi::CString::new(symbol) {
            Ok(n) => n,
            Err(_) => return std::ptr::null_mut(),
        };

        unsafe {
            // Clear any stale error so a failed lookup reports cleanly
            libc::dlerror();
            libc::dlsym(handle, c_name.as_ptr())
        }
    }

    fn last_error(&self) -> String {
        unsafe {
            let err = libc::dlerror();
            if err.is_null() {
                String::new()
            } else {
                std::ffi::CStr::from_ptr(err).to_string_lossy().into_owned()
            }
        }
    }
}

// ============================================================================
// Windows Implementation
// ============================================================================

#[cfg(windows)]
pub struct WindowsLoader;

#[cfg(windows)]
impl LoaderBackend for WindowsLoader {
    fn load(&self, path: &str) -> RawHandle {
        use std::ffi::OsStr;
        use std::os::windows::ffi::OsStrExt;

        let wide: Vec<u16> = OsStr::new(path)
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();

        unsafe { LoadLibraryW(wide.as_ptr()) }
    }

    fn free(&self, handle: RawHandle) -> bool {
        unsafe { FreeLibrary(handle) != 0 }
    }

    fn resolve_symbol(&self, handle: RawHandle, symbol: &str) -> RawHandle {
        let c_name = match std::ffi::CString::new(symbol) {
            Ok(n) => n,
            Err(_) => return std::ptr::null_mut(),
        };

        unsafe { GetProcAddress(handle, c_name.as_ptr()) }
    }

    fn last_error(&self) -> String {
        let code = unsafe { GetLastError() };

        let mut buffer = [0u16; 512];
        let len = unsafe {
            FormatMessageW(
                FORMAT_MESSAGE_FROM_SYSTEM | FORMAT_MESSAGE_IGNORE_INSERTS,
                std::ptr::null(),
                code,
                0,
                buffer.as_mut_ptr(),
                buffer.len() as u32,
                std::ptr::null_mut(),
            )
        };

        if len == 0 {
            format!("OS error {}", code)
        } else {
            String::from_utf16_lossy(&buffer[..len as usize])
                .trim()
                .to_string()
        }
    }
}

#[cfg(windows)]
const FORMAT_MESSAGE_FROM_SYSTEM: u32 = 0x0000_1000;
#[cfg(windows)]
const FORMAT_MESSAGE_IGNORE_INSERTS: u32 = 0x0000_0200;

// Windows FFI declarations
#[cfg(windows)]
extern "system" {
    fn LoadLibraryW(filename: *const u16) -> *mut c_void;
    fn FreeLibrary(module: *mut c_void) -> i32;
    fn GetProcAddress(
        module: *mut c_void,
        procname: *const std::os::raw::c_char,
    ) -> *mut c_void;
    fn GetLastError() -> u32;
    fn FormatMessageW(
        flags: u32,
        source: *const c_void,
        message_id: u32,
        language_id: u32,
        buffer: *mut u16,
        size: u32,
        args: *mut c_void,
    ) -> u32;
}
