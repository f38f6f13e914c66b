//! Platform detection for loader backend and search-path selection
//!
//! The OS-reported family is trusted for Windows, but a Unix-family report
//! is ambiguous between plain Unix and macOS, so a one-shot `uname -s`
//! subprocess probe disambiguates. The result is computed once per process
//! and cached; consumers receive it as an explicit value rather than
//! re-reading hidden global state.

use std::fmt;
use std::io::Read;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use once_cell::sync::OnceCell;

/// Operating-system family relevant to native library loading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Windows (reliable self-identification)
    Windows,
    /// Unix-family other than macOS (Linux, BSDs, ...)
    Unix,
    /// macOS, which reports itself as plain Unix to family queries
    MacOsx,
    /// Anything else; no loader backend is available
    Other,
}

static DETECTED: OnceCell<Platform> = OnceCell::new();

/// Upper bound on the kernel-name probe; expiry counts as probe failure
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

impl Platform {
    /// Detect the running platform, probing at most once per process.
    ///
    /// The first call on a Unix-family OS spawns `uname -s`; every later
    /// call returns the cached value. Probe failure is swallowed and the
    /// platform stays `Unix` — detection never fails outright.
    pub fn detect() -> Platform {
        *DETECTED.get_or_init(|| classify(std::env::consts::FAMILY, probe_kernel_name))
    }

    /// True for platforms served by the Unix loader backend
    pub fn is_unix_family(self) -> bool {
        matches!(self, Platform::Unix | Platform::MacOsx)
    }

    /// Default search variable for library path resolution
    pub fn search_path_var(self) -> &'static str {
        match self {
            Platform::Windows => "PATH",
            _ => "LD_LIBRARY_PATH",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Windows => "windows",
            Platform::Unix => "unix",
            Platform::MacOsx => "macosx",
            Platform::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// Classify a platform from the OS-reported family plus a lazily-invoked
/// kernel-name probe. Windows is accepted as-is and must never trigger the
/// probe; a Unix-family report is refined to macOS only on a `Darwin`
/// answer, with any probe failure degrading to plain Unix.
fn classify<F>(family: &str, kernel_name: F) -> Platform
where
    F: FnOnce() -> Option<String>,
{
    match family {
        "windows" => Platform::Windows,
        "unix" => match kernel_name().as_deref() {
            Some("Darwin") => Platform::MacOsx,
            _ => Platform::Unix,
        },
        _ => Platform::Other,
    }
}

/// Run `uname -s` and return its trimmed one-line stdout.
///
/// Bounded by [`PROBE_TIMEOUT`]; a hung or unreachable command yields
/// `None` rather than an error, since callers fall back to plain Unix.
fn probe_kernel_name() -> Option<String> {
    let mut child = Command::new("uname")
        .arg("-s")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;

    let deadline = Instant::now() + PROBE_TIMEOUT;
    loop {
        match child.try_wait() {
            Ok(Some(status)) if status.success() => break,
            Ok(Some(_)) => return None,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return None;
                }
                std::thread::sleep(Duration::from_millis(10));
            }
            Err(_) => return None,
        }
    }

    let mut out = String::new();
    child.stdout.take()?.read_to_string(&mut out).ok()?;
    let name = out.trim().to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
