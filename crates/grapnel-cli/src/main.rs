//! grapnel command-line front end
//!
//! Thin caller over the core crate: resolve library paths, probe the
//! platform classification, and check that a library actually loads.

use clap::{Parser, Subcommand};
use grapnel::{
    library_file_name, resolve_first_full_path, NativeLibrary, Platform, DEFAULT_LABEL,
};

#[derive(Parser)]
#[command(name = "grapnel")]
#[command(about = "Locate and load native shared libraries", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the detected platform
    Platform,

    /// Resolve a library name to its first existing full path
    Resolve {
        /// Library name (short name by default, file name with --raw)
        name: String,
        /// Search variable to use instead of the platform default
        #[arg(long)]
        env_var: Option<String>,
        /// Treat the name as a literal file name (skip lib/.so/.dll naming)
        #[arg(long)]
        raw: bool,
    },

    /// Load a library and optionally look up a symbol
    Check {
        /// Library name (short name by default, file name with --raw)
        name: String,
        /// Symbol to resolve after loading
        #[arg(short, long)]
        symbol: Option<String>,
        /// Treat the name as a literal file name (skip lib/.so/.dll naming)
        #[arg(long)]
        raw: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let platform = Platform::detect();

    match cli.command {
        Commands::Platform => {
            println!("{}", platform);
        }

        Commands::Resolve { name, env_var, raw } => {
            match resolve(platform, &name, env_var.as_deref(), raw) {
                Ok(path) => println!("{}", path),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Check { name, symbol, raw } => {
            let path = match resolve(platform, &name, None, raw) {
                Ok(path) => path,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            let lib = match NativeLibrary::open(platform, &path) {
                Ok(lib) => lib,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            println!("Loaded: {}", lib.path());

            if let Some(symbol) = symbol {
                let address = lib.symbol_address(&symbol);
                if address.is_null() {
                    eprintln!("Symbol not exported: {}", symbol);
                    std::process::exit(1);
                }
                println!("{}: {:p}", symbol, address);
            }
        }
    }

    Ok(())
}

/// Apply the naming convention (unless raw) and resolve to a full path
fn resolve(
    platform: Platform,
    name: &str,
    env_var: Option<&str>,
    raw: bool,
) -> Result<String, grapnel::LibraryError> {
    let file_name = if raw {
        name.to_string()
    } else {
        library_file_name(platform, name)?
    };

    let path = resolve_first_full_path(platform, &file_name, DEFAULT_LABEL, env_var)?;
    Ok(path.to_string_lossy().into_owned())
}
