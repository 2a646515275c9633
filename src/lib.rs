// mfsignal - Core Library
// AMC table, agent hooks and the AMFI sync check, shared by both binaries

use std::io::{self, Write};

pub mod entities;
pub mod hooks;
pub mod sync;

// Re-export commonly used types
pub use entities::{Amc, AmcError, AmcRegistry};
pub use hooks::{
    run_hook, CommandOutput, CommandRunner, CommandSpec, HookConfig, HookInput, HookKind,
    HookOutcome, HookResponse, PackageManagerGuard, SystemRunner,
};
pub use sync::{extract_amc_list, normalize_name, AmfiEntry, MissingAmc, SyncReport, AMFI_NAV_URL};

#[cfg(feature = "sync")]
pub use sync::AmfiClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Printed by `mfsignal` when run without arguments
pub const GREETING: &str = "Hello from mfsignal!";

/// Write the greeting followed by a single newline
pub fn write_greeting<W: Write>(mut out: W) -> io::Result<()> {
    writeln!(out, "{}", GREETING)?;
    out.flush()
}
