pub mod types;

pub use types::*;

use clap::Parser;

/// Parse command line arguments
#[must_use]
pub fn args_checks() -> Args {
    Args::parse()
}
