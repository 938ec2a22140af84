use std::io::{self, Write};
use std::time::Duration;

use crate::args::Args;
use crate::config::{ResolvedConfig, Role};
use crate::errors::AppError;
use crate::infra::interrupt_adapter::{Cancellation, install_ctrlc};
use crate::manifest::{ManifestRecord, load_listings};
use crate::storage::S3ListingClient;
use crate::utils::log_utils::Logger;

/// Build the role clients, load every manifest and print the records.
///
/// # Errors
///
/// Returns the first client construction, listing or fetch error.
pub fn run_app(config: &ResolvedConfig, args: &Args, logger: Logger) -> Result<(), AppError> {
    let mut cancel = Cancellation::new();
    if let Some(secs) = args.timeout_secs {
        cancel = cancel.with_timeout(Duration::from_secs(secs));
    }
    install_ctrlc(&cancel)?;

    logger.info(&format!("tar format: {}", config.tar_format));

    // Source and target clients are built up front so a bad role config fails
    // before any listing work starts.
    let _source = S3ListingClient::new(Role::Source, &config.source, logger)?;
    let _target = S3ListingClient::new(Role::Target, &config.target, logger)?;
    let listing = S3ListingClient::new(Role::Listing, &config.listing, logger)?
        .with_cancellation(cancel.clone());

    let records = load_listings(&listing, &config.listing, &cancel, logger)?;
    print_records(&records, &mut io::stdout().lock())?;
    Ok(())
}

fn print_records<W: Write>(records: &[ManifestRecord], out: &mut W) -> io::Result<()> {
    for record in records {
        writeln!(out, "{record}")?;
    }
    out.flush()
}
