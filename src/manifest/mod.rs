pub mod decoder;
pub mod lister;
pub mod pattern;

pub use decoder::{ManifestRecord, decode};
pub use lister::{ManifestLister, ManifestRefs};
pub use pattern::ManifestName;

use std::io::Read;

use crate::config::EndpointConfig;
use crate::errors::StorageError;
use crate::infra::interrupt_adapter::Cancellation;
use crate::interfaces::ObjectStore;
use crate::storage::models::ManifestObjectRef;
use crate::utils::log_utils::Logger;

/// Fetch `object` only if it is unchanged since it was listed.
///
/// A changed or deleted object surfaces as [`StorageError::PreconditionFailed`]
/// and an interrupted request as [`StorageError::Cancelled`]; any other failure
/// is wrapped with the object key.
///
/// # Errors
///
/// See above. Nothing is retried.
pub fn fetch<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &str,
    object: &ManifestObjectRef,
) -> Result<Box<dyn Read + Send>, StorageError> {
    store.get_object(bucket, object).map_err(|e| match e {
        StorageError::PreconditionFailed { .. }
        | StorageError::ObjectFetch { .. }
        | StorageError::Cancelled(_) => e,
        other => StorageError::ObjectFetch {
            key: object.key.clone(),
            source: Box::new(other),
        },
    })
}

/// List every manifest in the listing store and decode them, in listing order.
///
/// Any failure discards everything gathered so far.
///
/// # Errors
///
/// Returns the first listing, fetch, decode or cancellation error.
pub fn load_listings<S: ObjectStore + ?Sized>(
    store: &S,
    listing: &EndpointConfig,
    cancel: &Cancellation,
    logger: Logger,
) -> Result<Vec<ManifestRecord>, StorageError> {
    let lister = ManifestLister::new(store, cancel, logger);
    let mut records = Vec::new();
    let mut manifests = 0usize;

    for object in lister.list(listing) {
        let object = object?;
        cancel.check()?;
        logger.debug(&format!(
            "fetching s3://{}/{} (etag {:?}, last modified {:?})",
            listing.bucket, object.key, object.etag, object.last_modified
        ));
        let body = fetch(store, &listing.bucket, &object)?;
        let decoded = decode(&object.key, body)?;
        logger.debug(&format!("{}: {} records", object.key, decoded.len()));
        records.extend(decoded);
        manifests += 1;
    }

    logger.info(&format!(
        "Loaded {} records from {} manifests",
        records.len(),
        manifests
    ));
    Ok(records)
}
