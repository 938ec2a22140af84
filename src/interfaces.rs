use crate::errors::StorageError;
use crate::storage::models::{ListPage, ManifestObjectRef};
use mockall::automock;
use std::io::Read;

/// Interface for the object-store calls the manifest pipeline needs, to facilitate testing
#[automock]
pub trait ObjectStore {
    /// Fetch one page of the listing of `bucket` under `prefix`.
    ///
    /// `continuation` is `None` for the first page and the token returned by
    /// the previous page afterwards.
    fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ListPage, StorageError>;

    /// Fetch `object`, failing with [`StorageError::PreconditionFailed`] when its
    /// entity tag or modification time no longer match what was listed.
    fn get_object(
        &self,
        bucket: &str,
        object: &ManifestObjectRef,
    ) -> Result<Box<dyn Read + Send>, StorageError>;
}
