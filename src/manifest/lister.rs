use std::collections::VecDeque;

use super::pattern::{ManifestName, file_name};
use crate::config::EndpointConfig;
use crate::errors::StorageError;
use crate::infra::interrupt_adapter::Cancellation;
use crate::interfaces::ObjectStore;
use crate::storage::models::{ListPage, ManifestObjectRef};
use crate::utils::log_utils::Logger;

/// Walks the listing store page by page, yielding only manifest objects.
pub struct ManifestLister<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    cancel: &'a Cancellation,
    logger: Logger,
}

impl<'a, S: ObjectStore + ?Sized> ManifestLister<'a, S> {
    pub fn new(store: &'a S, cancel: &'a Cancellation, logger: Logger) -> Self {
        Self {
            store,
            cancel,
            logger,
        }
    }

    /// Start a fresh listing of `listing.bucket` under `listing.prefix`.
    ///
    /// Nothing is fetched until the returned iterator is advanced.
    pub fn list(&self, listing: &'a EndpointConfig) -> ManifestRefs<'a, S> {
        ManifestRefs {
            store: self.store,
            cancel: self.cancel,
            logger: self.logger,
            bucket: &listing.bucket,
            prefix: &listing.prefix,
            pending: VecDeque::new(),
            next_token: None,
            page: 0,
            done: false,
        }
    }
}

/// Lazy sequence of matching [`ManifestObjectRef`]s.
///
/// After the first error the iterator yields nothing more.
pub struct ManifestRefs<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    cancel: &'a Cancellation,
    logger: Logger,
    bucket: &'a str,
    prefix: &'a str,
    pending: VecDeque<ManifestObjectRef>,
    next_token: Option<String>,
    page: usize,
    done: bool,
}

impl<S: ObjectStore + ?Sized> ManifestRefs<'_, S> {
    fn accept_page(&mut self, page: ListPage) {
        let listed = page.objects.len();
        let prefix = self.prefix;
        self.pending.extend(
            page.objects
                .into_iter()
                .filter(|o| ManifestName::matches(file_name(&o.key, prefix))),
        );
        self.logger.debug(&format!(
            "listing page {} of s3://{}/{}: {} objects, {} manifests",
            self.page,
            self.bucket,
            self.prefix,
            listed,
            self.pending.len()
        ));
        self.next_token = page.next_continuation_token;
        if self.next_token.is_none() {
            self.done = true;
        }
    }
}

impl<S: ObjectStore + ?Sized> Iterator for ManifestRefs<'_, S> {
    type Item = Result<ManifestObjectRef, StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(object) = self.pending.pop_front() {
                return Some(Ok(object));
            }
            if self.done {
                return None;
            }
            if let Err(e) = self.cancel.check() {
                self.done = true;
                return Some(Err(e));
            }

            self.page += 1;
            match self
                .store
                .list_page(self.bucket, self.prefix, self.next_token.take())
            {
                Ok(page) => self.accept_page(page),
                Err(e @ StorageError::Cancelled(_)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(StorageError::ListingPage(Box::new(e))));
                }
            }
        }
    }
}
