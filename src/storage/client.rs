use std::future::Future;
use std::io::{Cursor, Read};

use aws_config::BehaviorVersion;
use aws_config::retry::RetryConfig;
use aws_credential_types::Credentials;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::DateTime as SmithyDateTime;
use chrono::DateTime;

use crate::config::{EndpointConfig, Role};
use crate::errors::StorageError;
use crate::infra::interrupt_adapter::Cancellation;
use crate::interfaces::ObjectStore;
use crate::storage::models::{ListPage, ManifestObjectRef};
use crate::utils::log_utils::Logger;

const CREDENTIALS_PROVIDER_NAME: &str = "S3ListingStaticCredentials";

/// S3-compatible client bound to one role's endpoint.
///
/// Calls block on an owned Tokio runtime, one request at a time. An in-flight
/// request is dropped as soon as the attached [`Cancellation`] fires.
pub struct S3ListingClient {
    role: Role,
    client: Client,
    runtime: tokio::runtime::Runtime,
    cancel: Cancellation,
    logger: Logger,
}

impl S3ListingClient {
    /// Build a client for `role` from its resolved endpoint configuration.
    ///
    /// Uses the endpoint URL and region when set, and static credentials when
    /// any credential field is set; otherwise the SDK defaults apply.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ClientConstruction`] if the runtime cannot be
    /// created or the endpoint URL is not an http(s) URL.
    pub fn new(role: Role, config: &EndpointConfig, logger: Logger) -> Result<Self, StorageError> {
        let construction = |message: String| StorageError::ClientConstruction { role, message };

        if !config.endpoint.is_empty()
            && !(config.endpoint.starts_with("http://") || config.endpoint.starts_with("https://"))
        {
            return Err(construction(format!(
                "endpoint '{}' must start with http:// or https://",
                config.endpoint
            )));
        }

        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| construction(format!("Failed to create runtime: {e}")))?;

        logger.debug(&format!("Creating {role} S3 client: {config:?}"));

        let sdk_config = runtime.block_on(async {
            let mut loader = aws_config::defaults(BehaviorVersion::latest());
            if !config.region.is_empty() {
                loader = loader.region(Region::new(config.region.clone()));
            }
            if !config.endpoint.is_empty() {
                loader = loader.endpoint_url(&config.endpoint);
            }
            if config.has_static_credentials() {
                let session_token =
                    (!config.session_token.is_empty()).then(|| config.session_token.clone());
                loader = loader.credentials_provider(Credentials::new(
                    config.access_key.clone(),
                    config.secret_key.clone(),
                    session_token,
                    None,
                    CREDENTIALS_PROVIDER_NAME,
                ));
            }
            loader.load().await
        });

        let mut builder =
            aws_sdk_s3::config::Builder::from(&sdk_config).retry_config(RetryConfig::disabled());
        // Custom endpoints are usually S3-compatible stores without virtual-host buckets.
        if !config.endpoint.is_empty() {
            builder = builder.force_path_style(true);
        }

        Ok(Self {
            role,
            client: Client::from_conf(builder.build()),
            runtime,
            cancel: Cancellation::new(),
            logger,
        })
    }

    /// Abort blocked requests when `cancel` is aborted or reaches its deadline.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    fn run<T>(
        &self,
        request: impl Future<Output = Result<T, StorageError>>,
    ) -> Result<T, StorageError> {
        self.runtime.block_on(async {
            tokio::select! {
                result = request => result,
                err = self.cancel.cancelled() => Err(err),
            }
        })
    }
}

/// A changed object answers 412; a deleted one answers 404 `NoSuchKey`. Any
/// other 404 (a missing bucket, say) is a plain failure.
fn is_precondition_failure(status: Option<u16>, code: Option<&str>, missing: bool) -> bool {
    status == Some(412)
        || code == Some("PreconditionFailed")
        || missing
        || (status == Some(404) && code == Some("NoSuchKey"))
}

fn classify_get_error(key: &str, err: SdkError<GetObjectError>) -> StorageError {
    let status = err.raw_response().map(|r| r.status().as_u16());
    let missing = err
        .as_service_error()
        .is_some_and(GetObjectError::is_no_such_key);

    if is_precondition_failure(status, err.code(), missing) {
        StorageError::PreconditionFailed {
            key: key.to_string(),
        }
    } else {
        StorageError::ObjectFetch {
            key: key.to_string(),
            source: Box::new(StorageError::Backend(DisplayErrorContext(&err).to_string())),
        }
    }
}

impl ObjectStore for S3ListingClient {
    fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ListPage, StorageError> {
        self.logger.debug(&format!(
            "{} S3 list s3://{bucket}/{prefix} (continuation {:?})",
            self.role, continuation
        ));
        self.run(async {
            let mut request = self.client.list_objects_v2().bucket(bucket);
            if !prefix.is_empty() {
                request = request.prefix(prefix);
            }
            if let Some(token) = continuation {
                request = request.continuation_token(token);
            }

            let resp = request
                .send()
                .await
                .map_err(|e| StorageError::Backend(DisplayErrorContext(&e).to_string()))?;

            let objects = resp
                .contents()
                .iter()
                .filter_map(|obj| {
                    Some(ManifestObjectRef {
                        key: obj.key()?.to_string(),
                        etag: obj.e_tag().map(str::to_string),
                        last_modified: obj
                            .last_modified()
                            .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos())),
                    })
                })
                .collect();

            let next_continuation_token = if resp.is_truncated() == Some(true) {
                resp.next_continuation_token().map(str::to_string)
            } else {
                None
            };

            Ok::<_, StorageError>(ListPage {
                objects,
                next_continuation_token,
            })
        })
    }

    fn get_object(
        &self,
        bucket: &str,
        object: &ManifestObjectRef,
    ) -> Result<Box<dyn Read + Send>, StorageError> {
        self.run(async {
            let mut request = self.client.get_object().bucket(bucket).key(&object.key);
            if let Some(etag) = &object.etag {
                request = request.if_match(etag);
            }
            if let Some(ts) = object.last_modified {
                request = request.if_unmodified_since(SmithyDateTime::from_secs_and_nanos(
                    ts.timestamp(),
                    ts.timestamp_subsec_nanos(),
                ));
            }

            let resp = request
                .send()
                .await
                .map_err(|e| classify_get_error(&object.key, e))?;

            self.logger.debug(&format!(
                "S3 get {} ok, content length {:?}",
                object.key,
                resp.content_length()
            ));

            // Body is drained here so the connection is released before decoding.
            let bytes = resp.body.collect().await.map_err(|e| StorageError::ObjectFetch {
                key: object.key.clone(),
                source: Box::new(StorageError::Backend(format!(
                    "Failed to read response body: {e}"
                ))),
            })?;

            let body: Box<dyn Read + Send> = Box::new(Cursor::new(bytes.into_bytes()));
            Ok::<_, StorageError>(body)
        })
    }
}
