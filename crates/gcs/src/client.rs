//! Storage client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectReader trait from og-core,
//! talking to the backend's S3-interoperability XML API with HMAC keys.
//! One client is built per process from the loaded configuration and passed
//! explicitly into every fetch.

use async_trait::async_trait;

use og_core::{
    Config, Error, ListOptions, ListPage, ObjectDescriptor, ObjectReader, ObjectStream, Result,
};

/// Read-only storage client
pub struct GcsClient {
    inner: aws_sdk_s3::Client,
}

impl GcsClient {
    /// Create a new client from the loaded configuration
    ///
    /// Empty credentials select anonymous access, which is sufficient for
    /// public containers.
    pub async fn new(config: Config) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint);

        if config.access_key.is_empty() {
            loader = loader.no_credentials();
        } else {
            let credentials = aws_credential_types::Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None, // session token
                None, // expiry
                "oget-static-credentials",
            );
            loader = loader.credentials_provider(credentials);
        }

        let sdk_config = loader.load().await;

        // The interoperability API only supports path-style addressing
        let client_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(client_config),
        })
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }
}

/// Whether an SDK error message denotes a missing object or container
fn is_not_found(message: &str) -> bool {
    message.contains("NotFound")
        || message.contains("NoSuchKey")
        || message.contains("NoSuchBucket")
}

#[async_trait]
impl ObjectReader for GcsClient {
    async fn list(&self, container: &str, prefix: &str, options: ListOptions) -> Result<ListPage> {
        let mut request = self.inner.list_objects_v2().bucket(container);

        if !prefix.is_empty() {
            request = request.prefix(prefix);
        }

        if let Some(max) = options.max_keys {
            request = request.max_keys(max);
        }

        if let Some(token) = &options.continuation_token {
            request = request.continuation_token(token);
        }

        let response = request.send().await.map_err(|e| {
            let message = e.to_string();
            if is_not_found(&message) {
                Error::NotFound(format!("listing {container}/{prefix}: {message}"))
            } else {
                Error::Backend(format!("listing {container}/{prefix}: {message}"))
            }
        })?;

        let objects = response
            .contents()
            .iter()
            .map(|object| {
                let key = object.key().unwrap_or_default();
                let size = object.size().unwrap_or(0);
                let mut descriptor = ObjectDescriptor::new(key, size);
                if let Some(modified) = object.last_modified() {
                    descriptor.last_modified = jiff::Timestamp::from_second(modified.secs()).ok();
                }
                descriptor
            })
            .collect();

        Ok(ListPage {
            objects,
            truncated: response.is_truncated().unwrap_or(false),
            continuation_token: response.next_continuation_token().map(|s| s.to_string()),
        })
    }

    async fn open_read(&self, container: &str, key: &str) -> Result<ObjectStream> {
        let response = self
            .inner
            .get_object()
            .bucket(container)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let message = e.to_string();
                if is_not_found(&message) {
                    Error::NotFound(format!("{container}/{key}"))
                } else {
                    Error::Backend(format!("opening {container}/{key}: {message}"))
                }
            })?;

        tracing::debug!(container, key, size = ?response.content_length(), "opened object stream");
        Ok(Box::new(response.body.into_async_read()))
    }
}
