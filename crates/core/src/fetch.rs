//! Mode-adaptive fetcher
//!
//! Classifies a storage location as a single object or a prefix collection by
//! probing the backend, then runs the matching transfer strategy. Directory
//! transfers are sequential and all-or-nothing: the first per-object failure
//! aborts the whole fetch. A single cancellation token threads through every
//! listing, open, and copy.

use std::future::Future;
use std::path::Path;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::copy::copy_cancellable;
use crate::error::{Error, Result};
use crate::location::Location;
use crate::reader::{ListOptions, ObjectReader};

/// Number of keys the mode probe requests; classification never needs more
const MODE_PROBE_KEYS: i32 = 2;

/// Classification of a fetch target
///
/// Recomputed on every fetch invocation, never cached across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    /// A single object, fetched to the exact destination path
    File,
    /// A prefix collection, recreated as a tree under the destination root
    Directory,
}

impl std::fmt::Display for TransferMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferMode::File => write!(f, "file"),
            TransferMode::Directory => write!(f, "directory"),
        }
    }
}

/// What a completed fetch transferred
#[derive(Debug, Clone, Serialize)]
pub struct FetchOutcome {
    /// Mode the fetch ran in
    pub mode: TransferMode,
    /// Number of objects materialized
    pub objects: u64,
    /// Total bytes copied
    pub bytes: u64,
}

/// Race a backend call against the cancellation token
async fn cancellable<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        res = fut => res,
    }
}

/// Mode-adaptive fetcher over a shared backend client
///
/// Holds no per-invocation state; each call owns its own location, listing
/// cursor, and file handles, so one fetcher may serve concurrent fetches into
/// non-overlapping destinations.
pub struct Fetcher<'a> {
    reader: &'a dyn ObjectReader,
}

impl<'a> Fetcher<'a> {
    /// Create a fetcher backed by the given reader
    pub fn new(reader: &'a dyn ObjectReader) -> Self {
        Self { reader }
    }

    /// Classify a location as a single file or a directory collection
    ///
    /// Performs one listing call bounded to two keys: zero or one match
    /// classifies as `File` (zero so the single-object path surfaces a clear
    /// not-found instead of a silently empty directory), two or more as
    /// `Directory`.
    pub async fn detect_mode(
        &self,
        location: &Location,
        cancel: &CancellationToken,
    ) -> Result<TransferMode> {
        let options = ListOptions {
            max_keys: Some(MODE_PROBE_KEYS),
            ..Default::default()
        };
        let page = cancellable(
            cancel,
            self.reader.list(&location.container, &location.key, options),
        )
        .await?;

        let mode = if page.objects.len() < 2 {
            TransferMode::File
        } else {
            TransferMode::Directory
        };
        tracing::debug!(location = %location, %mode, matches = page.objects.len(), "classified");
        Ok(mode)
    }

    /// Detect the transfer mode and run the matching strategy
    pub async fn fetch(
        &self,
        location: &Location,
        dest: &Path,
        cancel: &CancellationToken,
    ) -> Result<FetchOutcome> {
        match self.detect_mode(location, cancel).await? {
            TransferMode::File => {
                let bytes = self.fetch_file(location, dest, cancel).await?;
                Ok(FetchOutcome {
                    mode: TransferMode::File,
                    objects: 1,
                    bytes,
                })
            }
            TransferMode::Directory => self.fetch_dir(location, dest, cancel).await,
        }
    }

    /// Fetch a single object to the exact destination path
    ///
    /// Parent directories are created as needed. A failed or cancelled fetch
    /// may leave a truncated file behind; it is not rolled back, the caller is
    /// expected to retry the whole fetch.
    pub async fn fetch_file(
        &self,
        location: &Location,
        dest: &Path,
        cancel: &CancellationToken,
    ) -> Result<u64> {
        self.fetch_object(&location.container, &location.key, dest, cancel)
            .await
    }

    /// Fetch every object under a key prefix, recreating the relative
    /// hierarchy beneath the destination root
    ///
    /// Replace semantics: an existing destination is removed entirely before
    /// any network activity, so stale files never mix with fetched ones.
    /// Objects transfer sequentially in listing order; the first failure
    /// aborts the rest.
    pub async fn fetch_dir(
        &self,
        location: &Location,
        dest: &Path,
        cancel: &CancellationToken,
    ) -> Result<FetchOutcome> {
        self.replace_dest(dest).await?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::LocalIo(format!(
                    "failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let mut objects: u64 = 0;
        let mut bytes: u64 = 0;
        let mut continuation_token: Option<String> = None;

        loop {
            let options = ListOptions {
                continuation_token: continuation_token.take(),
                ..Default::default()
            };
            let page = cancellable(
                cancel,
                self.reader.list(&location.container, &location.key, options),
            )
            .await?;

            for object in &page.objects {
                if object.is_placeholder() {
                    tracing::debug!(key = %object.key, "skipping directory placeholder");
                    continue;
                }

                let Some(object_dest) = relative_dest(dest, &location.key, &object.key)? else {
                    continue;
                };

                bytes += self
                    .fetch_object(&location.container, &object.key, &object_dest, cancel)
                    .await?;
                objects += 1;
            }

            if page.truncated {
                continuation_token = page.continuation_token;
            } else {
                break;
            }
        }

        tracing::info!(location = %location, objects, bytes, "directory fetch complete");
        Ok(FetchOutcome {
            mode: TransferMode::Directory,
            objects,
            bytes,
        })
    }

    /// Remove an existing destination so the transfer replaces, never merges
    async fn replace_dest(&self, dest: &Path) -> Result<()> {
        let meta = match tokio::fs::metadata(dest).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(Error::LocalIo(format!(
                    "failed to stat {}: {e}",
                    dest.display()
                )));
            }
        };

        let removed = if meta.is_dir() {
            tokio::fs::remove_dir_all(dest).await
        } else {
            tokio::fs::remove_file(dest).await
        };
        removed.map_err(|e| Error::LocalIo(format!("failed to remove {}: {e}", dest.display())))
    }

    /// Stream one object into one local file
    async fn fetch_object(
        &self,
        container: &str,
        key: &str,
        dest: &Path,
        cancel: &CancellationToken,
    ) -> Result<u64> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::LocalIo(format!(
                    "failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let mut stream = cancellable(cancel, self.reader.open_read(container, key)).await?;

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| Error::LocalIo(format!("failed to create {}: {e}", dest.display())))?;

        let bytes = copy_cancellable(&mut stream, &mut file, cancel)
            .await
            .map_err(|e| match e {
                Error::Backend(msg) => Error::Backend(format!("reading {container}/{key}: {msg}")),
                Error::LocalIo(msg) => {
                    Error::LocalIo(format!("writing {}: {msg}", dest.display()))
                }
                other => other,
            })?;

        tracing::debug!(container, key, dest = %dest.display(), bytes, "object fetched");
        Ok(bytes)
    }
}

/// Compute the local destination for an object key relative to the fetched
/// prefix, rebuilding the path segment by segment so platform separators are
/// handled correctly
///
/// Returns `None` for keys with no remainder past the prefix (nothing to
/// materialize at the destination root itself).
fn relative_dest(
    dest: &Path,
    prefix: &str,
    key: &str,
) -> Result<Option<std::path::PathBuf>> {
    let relative = key.strip_prefix(prefix).unwrap_or(key);
    let relative = relative.trim_start_matches('/');
    if relative.is_empty() {
        return Ok(None);
    }

    let mut path = dest.to_path_buf();
    for segment in relative.split('/').filter(|s| !s.is_empty() && *s != ".") {
        if segment == ".." {
            return Err(Error::LocalIo(format!(
                "refusing to write outside destination root for key '{key}'"
            )));
        }
        path.push(segment);
    }
    Ok(Some(path))
}
