//! Client for the remote image inventory.
//!
//! [`Inventory`] wraps any [`ImageService`] and adds the local presentation
//! order: images sorted by name (case-insensitive), manifests newest first.
//! The remote service stays the source of truth; nothing is cached between
//! calls.

use crate::error::{HarbingerError, Result};
use crate::model::{
    ImageInspect, ImageList, ImageManifests, ImageRecord, ManifestRecord, PruneRequest,
    PruneResult, RemovalResult,
};
use crate::rpc::{self, ImageServiceClient};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tonic::transport::Endpoint;
use tracing::{debug, info};

#[cfg(test)]
mod tests;

/// Remote inventory operations.
///
/// Implementations return remote failures unchanged; callers must not expect
/// any translation or retry.
#[async_trait]
pub trait ImageService: Send + Sync {
    /// Lists every tracked image.
    async fn image_list(&self) -> Result<ImageList>;

    /// Returns all manifests of one image. Fails if the image is unknown.
    async fn image_inspect(&self, name: &str) -> Result<ImageInspect>;

    /// Deletes an image and all its manifests. Fails if the image is unknown.
    async fn image_remove(&self, name: &str) -> Result<RemovalResult>;

    /// Deletes manifests across all images.
    async fn image_prune(&self, request: PruneRequest) -> Result<PruneResult>;
}

/// [`ImageService`] over plaintext gRPC.
#[derive(Debug, Clone)]
pub struct GrpcImageService {
    authority: String,
    client: ImageServiceClient,
}

impl GrpcImageService {
    /// Prepares a channel to `authority` (`host:port`).
    ///
    /// The connection is established on the first call, so an unreachable
    /// service is reported by that call rather than here. Must be called
    /// from within a tokio runtime.
    pub fn connect(authority: &str) -> Result<Self> {
        let authority = authority.trim();
        if authority.is_empty() {
            return Err(HarbingerError::validation("gRPC authority cannot be empty"));
        }

        let endpoint = Endpoint::from_shared(format!("http://{}", authority)).map_err(|e| {
            HarbingerError::connect_with_source(format!("Invalid gRPC authority {}", authority), e)
        })?;

        debug!(authority, "prepared inventory channel");

        Ok(Self {
            authority: authority.to_string(),
            client: ImageServiceClient::new(endpoint.connect_lazy()),
        })
    }

    /// Returns the configured authority.
    pub fn authority(&self) -> &str {
        &self.authority
    }
}

#[async_trait]
impl ImageService for GrpcImageService {
    async fn image_list(&self) -> Result<ImageList> {
        let response = self
            .client
            .clone()
            .image_list(rpc::ImageListRequest {})
            .await?
            .into_inner();

        Ok(ImageList {
            images: response.images.into_iter().map(image_record).collect(),
        })
    }

    async fn image_inspect(&self, name: &str) -> Result<ImageInspect> {
        let response = self
            .client
            .clone()
            .image_inspect(rpc::ImageInspectRequest {
                name: name.to_string(),
            })
            .await?
            .into_inner();

        let image = response.image.unwrap_or_default();
        Ok(ImageInspect {
            image: ImageManifests {
                name: image.name,
                manifests: image.manifests.into_iter().map(manifest_record).collect(),
            },
        })
    }

    async fn image_remove(&self, name: &str) -> Result<RemovalResult> {
        let response = self
            .client
            .clone()
            .image_remove(rpc::ImageRemoveRequest {
                name: name.to_string(),
            })
            .await?
            .into_inner();

        Ok(RemovalResult {
            manifests: response.manifests.into_iter().map(manifest_record).collect(),
        })
    }

    async fn image_prune(&self, request: PruneRequest) -> Result<PruneResult> {
        let response = self
            .client
            .clone()
            .image_prune(rpc::ImagePruneRequest {
                all: request.all,
                filter: request.filter,
            })
            .await?
            .into_inner();

        Ok(PruneResult {
            images: response
                .images
                .into_iter()
                .map(|image| ImageManifests {
                    name: image.name,
                    manifests: image.manifests.into_iter().map(manifest_record).collect(),
                })
                .collect(),
        })
    }
}

fn image_record(image: rpc::image_list_response::Image) -> ImageRecord {
    ImageRecord {
        name: image.name,
        manifests_count: u64::try_from(image.manifests_count).unwrap_or_default(),
        latest: image.latest.map(manifest_record),
    }
}

fn manifest_record(manifest: rpc::Manifest) -> ManifestRecord {
    ManifestRecord {
        tag: manifest.tag,
        mime_type: manifest.mime_type,
        digest: manifest.digest,
        created: manifest
            .created
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts.seconds, ts.nanos.max(0) as u32))
            .unwrap_or_default(),
        labels: manifest.labels,
        platform: manifest.platform,
        size: u64::try_from(manifest.size).unwrap_or_default(),
    }
}

/// Inventory operations with deterministic local ordering.
#[derive(Debug, Clone)]
pub struct Inventory<S> {
    service: S,
}

impl<S: ImageService> Inventory<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Returns the underlying service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Fetches all images, sorted by upper-cased name.
    pub async fn list(&self) -> Result<ImageList> {
        let mut list = self.service.image_list().await?;
        sort_images(&mut list.images);
        debug!(count = list.images.len(), "listed images");
        Ok(list)
    }

    /// Fetches every manifest of `name`, newest first.
    pub async fn inspect(&self, name: &str) -> Result<ImageInspect> {
        let mut inspect = self.service.image_inspect(name).await?;
        sort_manifests(&mut inspect.image.manifests);
        debug!(image = name, count = inspect.image.manifests.len(), "inspected image");
        Ok(inspect)
    }

    /// Removes `name` and all its manifests in one remote call.
    pub async fn remove(&self, name: &str) -> Result<RemovalResult> {
        let removed = self.service.image_remove(name).await?;
        info!(image = name, count = removed.manifests.len(), "removed image");
        Ok(removed)
    }

    /// Removes every manifest of every image in one remote call.
    ///
    /// The caller is responsible for any confirmation.
    pub async fn prune(&self) -> Result<PruneResult> {
        let pruned = self.service.image_prune(PruneRequest::default()).await?;
        info!(
            images = pruned.images.len(),
            manifests = pruned.total_manifests(),
            "pruned database"
        );
        Ok(pruned)
    }
}

/// Sorts images by name, comparing upper-cased names. The sort is stable.
pub fn sort_images(images: &mut [ImageRecord]) {
    images.sort_by_cached_key(|image| image.name.to_uppercase());
}

/// Sorts manifests by creation time, most recent first. The sort is stable.
pub fn sort_manifests(manifests: &mut [ManifestRecord]) {
    manifests.sort_by(|a, b| b.created.cmp(&a.created));
}
