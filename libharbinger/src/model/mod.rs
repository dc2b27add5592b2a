//! Domain types shared by the notification dispatcher and the inventory client.
//!
//! Inventory types mirror the remote service's responses but use chrono
//! timestamps and unsigned sizes. They serialize to camelCase JSON, which is
//! what `--raw` output prints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;


/// Identity of the application producing notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub url: String,
    pub logo: String,
    pub author: String,
    pub version: String,
    pub user_agent: String,
    pub hostname: String,
}

impl Default for Meta {
    fn default() -> Self {
        let version = crate::version().to_string();
        Self {
            id: "harbinger".to_string(),
            name: "Harbinger".to_string(),
            desc: "Receive notifications when an image is updated on a Docker registry"
                .to_string(),
            url: env!("CARGO_PKG_REPOSITORY").to_string(),
            logo: String::new(),
            author: "b0b-io".to_string(),
            user_agent: format!("harbinger/{}", version),
            version,
            hostname: std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string()),
        }
    }
}

/// Kind of change reported by an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// First time the image was seen
    New,
    /// A known tag now points to a different manifest
    Update,
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryStatus::New => write!(f, "new"),
            EntryStatus::Update => write!(f, "update"),
        }
    }
}

/// Details of one detected change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifEntry {
    pub status: EntryStatus,
    /// Provider that discovered the image (docker, file, kubernetes, ...)
    pub provider: String,
    /// Full image reference, e.g. `docker.io/library/alpine:latest`
    pub image: String,
    pub manifest: ManifestRecord,
}

/// One change to report, as handed to a [`crate::Notifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub meta: Meta,
    pub entry: NotifEntry,
}

impl NotificationEvent {
    pub fn new(meta: Meta, entry: NotifEntry) -> Self {
        Self { meta, entry }
    }
}

/// One tagged version of an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestRecord {
    pub tag: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
    pub digest: String,
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub platform: String,
    /// Size in bytes
    pub size: u64,
}

/// A tracked image with its aggregated manifest history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub name: String,
    pub manifests_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<ManifestRecord>,
}

/// Manifests grouped under one image name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageManifests {
    pub name: String,
    pub manifests: Vec<ManifestRecord>,
}

impl ImageManifests {
    /// Sum of the manifest sizes in bytes.
    pub fn total_size(&self) -> u64 {
        self.manifests.iter().map(|m| m.size).sum()
    }
}

/// Response of the image list call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageList {
    pub images: Vec<ImageRecord>,
}

/// Response of the image inspect call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageInspect {
    pub image: ImageManifests,
}

/// Manifests actually deleted by an image remove call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemovalResult {
    pub manifests: Vec<ManifestRecord>,
}

impl RemovalResult {
    /// Sum of the removed manifest sizes in bytes.
    pub fn total_size(&self) -> u64 {
        self.manifests.iter().map(|m| m.size).sum()
    }
}

/// Filters for a prune call.
///
/// Neither field is exposed on the command line yet; the client always
/// sends the default, which prunes everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PruneRequest {
    pub all: bool,
    /// Filter expression, e.g. `until=24h`
    pub filter: String,
}

/// Images and manifests actually deleted by a prune call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PruneResult {
    pub images: Vec<ImageManifests>,
}

impl PruneResult {
    /// Returns true if nothing was removed.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Number of removed manifests across all images.
    pub fn total_manifests(&self) -> usize {
        self.images.iter().map(|i| i.manifests.len()).sum()
    }

    /// Sum of the removed manifest sizes across all images, in bytes.
    pub fn total_size(&self) -> u64 {
        self.images.iter().map(ImageManifests::total_size).sum()
    }

    /// Iterates over every removed manifest, image by image.
    pub fn manifests(&self) -> impl Iterator<Item = &ManifestRecord> {
        self.images.iter().flat_map(|i| i.manifests.iter())
    }
}
