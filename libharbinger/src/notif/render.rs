//! Rendering of notification events into wire payloads.

use crate::error::{HarbingerError, Result};
use crate::format::format_created;
use crate::model::NotificationEvent;
use serde::Serialize;
use std::collections::HashMap;

/// Turns an event into the bytes a backend transmits.
pub trait Render: Send + Sync {
    /// Content type of the rendered payload.
    fn content_type(&self) -> &str;

    fn render(&self, event: &NotificationEvent) -> Result<Vec<u8>>;
}

/// Renders an event as a flat JSON document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

#[derive(Serialize)]
struct JsonPayload<'a> {
    app: &'a str,
    version: &'a str,
    hostname: &'a str,
    status: String,
    provider: &'a str,
    image: &'a str,
    tag: &'a str,
    mime_type: &'a str,
    digest: &'a str,
    created: String,
    platform: &'a str,
    metadata: &'a HashMap<String, String>,
}

impl Render for JsonRenderer {
    fn content_type(&self) -> &str {
        "application/json"
    }

    fn render(&self, event: &NotificationEvent) -> Result<Vec<u8>> {
        let (meta, entry) = (&event.meta, &event.entry);
        if entry.image.trim().is_empty() {
            return Err(HarbingerError::render("entry has no image reference"));
        }

        let payload = JsonPayload {
            app: &meta.name,
            version: &meta.version,
            hostname: &meta.hostname,
            status: entry.status.to_string(),
            provider: &entry.provider,
            image: &entry.image,
            tag: &entry.manifest.tag,
            mime_type: &entry.manifest.mime_type,
            digest: &entry.manifest.digest,
            created: format_created(&entry.manifest.created),
            platform: &entry.manifest.platform,
            metadata: &entry.manifest.labels,
        };

        serde_json::to_vec(&payload)
            .map_err(|e| HarbingerError::render_with_source("Failed to encode JSON payload", e))
    }
}
