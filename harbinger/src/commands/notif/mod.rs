use chrono::Utc;
use libharbinger::notif::Delivery;
use libharbinger::{EntryStatus, ManifestRecord, Meta, NotifEntry, NotificationEvent};
use std::collections::HashMap;

pub mod handlers;

/// Image reference carried by the test notification
pub const SAMPLE_IMAGE: &str = "docker.io/library/alpine:latest";

/// Build the event sent by `notif test`.
pub fn sample_event() -> NotificationEvent {
    let entry = NotifEntry {
        status: EntryStatus::New,
        provider: "test".to_string(),
        image: SAMPLE_IMAGE.to_string(),
        manifest: ManifestRecord {
            tag: "latest".to_string(),
            mime_type: "application/vnd.docker.distribution.manifest.list.v2+json".to_string(),
            digest: "sha256:216266c86fc4dcef5619930bd394245824c2af52fd21ba7c6fa0e618657d4c3b"
                .to_string(),
            created: Utc::now(),
            labels: HashMap::from([
                ("maintainer".to_string(), "harbinger".to_string()),
                ("org.opencontainers.image.title".to_string(), "alpine".to_string()),
            ]),
            platform: "linux/amd64".to_string(),
            size: 0,
        },
    };
    NotificationEvent::new(Meta::default(), entry)
}

/// Lines printed by `notif list`
pub fn render_notifier_names(names: &[&str]) -> String {
    if names.is_empty() {
        "No notifier configured".to_string()
    } else {
        names.join("\n")
    }
}

/// Message for one delivery of `notif test`
pub fn describe_delivery(delivery: &Delivery) -> String {
    match &delivery.result {
        Ok(()) => format!("Test notification sent with {}", delivery.notifier),
        Err(e) => format!("Failed to send test notification with {}: {}", delivery.notifier, e),
    }
}

/// Collapse deliveries into the command outcome.
pub fn deliveries_outcome(deliveries: &[Delivery]) -> Result<(), String> {
    let failed = deliveries.iter().filter(|d| d.result.is_err()).count();
    if failed == 0 {
        Ok(())
    } else {
        Err(format!(
            "{} of {} notifiers failed",
            failed,
            deliveries.len()
        ))
    }
}

#[cfg(test)]
mod tests;
