use super::*;
use libharbinger::HarbingerError;

#[test]
fn test_sample_event() {
    let event = sample_event();
    assert_eq!(event.entry.status, EntryStatus::New);
    assert_eq!(event.entry.provider, "test");
    assert_eq!(event.entry.image, "docker.io/library/alpine:latest");
    assert_eq!(event.meta.id, "harbinger");
    assert!(event.meta.user_agent.starts_with("harbinger/"));
}

#[test]
fn test_render_notifier_names() {
    assert_eq!(render_notifier_names(&[]), "No notifier configured");
    assert_eq!(render_notifier_names(&["webhook"]), "webhook");
}

#[test]
fn test_deliveries_outcome() {
    let ok = Delivery {
        notifier: "webhook".to_string(),
        result: Ok(()),
    };
    let failed = Delivery {
        notifier: "webhook".to_string(),
        result: Err(HarbingerError::Cancelled),
    };

    assert!(describe_delivery(&ok).contains("sent with webhook"));
    assert!(describe_delivery(&failed).starts_with("Failed to send test notification with webhook"));
    assert!(deliveries_outcome(&[]).is_ok());
    assert_eq!(
        deliveries_outcome(&[ok, failed]).unwrap_err(),
        "1 of 2 notifiers failed"
    );
}

#[tokio::test]
async fn test_sample_event_reaches_webhook() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/hook")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "status": "new",
            "provider": "test",
            "image": SAMPLE_IMAGE,
        })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let config = libharbinger::NotifConfig {
        webhook: Some(libharbinger::DeliveryConfig::new(format!(
            "{}/hook",
            server.url()
        ))),
    };
    let notif = libharbinger::Notif::from_config(&config);

    let deliveries = notif.send_all(&sample_event()).await;

    assert!(deliveries_outcome(&deliveries).is_ok());
    mock.assert_async().await;
}
