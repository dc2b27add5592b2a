use super::*;
use chrono::TimeZone;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory service that records how many calls it served.
#[derive(Default)]
struct FakeImageService {
    images: Vec<ImageRecord>,
    manifests: Vec<ManifestRecord>,
    pruned: Vec<ImageManifests>,
    calls: AtomicUsize,
}

impl FakeImageService {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageService for FakeImageService {
    async fn image_list(&self) -> Result<ImageList> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ImageList {
            images: self.images.clone(),
        })
    }

    async fn image_inspect(&self, name: &str) -> Result<ImageInspect> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if name != "alpine" {
            return Err(tonic::Status::not_found(format!("image {} not found", name)).into());
        }
        Ok(ImageInspect {
            image: ImageManifests {
                name: name.to_string(),
                manifests: self.manifests.clone(),
            },
        })
    }

    async fn image_remove(&self, name: &str) -> Result<RemovalResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if name != "alpine" {
            return Err(tonic::Status::not_found(format!("image {} not found", name)).into());
        }
        Ok(RemovalResult {
            manifests: self.manifests.clone(),
        })
    }

    async fn image_prune(&self, request: PruneRequest) -> Result<PruneResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(request, PruneRequest::default());
        Ok(PruneResult {
            images: self.pruned.clone(),
        })
    }
}

fn image(name: &str, count: u64) -> ImageRecord {
    ImageRecord {
        name: name.to_string(),
        manifests_count: count,
        latest: None,
    }
}

fn manifest(tag: &str, hour: u32) -> ManifestRecord {
    ManifestRecord {
        tag: tag.to_string(),
        mime_type: String::new(),
        digest: format!("sha256:{}", tag),
        created: Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap(),
        labels: HashMap::new(),
        platform: String::new(),
        size: 1000,
    }
}

fn names(list: &ImageList) -> Vec<&str> {
    list.images.iter().map(|i| i.name.as_str()).collect()
}

#[tokio::test]
async fn test_list_sorts_case_insensitively() {
    let service = FakeImageService {
        images: vec![image("Zebra", 3), image("alpine", 1), image("nginx", 2)],
        ..Default::default()
    };
    let inventory = Inventory::new(service);

    let list = inventory.list().await.unwrap();

    assert_eq!(names(&list), vec!["alpine", "nginx", "Zebra"]);
    assert_eq!(inventory.service().calls(), 1);
}

#[tokio::test]
async fn test_list_order_independent_of_remote_order() {
    let first = Inventory::new(FakeImageService {
        images: vec![image("b", 1), image("A", 1), image("c", 1), image("D", 1)],
        ..Default::default()
    });
    let second = Inventory::new(FakeImageService {
        images: vec![image("D", 1), image("c", 1), image("A", 1), image("b", 1)],
        ..Default::default()
    });

    let first = first.list().await.unwrap();
    let second = second.list().await.unwrap();

    assert_eq!(names(&first), vec!["A", "b", "c", "D"]);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_list_empty() {
    let inventory = Inventory::new(FakeImageService::default());
    let list = inventory.list().await.unwrap();
    assert!(list.images.is_empty());
}

#[tokio::test]
async fn test_inspect_sorts_newest_first() {
    let service = FakeImageService {
        manifests: vec![manifest("3.17", 1), manifest("3.19", 9), manifest("3.18", 5)],
        ..Default::default()
    };
    let inventory = Inventory::new(service);

    let inspect = inventory.inspect("alpine").await.unwrap();
    let tags: Vec<&str> = inspect
        .image
        .manifests
        .iter()
        .map(|m| m.tag.as_str())
        .collect();

    assert_eq!(inspect.image.name, "alpine");
    assert_eq!(tags, vec!["3.19", "3.18", "3.17"]);
}

#[tokio::test]
async fn test_inspect_ties_keep_every_manifest() {
    let service = FakeImageService {
        manifests: vec![
            manifest("a", 4),
            manifest("b", 4),
            manifest("c", 7),
            manifest("d", 4),
        ],
        ..Default::default()
    };
    let inventory = Inventory::new(service);

    let inspect = inventory.inspect("alpine").await.unwrap();
    let manifests = &inspect.image.manifests;

    assert_eq!(manifests.len(), 4);
    assert_eq!(manifests[0].tag, "c");
    assert!(manifests.windows(2).all(|w| w[0].created >= w[1].created));
}

#[tokio::test]
async fn test_inspect_unknown_image_propagates_remote_error() {
    let inventory = Inventory::new(FakeImageService::default());

    let err = inventory.inspect("missing").await.unwrap_err();

    match err {
        HarbingerError::Rpc(status) => assert_eq!(status.code(), tonic::Code::NotFound),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_remove_returns_removed_manifests() {
    let service = FakeImageService {
        manifests: vec![manifest("3.18", 5), manifest("3.19", 9)],
        ..Default::default()
    };
    let inventory = Inventory::new(service);

    let removed = inventory.remove("alpine").await.unwrap();

    assert_eq!(removed.manifests.len(), 2);
    assert_eq!(removed.total_size(), 2000);
}

#[tokio::test]
async fn test_remove_unknown_image_is_not_translated_or_retried() {
    let inventory = Inventory::new(FakeImageService::default());

    let err = inventory.remove("ghost").await.unwrap_err();

    match err {
        HarbingerError::Rpc(status) => {
            assert_eq!(status.code(), tonic::Code::NotFound);
            assert_eq!(status.message(), "image ghost not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(inventory.service().calls(), 1);
}

#[tokio::test]
async fn test_prune_sends_default_request() {
    let service = FakeImageService {
        pruned: vec![ImageManifests {
            name: "alpine".to_string(),
            manifests: vec![manifest("3.18", 5)],
        }],
        ..Default::default()
    };
    let inventory = Inventory::new(service);

    let pruned = inventory.prune().await.unwrap();

    assert_eq!(pruned.total_manifests(), 1);
    assert_eq!(inventory.service().calls(), 1);
}

#[test]
fn test_manifest_record_from_wire() {
    let wire = rpc::Manifest {
        tag: "latest".to_string(),
        digest: "sha256:abc".to_string(),
        created: Some(prost_types::Timestamp {
            seconds: 1_700_000_000,
            nanos: 0,
        }),
        size: 4096,
        ..Default::default()
    };

    let record = manifest_record(wire);

    assert_eq!(record.tag, "latest");
    assert_eq!(record.size, 4096);
    assert_eq!(record.created.timestamp(), 1_700_000_000);
}

#[test]
fn test_manifest_record_without_timestamp_uses_epoch() {
    let record = manifest_record(rpc::Manifest::default());
    assert_eq!(record.created.timestamp(), 0);
}

#[test]
fn test_negative_sizes_clamp_to_zero() {
    let wire = rpc::Manifest {
        size: -5,
        ..Default::default()
    };
    assert_eq!(manifest_record(wire).size, 0);

    let wire_image = rpc::image_list_response::Image {
        name: "alpine".to_string(),
        manifests_count: -1,
        latest: None,
    };
    assert_eq!(image_record(wire_image).manifests_count, 0);
}

#[tokio::test]
async fn test_connect_rejects_empty_authority() {
    let result = GrpcImageService::connect("  ");
    assert!(matches!(result, Err(HarbingerError::Validation { .. })));
}

#[tokio::test]
async fn test_connect_is_lazy() {
    // Nothing listens on port 1; connect must still succeed.
    let service = GrpcImageService::connect("127.0.0.1:1").unwrap();
    assert_eq!(service.authority(), "127.0.0.1:1");
}

#[tokio::test]
async fn test_unreachable_service_fails_on_first_call() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let inventory = Inventory::new(GrpcImageService::connect(&addr.to_string()).unwrap());
    let err = inventory.list().await.unwrap_err();

    assert!(matches!(err, HarbingerError::Rpc(_)));
}

/// Minimal `diun.v4.ImageService` server answering ImageList and ImageRemove.
mod wire {
    use crate::rpc;
    use std::convert::Infallible;
    use std::task::{Context, Poll};
    use tonic::body::BoxBody;
    use tonic::codec::ProstCodec;
    use tonic::codegen::{BoxFuture, Service, empty_body, http};
    use tonic::server::{Grpc, NamedService, UnaryService};

    #[derive(Clone, Default)]
    pub struct InventoryServer {
        pub images: Vec<rpc::image_list_response::Image>,
    }

    impl NamedService for InventoryServer {
        const NAME: &'static str = "diun.v4.ImageService";
    }

    struct ListImages(Vec<rpc::image_list_response::Image>);

    impl UnaryService<rpc::ImageListRequest> for ListImages {
        type Response = rpc::ImageListResponse;
        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;

        fn call(&mut self, _request: tonic::Request<rpc::ImageListRequest>) -> Self::Future {
            let images = self.0.clone();
            Box::pin(async move { Ok(tonic::Response::new(rpc::ImageListResponse { images })) })
        }
    }

    /// Knows no image at all.
    struct RemoveImage;

    impl UnaryService<rpc::ImageRemoveRequest> for RemoveImage {
        type Response = rpc::ImageRemoveResponse;
        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;

        fn call(&mut self, request: tonic::Request<rpc::ImageRemoveRequest>) -> Self::Future {
            let name = request.into_inner().name;
            Box::pin(async move {
                Err(tonic::Status::not_found(format!("image {} not found", name)))
            })
        }
    }

    impl Service<http::Request<BoxBody>> for InventoryServer {
        type Response = http::Response<BoxBody>;
        type Error = Infallible;
        type Future = BoxFuture<Self::Response, Self::Error>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, request: http::Request<BoxBody>) -> Self::Future {
            let images = self.images.clone();
            match request.uri().path() {
                "/diun.v4.ImageService/ImageList" => Box::pin(async move {
                    let mut grpc = Grpc::new(ProstCodec::default());
                    Ok(grpc.unary(ListImages(images), request).await)
                }),
                "/diun.v4.ImageService/ImageRemove" => Box::pin(async move {
                    let mut grpc = Grpc::new(ProstCodec::default());
                    Ok(grpc.unary(RemoveImage, request).await)
                }),
                _ => Box::pin(async move {
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", tonic::Code::Unimplemented as i32)
                        .header(http::header::CONTENT_TYPE, "application/grpc")
                        .body(empty_body())
                        .unwrap())
                }),
            }
        }
    }

    /// Serves `server` on an ephemeral port and returns its authority.
    pub async fn serve(server: InventoryServer) -> (String, tokio::task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let authority = listener.local_addr().unwrap().to_string();
        let incoming =
            tonic::transport::server::TcpIncoming::from_listener(listener, true, None).unwrap();

        let handle = tokio::spawn(async move {
            tonic::transport::Server::builder()
                .add_service(server)
                .serve_with_incoming(incoming)
                .await
                .unwrap();
        });
        (authority, handle)
    }
}

fn wire_image(name: &str, count: i64, created: i64) -> rpc::image_list_response::Image {
    rpc::image_list_response::Image {
        name: name.to_string(),
        manifests_count: count,
        latest: Some(rpc::Manifest {
            tag: "latest".to_string(),
            digest: format!("sha256:{}", name.to_lowercase()),
            created: Some(prost_types::Timestamp {
                seconds: created,
                nanos: 0,
            }),
            size: 1_500,
            ..Default::default()
        }),
    }
}

#[tokio::test]
async fn test_grpc_list_decodes_and_sorts() {
    let (authority, server) = wire::serve(wire::InventoryServer {
        images: vec![
            wire_image("Zebra", 3, 1_700_000_000),
            wire_image("alpine", 1, 1_710_000_000),
        ],
    })
    .await;

    let inventory = Inventory::new(GrpcImageService::connect(&authority).unwrap());
    let list = inventory.list().await.unwrap();

    let names: Vec<&str> = list.images.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["alpine", "Zebra"]);
    assert_eq!(list.images[0].manifests_count, 1);
    assert_eq!(list.images[1].manifests_count, 3);

    let latest = list.images[0].latest.as_ref().unwrap();
    assert_eq!(latest.tag, "latest");
    assert_eq!(latest.digest, "sha256:alpine");
    assert_eq!(latest.created, Utc.timestamp_opt(1_710_000_000, 0).unwrap());
    assert_eq!(latest.size, 1_500);

    server.abort();
}

#[tokio::test]
async fn test_grpc_remove_not_found_is_returned_verbatim() {
    let (authority, server) = wire::serve(wire::InventoryServer::default()).await;

    let inventory = Inventory::new(GrpcImageService::connect(&authority).unwrap());
    let err = inventory.remove("ghost").await.unwrap_err();

    match err {
        HarbingerError::Rpc(status) => {
            assert_eq!(status.code(), tonic::Code::NotFound);
            assert_eq!(status.message(), "image ghost not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    server.abort();
}
