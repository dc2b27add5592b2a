//! Wire contract of the inventory service (`diun.v4.ImageService`).
//!
//! Messages are declared with prost derives instead of build-time codegen so
//! the crate builds without `protoc`. Field tags must match the service's
//! `image.proto`.

use std::collections::HashMap;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;

#[cfg(test)]
mod tests;

const SERVICE: &str = "diun.v4.ImageService";

#[derive(Clone, PartialEq, prost::Message)]
pub struct Manifest {
    #[prost(string, tag = "1")]
    pub tag: String,
    #[prost(string, tag = "2")]
    pub mime_type: String,
    #[prost(string, tag = "3")]
    pub digest: String,
    #[prost(message, optional, tag = "4")]
    pub created: Option<prost_types::Timestamp>,
    #[prost(map = "string, string", tag = "5")]
    pub labels: HashMap<String, String>,
    #[prost(bytes = "vec", tag = "6")]
    pub raw: Vec<u8>,
    #[prost(string, tag = "7")]
    pub platform: String,
    #[prost(int64, tag = "8")]
    pub size: i64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ImageListRequest {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ImageListResponse {
    #[prost(message, repeated, tag = "1")]
    pub images: Vec<image_list_response::Image>,
}

pub mod image_list_response {
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Image {
        #[prost(string, tag = "1")]
        pub name: String,
        #[prost(int64, tag = "2")]
        pub manifests_count: i64,
        #[prost(message, optional, tag = "3")]
        pub latest: Option<super::Manifest>,
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ImageInspectRequest {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ImageInspectResponse {
    #[prost(message, optional, tag = "1")]
    pub image: Option<image_inspect_response::Image>,
}

pub mod image_inspect_response {
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Image {
        #[prost(string, tag = "1")]
        pub name: String,
        #[prost(message, repeated, tag = "2")]
        pub manifests: Vec<super::Manifest>,
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ImageRemoveRequest {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ImageRemoveResponse {
    #[prost(message, repeated, tag = "1")]
    pub manifests: Vec<Manifest>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ImagePruneRequest {
    #[prost(bool, tag = "1")]
    pub all: bool,
    #[prost(string, tag = "2")]
    pub filter: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ImagePruneResponse {
    #[prost(message, repeated, tag = "1")]
    pub images: Vec<image_prune_response::Image>,
}

pub mod image_prune_response {
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Image {
        #[prost(string, tag = "1")]
        pub name: String,
        #[prost(message, repeated, tag = "2")]
        pub manifests: Vec<super::Manifest>,
    }
}

/// Unary client for the image service.
#[derive(Debug, Clone)]
pub struct ImageServiceClient {
    inner: tonic::client::Grpc<Channel>,
}

impl ImageServiceClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    pub async fn image_list(
        &mut self,
        request: ImageListRequest,
    ) -> Result<tonic::Response<ImageListResponse>, tonic::Status> {
        self.unary("ImageList", request).await
    }

    pub async fn image_inspect(
        &mut self,
        request: ImageInspectRequest,
    ) -> Result<tonic::Response<ImageInspectResponse>, tonic::Status> {
        self.unary("ImageInspect", request).await
    }

    pub async fn image_remove(
        &mut self,
        request: ImageRemoveRequest,
    ) -> Result<tonic::Response<ImageRemoveResponse>, tonic::Status> {
        self.unary("ImageRemove", request).await
    }

    pub async fn image_prune(
        &mut self,
        request: ImagePruneRequest,
    ) -> Result<tonic::Response<ImagePruneResponse>, tonic::Status> {
        self.unary("ImagePrune", request).await
    }

    async fn unary<Req, Resp>(
        &mut self,
        method: &str,
        request: Req,
    ) -> Result<tonic::Response<Resp>, tonic::Status>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unknown(format!("Service was not ready: {}", e)))?;

        let path = method_path(method)?;
        let codec: tonic::codec::ProstCodec<Req, Resp> = tonic::codec::ProstCodec::default();
        self.inner
            .unary(tonic::Request::new(request), path, codec)
            .await
    }
}

fn method_path(method: &str) -> Result<PathAndQuery, tonic::Status> {
    PathAndQuery::try_from(format!("/{}/{}", SERVICE, method))
        .map_err(|e| tonic::Status::internal(format!("invalid method path: {}", e)))
}
