use super::*;
use prost::Message;

#[test]
fn test_method_path() {
    let path = method_path("ImageList").unwrap();
    assert_eq!(path.as_str(), "/diun.v4.ImageService/ImageList");
}

#[test]
fn test_default_prune_request_is_empty_on_the_wire() {
    let request = ImagePruneRequest::default();
    assert!(request.encode_to_vec().is_empty());
}

#[test]
fn test_inspect_request_encodes_name_as_field_one() {
    let request = ImageInspectRequest {
        name: "alpine".to_string(),
    };
    let bytes = request.encode_to_vec();

    // field 1, wire type 2 (length-delimited), length 6
    assert_eq!(&bytes[..2], &[0x0a, 0x06]);
    assert_eq!(&bytes[2..], b"alpine");
}

#[test]
fn test_manifest_size_is_field_eight() {
    let manifest = Manifest {
        size: 1,
        ..Default::default()
    };
    // field 8, wire type 0 (varint)
    assert_eq!(manifest.encode_to_vec(), vec![0x40, 0x01]);
}
