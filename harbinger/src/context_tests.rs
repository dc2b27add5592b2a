use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_verbosity_from_count() {
    assert_eq!(VerbosityLevel::from_count(0), VerbosityLevel::Normal);
    assert_eq!(VerbosityLevel::from_count(1), VerbosityLevel::Verbose);
    assert_eq!(VerbosityLevel::from_count(2), VerbosityLevel::VeryVerbose);
    assert_eq!(VerbosityLevel::from_count(3), VerbosityLevel::Trace);
    assert_eq!(VerbosityLevel::from_count(9), VerbosityLevel::Trace);
}

#[test]
fn test_verbosity_filter_directive() {
    assert_eq!(VerbosityLevel::Normal.filter_directive(), "warn");
    assert_eq!(VerbosityLevel::Verbose.filter_directive(), "info");
    assert_eq!(VerbosityLevel::VeryVerbose.filter_directive(), "debug");
    assert_eq!(VerbosityLevel::Trace.filter_directive(), "trace");
}

#[test]
fn test_build_with_explicit_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "grpc:\n  authority: inventory.local:9000").unwrap();

    let ctx = AppContext::build(
        Some(file.path()),
        ColorChoice::Never,
        VerbosityLevel::Normal,
    )
    .unwrap();

    assert_eq!(ctx.config.grpc.authority, "inventory.local:9000");
    assert_eq!(ctx.color, ColorChoice::Never);
}

#[test]
fn test_build_with_missing_explicit_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.yml");

    let err = AppContext::build(Some(&missing), ColorChoice::Auto, VerbosityLevel::Normal)
        .unwrap_err();

    assert!(err.contains("nope.yml"));
}

#[test]
fn test_grpc_authority_flag_wins() {
    let ctx = AppContext::with_config(Config::default(), ColorChoice::Never, VerbosityLevel::Normal);

    assert_eq!(ctx.grpc_authority(None), "127.0.0.1:42286");
    assert_eq!(ctx.grpc_authority(Some("10.0.0.5:42286")), "10.0.0.5:42286");
    assert_eq!(ctx.grpc_authority(Some("  ")), "127.0.0.1:42286");
}
