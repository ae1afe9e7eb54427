use std::path::Path;

use eiger2cbf_core::consts::DEFAULT_WORKERS;
use eiger2cbf_core::error::ConvertError;
use eiger2cbf_core::pipeline::config::{derive_prefix, ConversionConfig, FrameRange};

#[test]
fn test_default_config() {
    let cfg = ConversionConfig::default();
    assert!(cfg.renumber);
    assert_eq!(cfg.workers, DEFAULT_WORKERS);
    assert_eq!(cfg.prefix, None);
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let cfg: ConversionConfig = toml::from_str(
        r#"
        input = "/data/lyso_master.h5"
        last_frame = 10
        "#,
    )
    .unwrap();
    assert_eq!(cfg.input, Path::new("/data/lyso_master.h5"));
    assert_eq!(cfg.last_frame, Some(10));
    assert_eq!(cfg.first_frame, None);
    assert!(cfg.renumber);
    assert_eq!(cfg.workers, DEFAULT_WORKERS);
}

#[test]
fn test_full_toml() {
    let cfg: ConversionConfig = toml::from_str(
        r#"
        input = "run.h5"
        prefix = "out/run_"
        first_frame = 5
        last_frame = 9
        renumber = false
        workers = 8
        "#,
    )
    .unwrap();
    assert_eq!(cfg.output_prefix(), "out/run_");
    assert!(!cfg.renumber);
    assert_eq!(cfg.workers, 8);
    assert_eq!(cfg.frame_range(100).unwrap(), FrameRange { first: 5, last: 9 });
}

#[test]
fn test_frame_range_rules() {
    let with = |first, last| ConversionConfig {
        first_frame: first,
        last_frame: last,
        ..ConversionConfig::default()
    };

    assert_eq!(with(None, None).frame_range(7).unwrap(), FrameRange { first: 1, last: 7 });
    assert_eq!(with(Some(4), None).frame_range(7).unwrap(), FrameRange { first: 4, last: 4 });
    assert_eq!(with(None, Some(3)).frame_range(7).unwrap(), FrameRange { first: 1, last: 3 });
    // An explicit end may run past the reported count.
    assert_eq!(with(Some(2), Some(9)).frame_range(7).unwrap().len(), 8);
}

#[test]
fn test_invalid_frame_ranges() {
    assert!(matches!(
        FrameRange::new(0, 5),
        Err(ConvertError::InvalidRange { from: 0, to: 5 })
    ));
    assert!(matches!(
        FrameRange::new(6, 5),
        Err(ConvertError::InvalidRange { from: 6, to: 5 })
    ));
    // No frames reported and no bounds given.
    let cfg = ConversionConfig::default();
    assert!(cfg.frame_range(0).is_err());
}

#[test]
fn test_derive_prefix() {
    assert_eq!(derive_prefix(Path::new("/data/insu6_1_master.h5")), "insu6_1_");
    assert_eq!(derive_prefix(Path::new("series_7_master.hdf5")), "series_7_");
    assert_eq!(derive_prefix(Path::new("/data/scan.h5")), "scan_");
}

#[test]
fn test_explicit_prefix_wins() {
    let cfg = ConversionConfig {
        input: "/data/insu6_1_master.h5".into(),
        prefix: Some("frames/".into()),
        ..ConversionConfig::default()
    };
    assert_eq!(cfg.output_prefix(), "frames/");

    let derived = ConversionConfig {
        prefix: None,
        ..cfg
    };
    assert_eq!(derived.output_prefix(), "insu6_1_");
}
