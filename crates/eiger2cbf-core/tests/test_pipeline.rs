mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use approx::assert_relative_eq;
use tempfile::TempDir;

use eiger2cbf_core::classify::classify;
use eiger2cbf_core::error::ConvertError;
use eiger2cbf_core::frame::{PixelMask, RawFrame};
use eiger2cbf_core::io::cbf::parse_record;
use eiger2cbf_core::metadata::paths;
use eiger2cbf_core::pipeline::config::ConversionConfig;
use eiger2cbf_core::pipeline::{
    run_conversion, run_conversion_reported, ConversionPlan, ConversionScheduler,
    ConversionStage, ProgressReporter,
};

use common::{
    dataset, firmware_1_8_metadata, frame_pixels, warnings, with_blocks, with_captured_logs,
    HEIGHT, WIDTH,
};

fn config(dir: &TempDir, first: Option<u64>, last: Option<u64>) -> ConversionConfig {
    ConversionConfig {
        prefix: Some(format!("{}/img_", dir.path().display())),
        first_frame: first,
        last_frame: last,
        workers: 4,
        ..ConversionConfig::default()
    }
}

fn output_names(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_converts_all_frames_by_default() {
    let dir = TempDir::new().unwrap();
    let c = dataset(5, 2, 0.0);

    let summary = run_conversion(&c, &config(&dir, None, None)).unwrap();
    assert!(summary.is_complete());
    assert_eq!(summary.converted.len(), 5);
    assert_eq!(summary.renumbered().count(), 0);
    assert_eq!(
        output_names(&dir),
        vec![
            "img_000001.cbf",
            "img_000002.cbf",
            "img_000003.cbf",
            "img_000004.cbf",
            "img_000005.cbf",
        ]
    );
}

#[test]
fn test_range_past_stored_frames_fails_only_missing_ones() {
    let dir = TempDir::new().unwrap();
    let c = dataset(3, 2, 0.0);

    let (summary, lines) =
        with_captured_logs(|| run_conversion(&c, &config(&dir, Some(1), Some(5))).unwrap());
    let converted: Vec<u64> = summary.converted.iter().map(|f| f.frame).collect();
    let failed: Vec<u64> = summary.failed.iter().map(|f| f.frame).collect();
    assert_eq!(converted, vec![1, 2, 3]);
    assert_eq!(failed, vec![4, 5]);
    assert!(matches!(summary.failed[0].error, ConvertError::Container(_)));
    assert_eq!(summary.reported_frames, 3);
    assert!(!summary.is_complete());
    assert_eq!(output_names(&dir).len(), 3);

    let warned = warnings(&lines, "bigger than the reported frame count");
    assert_eq!(warned.len(), 2);
    assert!(warned.iter().any(|l| l.contains("frame=4")));
    assert!(warned.iter().any(|l| l.contains("frame=5")));
}

#[test]
fn test_under_reported_frames_are_still_converted() {
    // Five frames stored, but nimages and the omega table only cover three.
    let frames: Vec<Vec<u32>> = (0..5).map(|i| frame_pixels(WIDTH, HEIGHT, i)).collect();
    let c = with_blocks(
        firmware_1_8_metadata(WIDTH, HEIGHT, 3).with_floats(paths::OMEGA, vec![0.0, 0.1, 0.2]),
        paths::ENTRY_DATA,
        1,
        5,
        &frames,
        WIDTH,
        HEIGHT,
    );
    let dir = TempDir::new().unwrap();

    let (summary, lines) =
        with_captured_logs(|| run_conversion(&c, &config(&dir, Some(1), Some(5))).unwrap());
    assert!(summary.is_complete());
    let converted: Vec<u64> = summary.converted.iter().map(|f| f.frame).collect();
    assert_eq!(converted, vec![1, 2, 3, 4, 5]);
    assert_relative_eq!(summary.converted[4].start_angle, 0.4, epsilon = 1e-9);
    assert_eq!(summary.converted[4].output_number, 5);
    assert_eq!(output_names(&dir).len(), 5);

    let parsed = parse_record(&std::fs::read(&summary.converted[4].path).unwrap()).unwrap();
    let expected: Vec<i32> = frames[4].iter().map(|&v| v as i32).collect();
    assert_eq!(parsed.pixels, expected);

    assert_eq!(warnings(&lines, "bigger than the reported frame count").len(), 2);
    assert_eq!(warnings(&lines, "no entry in the angle table").len(), 2);
    assert!(warnings(&lines, "Requested range extends").is_empty());
}

#[test]
fn test_single_frame_when_only_start_is_given() {
    let dir = TempDir::new().unwrap();
    let c = dataset(5, 2, 0.0);

    let summary = run_conversion(&c, &config(&dir, Some(3), None)).unwrap();
    assert_eq!(summary.converted.len(), 1);
    assert_eq!(summary.converted[0].frame, 3);
    assert_eq!(output_names(&dir), vec!["img_000003.cbf"]);
}

#[test]
fn test_invalid_range_is_rejected_before_any_output() {
    let dir = TempDir::new().unwrap();
    let c = dataset(5, 2, 0.0);

    let err = run_conversion(&c, &config(&dir, Some(4), Some(2))).unwrap_err();
    assert!(matches!(err, ConvertError::InvalidRange { from: 4, to: 2 }));
    assert!(output_names(&dir).is_empty());
}

#[test]
fn test_output_named_by_angle_when_renumbering() {
    let dir = TempDir::new().unwrap();
    let c = dataset(4, 2, 0.0).with_floats(paths::OMEGA, vec![0.0, 0.1, 0.2, 90.0]);

    let summary = run_conversion(&c, &config(&dir, None, None)).unwrap();
    assert!(summary.is_complete());
    let renumbered: Vec<(u64, i64)> = summary
        .renumbered()
        .map(|f| (f.frame, f.output_number))
        .collect();
    assert_eq!(renumbered, vec![(4, 901)]);
    assert!(output_names(&dir).contains(&"img_000901.cbf".to_string()));
    assert_relative_eq!(summary.converted[3].start_angle, 90.0);
}

#[test]
fn test_renumbering_disabled_keeps_frame_numbers() {
    let dir = TempDir::new().unwrap();
    let c = dataset(4, 2, 0.0).with_floats(paths::OMEGA, vec![0.0, 0.1, 0.2, 90.0]);
    let cfg = ConversionConfig {
        renumber: false,
        ..config(&dir, None, None)
    };

    let summary = run_conversion(&c, &cfg).unwrap();
    assert_eq!(summary.renumbered().count(), 0);
    assert!(output_names(&dir).contains(&"img_000004.cbf".to_string()));
}

#[test]
fn test_synthesized_angles_without_omega_table() {
    let dir = TempDir::new().unwrap();
    let mut c = dataset(3, 3, 0.0);
    c.remove(paths::OMEGA);

    let summary = run_conversion(&c, &config(&dir, None, None)).unwrap();
    assert!(summary.is_complete());
    for f in &summary.converted {
        assert_relative_eq!(f.start_angle, 0.1 * f.frame as f64, epsilon = 1e-12);
        assert_eq!(f.output_number, f.frame as i64);
    }
}

#[test]
fn test_bad_block_fails_only_its_frames() {
    let dir = TempDir::new().unwrap();
    let c = dataset(4, 2, 0.0)
        .with_pixels(
            "/entry/data/data_000002",
            &[2, HEIGHT, WIDTH + 1],
            vec![0; 2 * HEIGHT * (WIDTH + 1)],
        )
        .unwrap();

    let summary = run_conversion(&c, &config(&dir, None, None)).unwrap();
    let converted: Vec<u64> = summary.converted.iter().map(|f| f.frame).collect();
    assert_eq!(converted, vec![1, 2]);
    assert_eq!(summary.failed.len(), 2);
    for failure in &summary.failed {
        assert!(matches!(failure.error, ConvertError::Dimension { .. }));
    }
}

#[test]
fn test_output_matches_classified_pixels() {
    let dir = TempDir::new().unwrap();
    let mut flags = vec![0u32; WIDTH * HEIGHT];
    flags[0] = 1;
    flags[7] = 4;
    let c = dataset(3, 2, 10.0).with_flags(paths::PIXEL_MASK, flags.clone());

    let summary = run_conversion(&c, &config(&dir, Some(2), Some(2))).unwrap();
    let path = &summary.converted[0].path;
    let parsed = parse_record(&std::fs::read(path).unwrap()).unwrap();

    let raw = RawFrame::new(frame_pixels(WIDTH, HEIGHT, 1), WIDTH, HEIGHT);
    let expected = classify(&raw, &PixelMask::Present(flags), 65535).unwrap();
    assert_eq!(parsed.pixels, expected.data);
    assert_eq!(parsed.pixels[0], -1);
    assert_eq!(parsed.pixels[7], -2);
    assert!(parsed.header_text.contains("# Start_angle 10.100000 deg."));
    assert!(parsed.header_text.contains("# Count_cutoff 12440 counts"));
}

#[test]
fn test_missing_grid_aborts_before_conversion() {
    let dir = TempDir::new().unwrap();
    let mut c = dataset(2, 2, 0.0);
    c.remove(paths::Y_PIXELS);

    let err = run_conversion(&c, &config(&dir, None, None)).unwrap_err();
    assert!(matches!(err, ConvertError::InvalidDimensions { .. }));
}

#[test]
fn test_scheduler_with_single_worker() {
    let dir = TempDir::new().unwrap();
    let c = dataset(4, 3, 0.0);
    let plan = ConversionPlan::analyze(&c, true).unwrap();
    let range = config(&dir, None, None)
        .frame_range(plan.metadata.total_frames())
        .unwrap();

    let prefix = format!("{}/one_", dir.path().display());
    let reporter: Arc<dyn ProgressReporter> = Arc::new(CountingReporter::default());
    let summary = ConversionScheduler::new(&c, &plan, prefix, 1)
        .run(range, &reporter)
        .unwrap();
    assert_eq!(summary.converted.len(), 4);
    assert!(output_names(&dir).iter().all(|n| n.starts_with("one_")));
}

#[derive(Default)]
struct CountingReporter {
    stages: Mutex<Vec<ConversionStage>>,
    advanced: AtomicUsize,
    finished: AtomicUsize,
}

impl ProgressReporter for CountingReporter {
    fn begin_stage(&self, stage: ConversionStage, _total_items: Option<usize>) {
        self.stages.lock().unwrap().push(stage);
    }

    fn advance(&self, _items_done: usize) {
        self.advanced.fetch_add(1, Ordering::Relaxed);
    }

    fn finish_stage(&self) {
        self.finished.fetch_add(1, Ordering::Relaxed);
    }
}

#[test]
fn test_progress_reported_per_frame() {
    let dir = TempDir::new().unwrap();
    let c = dataset(3, 2, 0.0);
    let reporter = Arc::new(CountingReporter::default());

    run_conversion_reported(&c, &config(&dir, Some(1), Some(5)), reporter.clone()).unwrap();
    assert_eq!(
        *reporter.stages.lock().unwrap(),
        vec![ConversionStage::Analyzing, ConversionStage::Converting]
    );
    assert_eq!(reporter.advanced.load(Ordering::Relaxed), 5);
    assert_eq!(reporter.finished.load(Ordering::Relaxed), 2);
}
