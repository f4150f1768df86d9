use log::warn;
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};
use window_detector::config::detect;
use window_detector::image::io::{load_grayscale_image, write_json_file};
use window_detector::{
    load_classifier, DetectionReport, LinearWindowClassifier, Metadata, Sample, Size,
    WindowDetector,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageResult {
    path: PathBuf,
    records: Vec<Metadata>,
    report: DetectionReport,
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let program = env::args()
        .next()
        .unwrap_or_else(|| "window-detector".to_string());
    let config = detect::parse_cli(&program)?;

    let mut classifier = LinearWindowClassifier::new(Size::default());
    load_classifier(&config.model_path, &mut classifier).map_err(|e| {
        warn!("model not loaded: {e}");
        e.to_string()
    })?;
    let detector =
        WindowDetector::new(classifier, config.detector.clone()).map_err(|e| e.to_string())?;

    let mut results = Vec::with_capacity(config.input_paths.len());
    for path in &config.input_paths {
        let gray = load_grayscale_image(path)?;
        let sample = Sample::new(gray).with_enroll_all(config.enroll_all);
        let (records, report) = detector
            .process_with_diagnostics(&sample)
            .map_err(|e| format!("Detection failed for {}: {e}", path.display()))?;
        let result = ImageResult {
            path: path.clone(),
            records: records.into_iter().map(|r| r.metadata).collect(),
            report,
        };
        if config.output.text {
            print_text_summary(&result);
        }
        results.push(result);
    }

    match &config.output.json_out {
        Some(path) => {
            write_json_file(path, &results)?;
            println!("JSON report written to {}", path.display());
        }
        None if !config.output.text => {
            let json = serde_json::to_string_pretty(&results)
                .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
            println!("{json}");
        }
        None => {}
    }
    Ok(())
}

fn print_text_summary(result: &ImageResult) {
    let report = &result.report;
    println!("{}", display_name(&result.path));
    println!(
        "  size: {}x{} enroll_all={}",
        report.input.width, report.input.height, report.input.enroll_all
    );
    if report.is_passthrough() {
        println!("  empty image, forwarded unchanged");
        return;
    }
    if let Some(scan) = &report.scan {
        println!(
            "  scan: levels={} windows={} candidates={} elapsed_ms={:.3}",
            scan.levels.len(),
            scan.windows_evaluated(),
            scan.candidates,
            scan.elapsed_ms
        );
        for lvl in &scan.levels {
            println!(
                "    L{}: factor={:.3} window={}x{} scaled={}x{} step={} windows={} candidates={}",
                lvl.level_index,
                lvl.factor,
                lvl.window_width,
                lvl.window_height,
                lvl.scaled_width,
                lvl.scaled_height,
                lvl.step,
                lvl.windows_evaluated,
                lvl.candidates
            );
        }
    }
    if let Some(cluster) = &report.cluster {
        println!(
            "  grouping: classes={} kept={} small={} nested={}",
            cluster.classes, cluster.detections, cluster.rejected_small, cluster.suppressed_nested
        );
    }
    for det in &report.detections {
        println!(
            "  detection: x={} y={} w={} h={} confidence={:.3} neighbors={}",
            det.rect.x, det.rect.y, det.rect.width, det.rect.height, det.confidence, det.neighbors
        );
    }
    if report.fallback {
        println!("  (no detections, whole image used)");
    }
    println!("  total_ms: {:.3}", report.timings.total_ms);
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
