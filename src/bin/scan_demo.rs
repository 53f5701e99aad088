use scan_analyzer::config::{load_config, RuntimeConfig};
use scan_analyzer::image::io::{load_grayscale_image, write_json_file};
use scan_analyzer::report::AnalysisOutcome;
use scan_analyzer::{AnalyzerParams, ScanAnalyzer};
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let path = env::args()
        .nth(1)
        .ok_or_else(|| "usage: scan_demo <config.json | image-file>".to_string())?;
    let path = PathBuf::from(path);

    // a .json argument is a runtime config; anything else is an image
    // analyzed with default parameters
    let config = if path.extension().and_then(|e| e.to_str()) == Some("json") {
        load_config(&path)?
    } else {
        RuntimeConfig {
            input: path,
            output: Default::default(),
            params: AnalyzerParams::default(),
        }
    };

    let gray = load_grayscale_image(&config.input)?;
    let analyzer = ScanAnalyzer::new(config.params.clone());
    let outcome: AnalysisOutcome = analyzer.analyze(&gray.as_view()).into();

    if let AnalysisOutcome::Success(report) = &outcome {
        print_text_summary(report);
    }

    if let Some(json_out) = &config.output.json_out {
        write_json_file(json_out, &outcome)?;
        println!("JSON report written to {}", json_out.display());
    } else {
        let json = serde_json::to_string_pretty(&outcome)
            .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
        println!("{json}");
    }

    Ok(())
}

fn print_text_summary(report: &scan_analyzer::AnalysisReport) {
    let oa = &report.overall_assessment;
    println!("Analysis summary");
    println!("  risk: {:?}", oa.risk_level);
    println!("  confidence: {:.3}", oa.confidence);
    println!("  regions: {}", oa.num_regions_detected);
    println!("  total volume (mm3): {}", oa.total_volume_mm3);
    for region in &report.detected_regions {
        println!(
            "  - {} {:?} bbox=({},{},{}x{}) confidence={:.3} risk={:?}",
            region.id,
            region.tumor_type,
            region.bbox.x,
            region.bbox.y,
            region.bbox.width,
            region.bbox.height,
            region.confidence,
            region.risk_level
        );
    }
}
