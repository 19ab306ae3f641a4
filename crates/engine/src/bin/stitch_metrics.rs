use std::env;
use std::fs;
use std::process::ExitCode;

use needlepoint_engine::pipeline::{DocumentOptions, Region, stitch_document};
use needlepoint_engine::{Color, Stitch};

#[derive(serde::Deserialize)]
struct DocumentFile {
    #[serde(default)]
    options: DocumentOptions,
    regions: Vec<Region>,
}

#[derive(serde::Serialize)]
struct StitchMetricsOutput {
    stitch_count: usize,
    jump_count: usize,
    color_count: usize,
    travel_px: f64,
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        return Err("Usage: stitch_metrics --input <document.json>".to_string());
    }

    let mut input_path: Option<String> = None;
    let mut i = 1;
    while i < args.len() {
        if args[i].as_str() == "--input" {
            i += 1;
            let value = args
                .get(i)
                .ok_or_else(|| "--input requires a value".to_string())?;
            input_path = Some(value.clone());
        }
        i += 1;
    }

    let input_path = input_path.ok_or_else(|| "Missing required --input argument".to_string())?;
    let content = fs::read_to_string(&input_path)
        .map_err(|e| format!("Failed reading '{input_path}': {e}"))?;
    let document: DocumentFile =
        serde_json::from_str(&content).map_err(|e| format!("Invalid document JSON: {e}"))?;

    let stitches = stitch_document(&document.regions, &document.options)
        .map_err(|e| format!("Stitching failed: {e}"))?;

    let output = compute_metrics(&stitches);
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| format!("Failed to serialize metrics output: {e}"))?;
    println!("{json}");
    Ok(())
}

fn compute_metrics(stitches: &[Stitch]) -> StitchMetricsOutput {
    let mut colors: Vec<Color> = Vec::new();
    let mut travel_px = 0.0;

    for (i, stitch) in stitches.iter().enumerate() {
        if !colors.contains(&stitch.color) {
            colors.push(stitch.color);
        }
        if i > 0 {
            travel_px += stitch.position.distance_to(stitches[i - 1].position);
        }
    }

    StitchMetricsOutput {
        stitch_count: stitches.len(),
        jump_count: stitches.iter().filter(|s| s.jump).count(),
        color_count: colors.len(),
        travel_px,
    }
}
