// src/main.rs

use dazzlodocs::{DocumentRequest, GeneratorError, generate};
use std::env;
use std::fs;
use std::time::Instant;

/// A simple CLI to generate a styled PDF from a JSON request file.
fn main() -> Result<(), GeneratorError> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Generate a styled academic PDF from a JSON request.");
        eprintln!();
        eprintln!(
            "Usage: {} <path/to/request.json> [path/to/output.pdf]",
            args[0]
        );
        eprintln!();
        eprintln!("When the output path is omitted, a filename is derived from");
        eprintln!("the student name and subject in the request.");
        std::process::exit(1);
    }

    let request_path = &args[1];

    println!("Loading request from {}", request_path);
    let request_json = fs::read_to_string(request_path)?;
    let request: DocumentRequest = serde_json::from_str(&request_json)?;

    let output_path = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| request.suggested_filename());

    println!("Generating PDF to {}...", output_path);
    let start = Instant::now();
    let pdf_bytes = generate(&request)?;
    fs::write(&output_path, &pdf_bytes)?;

    println!(
        "Successfully generated {} ({} bytes in {:.2?})",
        output_path,
        pdf_bytes.len(),
        start.elapsed()
    );
    Ok(())
}
