use clap::Parser;
use henkan::prelude::*;
use serde_json::Value;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Runs a declarative transformer definition over a JSON data file
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the transformer definition JSON file
    definition_path: String,
    /// Path to the data JSON file (an object, an array of objects, or null)
    data_path: String,

    /// Render with the minimal structure
    #[arg(short, long)]
    minimal: bool,

    /// Pretty-print the output
    #[arg(short, long)]
    pretty: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let total_start = Instant::now();

    // --- 1. File Loading ---
    let definition_json = fs::read_to_string(&cli.definition_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read definition file '{}': {}",
            &cli.definition_path, e
        ))
    });
    let data_json = fs::read_to_string(&cli.data_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read data file '{}': {}",
            &cli.data_path, e
        ))
    });

    // --- 2. Definition ---
    let build_start = Instant::now();
    let transformer = DefinedTransformer::new(definition_json.as_str())
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid definition: {}", e)));
    let build_duration = build_start.elapsed();

    let data: Value = serde_json::from_str(&data_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse data JSON: {}", e)));

    // --- 3. Transform ---
    let variant = if cli.minimal {
        Variant::Minimal
    } else {
        Variant::Full
    };
    let input = match &data {
        Value::Array(items) => Input::many(items),
        other => Input::from(other),
    };

    let transform_start = Instant::now();
    let output = TransformEngine::new(&Preloaded)
        .transform(input, &transformer, variant)
        .unwrap_or_else(|e| exit_with_error(&format!("Transform failed: {}", e)));
    let transform_duration = transform_start.elapsed();

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize output: {}", e)));
    println!("{}", rendered);

    // --- 4. Summary ---
    eprintln!("\n--- Performance Summary ---");
    eprintln!("Transformer:          {}", transformer.name());
    eprintln!("Variant:              {:?}", variant);
    eprintln!("Definition Build:     {:?}", build_duration);
    eprintln!("Transform:            {:?}", transform_duration);
    eprintln!("Total Execution:      {:?}", total_start.elapsed());
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
