use std::path::PathBuf;

use anyhow::{Context, Result};
use fishstore_dash::{generate_sample_csv, load_dataset};

const ROWS: usize = 500;
const SEED: u64 = 42;

fn main() -> Result<()> {
    env_logger::init();

    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("fish_store_sample.csv"));

    let csv = generate_sample_csv(ROWS, SEED).context("writing sample CSV")?;

    // Make sure what we ship actually loads.
    let table = load_dataset(csv.as_bytes()).context("validating sample CSV")?;

    std::fs::write(&output_path, &csv)
        .with_context(|| format!("writing {}", output_path.display()))?;

    log::info!("Wrote {} transactions to {}", table.len(), output_path.display());
    println!(
        "Wrote {} transactions to {}",
        table.len(),
        output_path.display()
    );
    Ok(())
}
