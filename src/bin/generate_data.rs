//! Write a synthetic readiness trends CSV.
//!
//! Usage: generate_data [out.csv] [seed]
//!
//! Defaults to `data/africa_ai_readiness_trends_2019-2025_generated.csv`. The
//! seed comes from the second argument, then `GENERATE_SEED`, then the clock.
//! The table is placeholder data: cross-check against real sources before
//! drawing conclusions from it.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use readiness_dashboard::generate::{write_csv, Generator, COUNTRIES, DEFAULT_OUTPUT, METRIC_NAMES, YEARS};

fn seed_arg(raw: Option<String>) -> Result<Option<u64>> {
    raw.map(|s| s.parse::<u64>().with_context(|| format!("invalid seed {:?}", s)))
        .transpose()
}

fn main() -> Result<()> {
    let out_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let seed = match seed_arg(env::args().nth(2))? {
        Some(seed) => seed,
        None => seed_arg(env::var("GENERATE_SEED").ok())?
            .unwrap_or_else(|| chrono::Utc::now().timestamp_millis() as u64),
    };

    eprintln!(
        "generating {} countries x {} metrics x {} years (seed {})",
        COUNTRIES.len(),
        METRIC_NAMES.len(),
        YEARS.count(),
        seed
    );
    let rows = Generator::seeded(seed).rows();
    write_csv(&out_path, &rows).with_context(|| format!("failed to write {}", out_path.display()))?;

    let missing = rows.iter().filter(|r| r.value.is_na()).count();
    eprintln!(
        "wrote {} rows ({} NA) to {}",
        rows.len(),
        missing,
        out_path.display()
    );
    eprintln!("synthetic data: values are plausible placeholders, not measurements");
    Ok(())
}
