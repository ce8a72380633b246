//! Summary statistics for a readiness trends CSV.
//!
//! Usage: summarize [data.csv] [out.csv]
//!
//! Writes `MetricName,Mean,Median,Min,Max` to `out.csv` (default
//! `analysis/summary_statistics.csv`) and prints the yearly averages of the
//! dashboard metrics as JSON.

use anyhow::{Context, Result};
use serde_json::json;
use std::env;
use std::path::PathBuf;

use readiness_dashboard::catalog::Catalog;
use readiness_dashboard::summary::{write_summary_csv, ReadinessData};

fn main() -> Result<()> {
    let data_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/africa_ai_readiness_trends_2019-2025_generated.csv"));
    let out_path = env::args()
        .nth(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("analysis/summary_statistics.csv"));

    let data = ReadinessData::load(&data_path)
        .with_context(|| format!("failed to load {}", data_path.display()))?;
    for warning in data.warnings.iter().take(10) {
        eprintln!("warning: {}", warning);
    }

    let stats = data.summarize();
    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_summary_csv(&out_path, &stats)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    let trends: Vec<_> = Catalog::builtin()
        .ids()
        .map(|id| json!({ "metric": id, "points": data.yearly_averages(id) }))
        .collect();
    let payload = json!({
        "rows": data.rows.len(),
        "bad_rows": data.bad_rows,
        "metrics": stats.len(),
        "trends": trends,
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    eprintln!("wrote summary {}", out_path.display());
    Ok(())
}
