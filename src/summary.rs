//! Readiness trends data: loading, yearly averages and summary statistics.
//!
//! Input is the generated trends CSV (`CountryName,CountryISO3,Year,MetricName,
//! Value,DataType,Source`). Values are numeric for most metrics and textual
//! for policy statuses; only numeric values take part in statistics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::error::{DashboardError, Result};

pub const EXPECTED_COLUMNS: [&str; 7] = [
    "CountryName",
    "CountryISO3",
    "Year",
    "MetricName",
    "Value",
    "DataType",
    "Source",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessRow {
    pub country: String,
    pub iso3: String,
    pub year: i32,
    pub metric: String,
    /// `None` for NA and textual values
    pub value: Option<f64>,
    pub data_type: String,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyAverage {
    pub year: i32,
    pub mean: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub metric: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

/// Split one CSV line, honoring double quotes and `""` escapes.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

fn parse_value(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("na") {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_readiness_line(line: &str) -> Result<ReadinessRow> {
    let parts = split_csv_line(line);
    if parts.len() != EXPECTED_COLUMNS.len() {
        return Err(DashboardError::Data(format!(
            "expected {} columns, got {}",
            EXPECTED_COLUMNS.len(),
            parts.len()
        )));
    }
    let year = parts[2]
        .trim()
        .parse::<i32>()
        .map_err(|e| DashboardError::Data(format!("bad year {:?}: {}", parts[2], e)))?;
    let metric = parts[3].trim();
    if metric.is_empty() {
        return Err(DashboardError::Data("empty metric name".to_string()));
    }
    Ok(ReadinessRow {
        country: parts[0].trim().to_string(),
        iso3: parts[1].trim().to_string(),
        year,
        metric: metric.to_string(),
        value: parse_value(&parts[4]),
        data_type: parts[5].trim().to_string(),
        source: parts[6].trim().to_string(),
    })
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReadinessData {
    pub rows: Vec<ReadinessRow>,
    pub bad_rows: u64,
    pub warnings: Vec<String>,
}

impl ReadinessData {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut data = ReadinessData::default();
        let mut saw_header = false;

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if !saw_header {
                let header = split_csv_line(trimmed);
                if header.iter().map(|h| h.trim()).ne(EXPECTED_COLUMNS.iter().copied()) {
                    return Err(DashboardError::Data(format!(
                        "schema mismatch: got {:?} expected {:?}",
                        header, EXPECTED_COLUMNS
                    )));
                }
                saw_header = true;
                continue;
            }
            match parse_readiness_line(trimmed) {
                Ok(row) => data.rows.push(row),
                Err(err) => {
                    data.bad_rows += 1;
                    data.warnings.push(format!("bad_row: {}", err));
                }
            }
        }

        if !saw_header {
            return Err(DashboardError::Data("missing header".to_string()));
        }
        Ok(data)
    }

    fn numeric(&self, metric: &str) -> impl Iterator<Item = (i32, f64)> + '_ {
        let metric = metric.to_string();
        self.rows
            .iter()
            .filter(move |r| r.metric == metric)
            .filter_map(|r| r.value.map(|v| (r.year, v)))
    }

    /// Mean value per year for `metric`, ordered by year.
    pub fn yearly_averages(&self, metric: &str) -> Vec<YearlyAverage> {
        let mut by_year: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
        for (year, value) in self.numeric(metric) {
            let slot = by_year.entry(year).or_insert((0.0, 0));
            slot.0 += value;
            slot.1 += 1;
        }
        by_year
            .into_iter()
            .map(|(year, (sum, count))| YearlyAverage {
                year,
                mean: sum / count as f64,
                count,
            })
            .collect()
    }

    pub fn summary_for(&self, metric: &str) -> Option<MetricSummary> {
        let values: Vec<f64> = self.numeric(metric).map(|(_, v)| v).collect();
        summarize_values(metric, values)
    }

    /// Statistics for every metric with at least one numeric value, by name.
    pub fn summarize(&self) -> Vec<MetricSummary> {
        let mut by_metric: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for row in &self.rows {
            if let Some(v) = row.value {
                by_metric.entry(row.metric.as_str()).or_default().push(v);
            }
        }
        by_metric
            .into_iter()
            .filter_map(|(metric, values)| summarize_values(metric, values))
            .collect()
    }
}

fn summarize_values(metric: &str, mut values: Vec<f64>) -> Option<MetricSummary> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let mid = count / 2;
    let median = if count % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    };
    Some(MetricSummary {
        metric: metric.to_string(),
        count,
        mean,
        median,
        min: values[0],
        max: values[count - 1],
    })
}

pub fn write_summary_csv(path: &Path, stats: &[MetricSummary]) -> Result<()> {
    let mut out = std::io::BufWriter::new(File::create(path)?);
    writeln!(out, "MetricName,Mean,Median,Min,Max")?;
    // Debug formatting keeps the decimal point on whole floats (35.0, not 35).
    for s in stats {
        writeln!(out, "{},{:?},{:?},{:?},{:?}", s.metric, s.mean, s.median, s.min, s.max)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_quoted_fields() {
        let parts = split_csv_line("\"Congo, Dem. Rep.\",COD,2020,X,1.5,Actual,WB Data");
        assert_eq!(parts.len(), 7);
        assert_eq!(parts[0], "Congo, Dem. Rep.");

        let escaped = split_csv_line("\"say \"\"hi\"\"\",b");
        assert_eq!(escaped, vec!["say \"hi\"", "b"]);
    }

    #[test]
    fn textual_and_na_values_are_not_numeric() {
        let na = parse_readiness_line("Kenya,KEN,2024,InternetPenetration_Percent,NA,NA,NA").unwrap();
        assert_eq!(na.value, None);

        let status = parse_readiness_line("Kenya,KEN,2022,NationalAIStrategy_Status,Planned,Estimate,Gov Stats").unwrap();
        assert_eq!(status.value, None);

        let num = parse_readiness_line("Kenya,KEN,2022,InternetPenetration_Percent,41.3,Actual,ITU Data").unwrap();
        assert_eq!(num.value, Some(41.3));
    }

    #[test]
    fn rejects_bad_year() {
        assert!(parse_readiness_line("Kenya,KEN,twenty,X,1,Actual,WB").is_err());
    }

    #[test]
    fn median_even_and_odd() {
        let odd = summarize_values("m", vec![3.0, 1.0, 2.0]).unwrap();
        assert_eq!(odd.median, 2.0);
        assert_eq!(odd.min, 1.0);
        assert_eq!(odd.max, 3.0);

        let even = summarize_values("m", vec![4.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(even.median, 2.5);
        assert_eq!(even.mean, 2.5);

        assert!(summarize_values("m", Vec::new()).is_none());
    }
}
