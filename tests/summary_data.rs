use readiness_dashboard::summary::{write_summary_csv, ReadinessData, EXPECTED_COLUMNS};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_csv(path: &Path, rows: &[&str]) {
    let mut out = String::new();
    out.push_str(&EXPECTED_COLUMNS.join(","));
    out.push('\n');
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    fs::write(path, out).unwrap();
}

const ROWS: &[&str] = &[
    "Kenya,KEN,2019,InternetPenetration_Percent,20.0,Actual,ITU Data",
    "Nigeria,NGA,2019,InternetPenetration_Percent,40.0,Actual,WB Data",
    "\"Congo, Dem. Rep.\",COD,2020,InternetPenetration_Percent,30.0,Estimate,WB Estimate",
    "Kenya,KEN,2020,InternetPenetration_Percent,50.0,Estimate,GSMA Est",
    "Kenya,KEN,2025,InternetPenetration_Percent,NA,NA,NA",
    "Kenya,KEN,2021,NationalAIStrategy_Status,Planned,Estimate,Gov Stats",
    "Kenya,KEN,2021,MobilePhoneUsage_SubscriptionsPer100,110.5,Actual,ITU Data",
    "broken,row",
];

#[test]
fn loads_rows_and_counts_bad_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trends.csv");
    write_csv(&path, ROWS);

    let data = ReadinessData::load(&path).unwrap();
    assert_eq!(data.rows.len(), 7);
    assert_eq!(data.bad_rows, 1);
    assert_eq!(data.rows[2].country, "Congo, Dem. Rep.");
}

#[test]
fn yearly_averages_skip_na() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trends.csv");
    write_csv(&path, ROWS);
    let data = ReadinessData::load(&path).unwrap();

    let trend = data.yearly_averages("InternetPenetration_Percent");
    let years: Vec<i32> = trend.iter().map(|p| p.year).collect();
    assert_eq!(years, vec![2019, 2020]);
    assert_eq!(trend[0].mean, 30.0);
    assert_eq!(trend[1].mean, 40.0);
    assert_eq!(trend[1].count, 2);
}

#[test]
fn summary_covers_numeric_metrics_only() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trends.csv");
    write_csv(&path, ROWS);
    let data = ReadinessData::load(&path).unwrap();

    let stats = data.summarize();
    let names: Vec<&str> = stats.iter().map(|s| s.metric.as_str()).collect();
    assert_eq!(
        names,
        vec!["InternetPenetration_Percent", "MobilePhoneUsage_SubscriptionsPer100"]
    );

    let internet = &stats[0];
    assert_eq!(internet.count, 4);
    assert_eq!(internet.mean, 35.0);
    assert_eq!(internet.median, 35.0);
    assert_eq!(internet.min, 20.0);
    assert_eq!(internet.max, 50.0);

    let out = dir.path().join("summary_statistics.csv");
    write_summary_csv(&out, &stats).unwrap();
    let written = fs::read_to_string(&out).unwrap();
    let mut lines = written.lines();
    assert_eq!(lines.next(), Some("MetricName,Mean,Median,Min,Max"));
    assert_eq!(lines.next(), Some("InternetPenetration_Percent,35.0,35.0,20.0,50.0"));
}

#[test]
fn rejects_wrong_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wrong.csv");
    fs::write(&path, "ts,open,high\n1,2,3\n").unwrap();
    assert!(ReadinessData::load(&path).is_err());
}
