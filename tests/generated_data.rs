use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

use readiness_dashboard::generate::{write_csv, Generator, SimValue, COUNTRIES, METRIC_NAMES, STRATEGY_STATUSES};
use readiness_dashboard::summary::ReadinessData;

#[test]
fn generated_table_loads_through_readiness_data() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("trends.csv");
    let rows = Generator::seeded(2024).rows();
    write_csv(&path, &rows).unwrap();

    let data = ReadinessData::load(&path).unwrap();
    assert_eq!(data.rows.len(), 54 * 29 * 7);
    assert_eq!(data.bad_rows, 0);
    assert!(data.warnings.is_empty());

    let countries: HashSet<&str> = data.rows.iter().map(|r| r.country.as_str()).collect();
    let metrics: HashSet<&str> = data.rows.iter().map(|r| r.metric.as_str()).collect();
    let years: HashSet<i32> = data.rows.iter().map(|r| r.year).collect();
    assert_eq!(countries.len(), COUNTRIES.len());
    assert_eq!(metrics.len(), METRIC_NAMES.len());
    assert_eq!(years, (2019..=2025).collect());

    // Quoted names survive the round trip intact.
    let congo = data
        .rows
        .iter()
        .find(|r| r.country == "Congo, Dem. Rep.")
        .unwrap();
    assert_eq!(congo.iso3, "COD");

    for row in data.rows.iter().filter(|r| r.metric == "InternetPenetration_Percent") {
        if let Some(v) = row.value {
            assert!((0.0..=100.0).contains(&v), "internet {} out of range", v);
        }
    }
    assert!(data.rows.iter().any(|r| r.value.is_none() && r.data_type == "NA"));

    // Dashboard metrics have numeric history to chart.
    for id in [
        "InternetPenetration_Percent",
        "MobilePhoneUsage_SubscriptionsPer100",
        "BroadbandAccess_FixedSubscriptionsPer100",
    ] {
        let trend = data.yearly_averages(id);
        assert!(trend.len() >= 5, "{} has {} years", id, trend.len());
        assert!(trend.iter().all(|p| p.year < 2025));
    }
}

#[test]
fn statuses_are_written_as_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trends.csv");
    let rows = Generator::seeded(9).rows();
    write_csv(&path, &rows).unwrap();

    let statuses: Vec<&SimValue> = rows
        .iter()
        .filter(|r| r.metric == "DigitalStrategy_Status")
        .map(|r| &r.value)
        .filter(|v| matches!(v, SimValue::Status(_)))
        .collect();
    assert!(!statuses.is_empty());

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.starts_with("CountryName,CountryISO3,Year,MetricName,Value,DataType,Source\n"));
    assert!(raw
        .lines()
        .filter(|l| l.contains(",DigitalStrategy_Status,"))
        .any(|l| STRATEGY_STATUSES.iter().any(|s| l.contains(&format!(",{},", s)))));

    // Textual statuses are not numbers, so they stay out of the statistics.
    let data = ReadinessData::load(&path).unwrap();
    assert!(data.summarize().iter().all(|s| !s.metric.ends_with("_Status")));
}
