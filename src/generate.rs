//! Synthetic readiness trends dataset.
//!
//! Produces the same seven-column table [`crate::summary::ReadinessData`]
//! loads: 54 countries, 29 metrics, years 2019 through 2025. Values follow
//! simple per-family trends; niche, policy and recent-year cells are sparse.
//! The output is placeholder data, not a measurement.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::RangeInclusive;
use std::path::Path;

use crate::error::Result;
use crate::logging::{log, obj, v_num, v_str, Domain, Level};
use crate::summary::EXPECTED_COLUMNS;

pub const YEARS: RangeInclusive<i32> = 2019..=2025;

pub const DEFAULT_OUTPUT: &str = "data/africa_ai_readiness_trends_2019-2025_generated.csv";

pub static COUNTRIES: [(&str, &str); 54] = [
    ("Algeria", "DZA"),
    ("Angola", "AGO"),
    ("Benin", "BEN"),
    ("Botswana", "BWA"),
    ("Burkina Faso", "BFA"),
    ("Burundi", "BDI"),
    ("Cabo Verde", "CPV"),
    ("Cameroon", "CMR"),
    ("Central African Republic", "CAF"),
    ("Chad", "TCD"),
    ("Comoros", "COM"),
    ("Congo, Dem. Rep.", "COD"),
    ("Congo, Rep.", "COG"),
    ("Cote d'Ivoire", "CIV"),
    ("Djibouti", "DJI"),
    ("Egypt", "EGY"),
    ("Equatorial Guinea", "GNQ"),
    ("Eritrea", "ERI"),
    ("Eswatini", "SWZ"),
    ("Ethiopia", "ETH"),
    ("Gabon", "GAB"),
    ("Gambia", "GMB"),
    ("Ghana", "GHA"),
    ("Guinea", "GIN"),
    ("Guinea-Bissau", "GNB"),
    ("Kenya", "KEN"),
    ("Lesotho", "LSO"),
    ("Liberia", "LBR"),
    ("Libya", "LBY"),
    ("Madagascar", "MDG"),
    ("Malawi", "MWI"),
    ("Mali", "MLI"),
    ("Mauritania", "MRT"),
    ("Mauritius", "MUS"),
    ("Morocco", "MAR"),
    ("Mozambique", "MOZ"),
    ("Namibia", "NAM"),
    ("Niger", "NER"),
    ("Nigeria", "NGA"),
    ("Rwanda", "RWA"),
    ("Sao Tome and Principe", "STP"),
    ("Senegal", "SEN"),
    ("Seychelles", "SYC"),
    ("Sierra Leone", "SLE"),
    ("Somalia", "SOM"),
    ("South Africa", "ZAF"),
    ("South Sudan", "SSD"),
    ("Sudan", "SDN"),
    ("Tanzania", "TZA"),
    ("Togo", "TGO"),
    ("Tunisia", "TUN"),
    ("Uganda", "UGA"),
    ("Zambia", "ZMB"),
    ("Zimbabwe", "ZWE"),
];

pub static METRIC_NAMES: [&str; 29] = [
    // Infrastructure and economy
    "InternetPenetration_Percent",
    "MobilePhoneUsage_SubscriptionsPer100",
    "BroadbandAccess_FixedSubscriptionsPer100",
    "ElectricityAccess_PercentPopulation",
    "CloudInfra_Score",
    "GDPPerCapita_USD_Current",
    // Innovation and investment
    "AIStartupFunding_USD_Millions_AnnualizedEst",
    "StartupEcosystemRank_GlobalScore",
    "TechInvestment2024_USD_Millions_Est",
    "AIMarketSize_USD_Millions_Est",
    // Policy and governance
    "NationalAIStrategy_Status",
    "AIPolicy_MaturityScore",
    "DataProtectionLaw_Status",
    "AIRegulation_Status",
    "DigitalStrategy_Status",
    // Human capital
    "STEMGraduates_AnnualEst",
    "AIEducationPrograms_CountEst",
    "DataScientists_CountEst",
    "ICTGraduates_AnnualEst",
    "ProgLang_Python_UsagePercentEst",
    "ProgLang_R_UsagePercentEst",
    "ProgLang_Java_UsagePercentEst",
    "ProgLang_JavaScript_UsagePercentEst",
    "ProgLang_Other_UsagePercentEst",
    // Adoption and perception
    "AIAwarenessSurvey_PercentAware",
    "AIPerception_NetSentimentScore",
    "TechnologyAdoption_Index",
    "AfrobarometerTechTrust_Score",
    "ChatGPTUsage_EstimatedPenetration",
];

const HUBS: [&str; 8] = [
    "South Africa",
    "Nigeria",
    "Kenya",
    "Egypt",
    "Ghana",
    "Rwanda",
    "Morocco",
    "Tunisia",
];

/// Ordered from least to most advanced.
pub const STRATEGY_STATUSES: [&str; 4] = ["None", "Planned", "Developing", "Implemented"];
pub const DATA_PROTECTION_STATUSES: [&str; 3] = ["None", "Partial", "Comprehensive/GDPR-like"];
pub const AI_REGULATION_STATUSES: [&str; 4] = ["None", "Discussion", "Drafted", "Implemented"];

pub const NA: &str = "NA";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Income {
    Low,
    Mid,
    High,
}

impl Income {
    fn pick(self, low: f64, mid: f64, high: f64) -> f64 {
        match self {
            Income::Low => low,
            Income::Mid => mid,
            Income::High => high,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimValue {
    Number(f64),
    Count(u64),
    Status(&'static str),
    Na,
}

impl SimValue {
    pub fn is_na(&self) -> bool {
        matches!(self, SimValue::Na)
    }
}

impl fmt::Display for SimValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimValue::Number(v) => write!(f, "{:?}", v),
            SimValue::Count(n) => write!(f, "{}", n),
            SimValue::Status(s) => f.write_str(s),
            SimValue::Na => f.write_str(NA),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedRow {
    pub country: &'static str,
    pub iso3: &'static str,
    pub year: i32,
    pub metric: &'static str,
    pub value: SimValue,
    pub data_type: &'static str,
    pub source: &'static str,
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

impl GeneratedRow {
    pub fn to_csv_line(&self) -> String {
        [
            csv_field(self.country),
            csv_field(self.iso3),
            self.year.to_string(),
            csv_field(self.metric),
            csv_field(&self.value.to_string()),
            csv_field(self.data_type),
            csv_field(self.source),
        ]
        .join(",")
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn is_economic(metric: &str) -> bool {
    ["GDP", "Funding", "Investment", "MarketSize"].iter().any(|s| metric.contains(s))
}

fn is_policy(metric: &str) -> bool {
    ["Strategy", "Policy", "Law", "Regulation"].iter().any(|s| metric.contains(s))
}

fn is_core_infra(metric: &str) -> bool {
    ["Internet", "Mobile", "Electricity"].iter().any(|s| metric.contains(s))
}

fn is_niche(metric: &str) -> bool {
    [
        "AI",
        "DataScientist",
        "ChatGPT",
        "ProgLang",
        "Survey",
        "Trust",
        "Adoption",
        "Cloud",
        "StartupEcosystem",
        "Graduates",
    ]
    .iter()
    .any(|s| metric.contains(s))
}

/// Seeded dataset generator; the same seed yields the same table.
pub struct Generator<R: Rng> {
    rng: R,
}

impl Generator<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Generator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Every country, metric and year, in that nesting order.
    pub fn rows(&mut self) -> Vec<GeneratedRow> {
        let mut rows = Vec::with_capacity(COUNTRIES.len() * METRIC_NAMES.len() * YEARS.count());
        for &(country, iso3) in &COUNTRIES {
            let income = self.income();
            for &metric in &METRIC_NAMES {
                for year in YEARS {
                    let (data_type, source) = self.data_type_and_source(year, metric);
                    let value = if data_type == NA {
                        SimValue::Na
                    } else {
                        self.simulate(metric, year, country, income)
                    };
                    let (data_type, source) = if value.is_na() { (NA, NA) } else { (data_type, source) };
                    rows.push(GeneratedRow {
                        country,
                        iso3,
                        year,
                        metric,
                        value,
                        data_type,
                        source,
                    });
                }
            }
        }
        rows
    }

    fn income(&mut self) -> Income {
        match self.rng.gen_range(0..3) {
            0 => Income::Low,
            1 => Income::Mid,
            _ => Income::High,
        }
    }

    fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    fn choose(&mut self, options: &[&'static str]) -> &'static str {
        options.choose(&mut self.rng).copied().unwrap_or(NA)
    }

    /// `(DataType, Source)`; both are `"NA"` when the cell is missing.
    fn data_type_and_source(&mut self, year: i32, metric: &str) -> (&'static str, &'static str) {
        let economic = is_economic(metric);
        let measured = is_core_infra(metric) || metric.contains("GDP");

        let data_type = match year {
            ..=2021 if measured && self.chance(0.8) => "Actual",
            ..=2021 => "Estimate",
            2022 if measured && self.chance(0.6) => "Actual",
            2022 => "Estimate",
            2023 if self.chance(0.9) => "Estimate",
            2023 => "Preliminary",
            2024 if economic && self.chance(0.7) => "Projection/Forecast",
            2024 => "Estimate",
            // Only economic series are forecast past the last observed year.
            _ if economic && self.chance(0.9) => "Projection/Forecast",
            _ => NA,
        };

        let mut na_prob = 0.1;
        if is_niche(metric) {
            na_prob += 0.5;
        }
        if is_policy(metric) {
            na_prob += 0.4;
        }
        if year >= 2024 {
            na_prob += 0.3;
        }
        // Niche policy series stay sparse rather than empty.
        na_prob = f64::min(na_prob, 0.9);
        if year >= 2025 && data_type != "Projection/Forecast" {
            na_prob = 1.0;
        }
        if data_type == NA || self.chance(na_prob) {
            return (NA, NA);
        }

        let source = match data_type {
            "Actual" => self.choose(&["WB Data", "ITU Data", "Gov Stats"]),
            "Projection/Forecast" => self.choose(&["IMF Forecast", "WB Forecast", "AfDB Forecast"]),
            _ => self.choose(&["WB Estimate", "Internal Estimate", "GSMA Est"]),
        };
        (data_type, source)
    }

    fn growth(&mut self, year: i32, lo: f64, hi: f64) -> f64 {
        f64::from(year - 2019) * self.rng.gen_range(lo..hi)
    }

    fn internet(&mut self, year: i32, income: Income) -> f64 {
        let base = income.pick(20.0, 45.0, 70.0);
        let growth = self.growth(year, 0.02, 0.05);
        let noise = self.rng.gen_range(0.98..1.02);
        round1(base * (1.0 + growth) * noise).clamp(0.0, 100.0)
    }

    fn simulate(&mut self, metric: &str, year: i32, country: &str, income: Income) -> SimValue {
        let hub = HUBS.contains(&country);

        if metric.contains("GDPPerCapita") {
            let base = income.pick(800.0, 2500.0, 7000.0);
            let growth = self.growth(year, 0.01, 0.03);
            let noise = self.rng.gen_range(0.95..1.05);
            return SimValue::Count((base * (1.0 + growth) * noise).round().max(300.0) as u64);
        }
        if metric.contains("InternetPenetration") {
            return SimValue::Number(self.internet(year, income));
        }
        if metric.contains("ElectricityAccess") {
            let base = income.pick(40.0, 70.0, 95.0);
            let growth = self.growth(year, 0.005, 0.02);
            let noise = self.rng.gen_range(0.99..1.01);
            return SimValue::Number(round1(base * (1.0 + growth) * noise).clamp(0.0, 100.0));
        }
        if metric.contains("MobilePhoneUsage") {
            // Subscriptions per 100 can exceed 100.
            let base = income.pick(80.0, 100.0, 120.0);
            let growth = self.growth(year, 0.01, 0.03);
            let noise = self.rng.gen_range(0.98..1.02);
            return SimValue::Number(round1(base * (1.0 + growth) * noise).clamp(10.0, 200.0));
        }
        if ["AIStartupFunding", "TechInvestment", "AIMarketSize"].iter().any(|s| metric.contains(s)) {
            if hub && year >= 2021 && self.chance(0.6) {
                let base = income.pick(1.0, 10.0, 50.0) * 5.0;
                let factor = self.rng.gen_range(1.1f64..1.5).powi(year - 2021);
                let noise = self.rng.gen_range(0.5..1.5);
                return SimValue::Number(round1(base * factor * noise));
            }
            return SimValue::Na;
        }
        if metric.contains("NationalAIStrategy") || metric.contains("DigitalStrategy") {
            return self.staged_status(&STRATEGY_STATUSES, year, hub, 0.8);
        }
        if metric.contains("AIRegulation") {
            // Regulation trails strategy by a couple of years.
            return self.staged_status(&AI_REGULATION_STATUSES, year - 2, hub, 0.7);
        }
        if metric.contains("DataProtectionLaw") {
            let mut status = if hub {
                self.choose(&DATA_PROTECTION_STATUSES[1..])
            } else {
                self.choose(&DATA_PROTECTION_STATUSES[..2])
            };
            if year < 2021 && status == DATA_PROTECTION_STATUSES[2] {
                status = DATA_PROTECTION_STATUSES[1];
            }
            return if self.chance(0.9) { SimValue::Status(status) } else { SimValue::Na };
        }
        if metric.contains("DataScientists") || metric.contains("AIEducationPrograms") {
            if hub && year >= 2020 && self.chance(0.5) {
                let count = if metric.contains("Programs") {
                    self.rng.gen_range(5u32..=50)
                } else {
                    self.rng.gen_range(50..=2000)
                };
                let factor = self.rng.gen_range(1.1f64..1.3).powi(year - 2020);
                return SimValue::Count((f64::from(count) * factor * 2.0).round() as u64);
            }
            return SimValue::Na;
        }
        if metric.starts_with("ProgLang_") {
            let (lo, hi) = if metric.contains("_Python_") {
                (25.0, 50.0)
            } else if metric.contains("_JavaScript_") {
                (20.0, 45.0)
            } else if metric.contains("_Java_") {
                (10.0, 25.0)
            } else if metric.contains("_R_") {
                (3.0, 12.0)
            } else {
                (5.0, 20.0)
            };
            return SimValue::Number(round1(self.rng.gen_range(lo..hi)));
        }
        if metric.contains("ChatGPTUsage") {
            if year >= 2023 && self.chance(0.6) {
                let base = income.pick(1.0, 5.0, 15.0);
                let noise = self.rng.gen_range(0.7..1.3);
                // Share of internet users, so capped by half the penetration.
                let cap = self.internet(year, income) * 0.5;
                return SimValue::Number(round1(base * noise).min(cap).max(0.0));
            }
            return SimValue::Na;
        }

        if metric.contains("Score") || metric.contains("Index") {
            SimValue::Number(round1(self.rng.gen_range(10.0..70.0)))
        } else if metric.contains("Percent") || metric.contains("Per100") {
            SimValue::Number(round1(self.rng.gen_range(5.0..80.0)))
        } else if metric.contains("CountEst") || metric.contains("AnnualEst") {
            SimValue::Count(self.rng.gen_range(1000..=50_000))
        } else {
            SimValue::Na
        }
    }

    /// Status that advances through `stages` over time, faster for hubs.
    fn staged_status(&mut self, stages: &[&'static str], year: i32, hub: bool, keep: f64) -> SimValue {
        let last = stages.len() - 1;
        if year < 2020 && self.chance(0.8) {
            return SimValue::Status(stages[0]);
        }
        let started = hub && self.chance(0.7);
        let mut idx = if started {
            let progression = (year - 2020 + self.rng.gen_range(-1..=1)).max(0) as usize;
            (1 + progression).min(last)
        } else {
            0
        };
        if year >= 2022 && hub && self.chance(0.2) {
            idx = (idx + 1).min(last);
        }
        if self.chance(keep) {
            SimValue::Status(stages[idx])
        } else {
            SimValue::Na
        }
    }
}

/// Write `rows` under the readiness CSV header, creating parent directories.
pub fn write_csv(path: &Path, rows: &[GeneratedRow]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", EXPECTED_COLUMNS.join(","))?;
    for row in rows {
        writeln!(out, "{}", row.to_csv_line())?;
    }
    out.flush()?;

    let missing = rows.iter().filter(|r| r.value.is_na()).count();
    log(
        Level::Info,
        Domain::Generate,
        "written",
        obj(&[
            ("path", v_str(&path.display().to_string())),
            ("rows", v_num(rows.len() as f64)),
            ("na", v_num(missing as f64)),
        ]),
    );
    Ok(())
}
