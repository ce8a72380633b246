//! Fixed metric catalog and the chart asset path convention.
//!
//! The catalog is compiled-in configuration. Adding or removing an entry in
//! [`METRICS`] is the only change needed to extend the dashboard: controls,
//! chart paths and descriptions all derive from it.

use serde::Serialize;
use std::collections::HashSet;

use crate::error::{DashboardError, Result};

/// Prefix every chart asset is published under.
pub const PLOTS_PREFIX: &str = "/plots/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricDescriptor {
    /// Unique key; UI key and basis of the chart asset path
    pub id: &'static str,
    /// Label on controls and headings
    pub title: &'static str,
    /// Text shown under the chart
    pub description: &'static str,
}

pub static METRICS: [MetricDescriptor; 3] = [
    MetricDescriptor {
        id: "InternetPenetration_Percent",
        title: "Internet Penetration",
        description: "The percentage of population with internet access, a crucial foundation for AI adoption.",
    },
    MetricDescriptor {
        id: "MobilePhoneUsage_SubscriptionsPer100",
        title: "Mobile Phone Usage",
        description: "Mobile subscriptions per 100 people, indicating digital connectivity potential.",
    },
    MetricDescriptor {
        id: "BroadbandAccess_FixedSubscriptionsPer100",
        title: "Broadband Access",
        description: "Fixed broadband subscriptions per 100 people, showing infrastructure readiness.",
    },
];

/// `"/plots/" + lowercase(id) + ".html"`
pub fn resolve_chart_asset_path(id: &str) -> String {
    format!("{}{}.html", PLOTS_PREFIX, id.to_lowercase())
}

/// Ordered, validated sequence of metric descriptors.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<MetricDescriptor>,
}

impl Catalog {
    pub fn new(entries: Vec<MetricDescriptor>) -> Result<Self> {
        if entries.is_empty() {
            return Err(DashboardError::InvalidCatalog("catalog is empty".to_string()));
        }
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.id.is_empty() {
                return Err(DashboardError::InvalidCatalog("empty metric id".to_string()));
            }
            if !seen.insert(entry.id) {
                return Err(DashboardError::InvalidCatalog(format!(
                    "duplicate metric id: {}",
                    entry.id
                )));
            }
        }
        Ok(Self { entries })
    }

    /// The compiled-in catalog.
    pub fn builtin() -> Self {
        let entries = METRICS.to_vec();
        debug_assert!(
            Self::new(entries.clone()).is_ok(),
            "METRICS must be non-empty with unique, non-empty ids"
        );
        Self { entries }
    }

    pub fn first(&self) -> &MetricDescriptor {
        &self.entries[0]
    }

    pub fn find(&self, id: &str) -> Option<&MetricDescriptor> {
        self.entries.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn entries(&self) -> &[MetricDescriptor] {
        &self.entries
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|m| m.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::new(METRICS.to_vec()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.first().id, "InternetPenetration_Percent");
    }

    #[test]
    fn builtin_matches_validated_metrics() {
        let validated = Catalog::new(METRICS.to_vec()).unwrap();
        assert_eq!(Catalog::builtin().entries(), validated.entries());
    }

    #[test]
    fn asset_path_is_lowercased() {
        assert_eq!(
            resolve_chart_asset_path("InternetPenetration_Percent"),
            "/plots/internetpenetration_percent.html"
        );
        assert_eq!(
            resolve_chart_asset_path("already_lower"),
            "/plots/already_lower.html"
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let dup = vec![METRICS[0], METRICS[0]];
        let err = Catalog::new(dup).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn rejects_empty_catalog() {
        assert!(Catalog::new(Vec::new()).is_err());
    }

    #[test]
    fn find_is_exact_match() {
        let catalog = Catalog::builtin();
        assert!(catalog.find("MobilePhoneUsage_SubscriptionsPer100").is_some());
        assert!(catalog.find("mobilephoneusage_subscriptionsper100").is_none());
        assert!(!catalog.contains("GDPPerCapita_USD_Current"));
    }
}
