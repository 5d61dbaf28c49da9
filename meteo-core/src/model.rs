use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Two coordinates closer than this are considered the same location.
pub const COORD_TOLERANCE_DEG: f64 = 1e-6;

pub fn coords_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= COORD_TOLERANCE_DEG
}

/// Country attached to a station. A country with a code but no name is a
/// valid intermediate state: the name is filled in by enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166-1 alpha-2 code, uppercase.
    pub code: String,
    /// Display name in the requested language, if known.
    pub name: Option<String>,
}

impl Country {
    /// Build a country from a raw provider code. Blank or whitespace-only
    /// input counts as "no country reported".
    pub fn from_code(raw: &str) -> Option<Self> {
        let code = raw.trim();
        if code.is_empty() {
            return None;
        }
        Some(Self { code: code.to_uppercase(), name: None })
    }

    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.trim().is_empty())
    }

    /// Name when known, code otherwise.
    pub fn label(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.code,
        }
    }
}

/// A named geographic point with its country and measurements.
///
/// Identity is the (name, latitude, longitude) triple; the provider-assigned
/// id is kept for traceability only. Observations are in fetch order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub provider_id: Option<i64>,
    pub country: Option<Country>,
    pub observations: Vec<Observation>,
}

impl Station {
    pub fn add_observation(&mut self, observation: Observation) {
        self.observations.push(observation);
    }

    /// Both coordinates, when the provider reported them.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// One timestamped set of measurements. Every field except the timestamp is
/// optional: `None` means the provider did not report it, never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Capture instant, assigned when the response is received.
    pub measured_at: DateTime<Utc>,
    pub temperature: Option<f64>,
    pub pressure: Option<f64>,
    pub humidity: Option<f64>,
    pub visibility_m: Option<i64>,
    pub precipitation_mm: Option<f64>,
    pub condition: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_code_is_canonicalized() {
        let country = Country::from_code(" ch ").expect("code should parse");
        assert_eq!(country.code, "CH");
        assert_eq!(country.name, None);
    }

    #[test]
    fn blank_code_means_no_country() {
        assert_eq!(Country::from_code(""), None);
        assert_eq!(Country::from_code("   "), None);
    }

    #[test]
    fn label_prefers_name_over_code() {
        let mut country = Country::from_code("CH").expect("code should parse");
        assert_eq!(country.label(), "CH");

        country.name = Some("Suisse".to_string());
        assert_eq!(country.label(), "Suisse");

        country.name = Some("  ".to_string());
        assert_eq!(country.label(), "CH");
    }

    #[test]
    fn coords_match_within_tolerance() {
        assert!(coords_match(46.2022, 46.2022));
        assert!(coords_match(46.2022, 46.2022 + 5e-7));
        assert!(!coords_match(46.2022, 46.2023));
    }

    #[test]
    fn coordinates_require_both_axes() {
        let station = Station {
            name: "Geneva".to_string(),
            latitude: Some(46.2022),
            longitude: None,
            provider_id: None,
            country: None,
            observations: Vec::new(),
        };
        assert_eq!(station.coordinates(), None);
    }
}
