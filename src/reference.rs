//! Static reference tables: activity names, region names and display units.
//!
//! Built once from the snapshot and never mutated afterwards. Every lookup
//! is an exact, case-sensitive string match.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Display names for the unit codes used by recipe inflows
pub const UNIT_NAMES: &[(&str, &str)] = &[
    ("Meuro", "Million EUR"),
    ("tonnes", "Tonnes"),
    ("items", "Units"),
    ("TJ", "Trillion Joules"),
    ("ha*year", "Hectare per year"),
];

/// Kind of flow an activity describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
    /// Direct production at a single site
    Product,
    /// Region blended across supplying regions
    Market,
    #[serde(other)]
    Other,
}

impl FlowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowType::Product => "product",
            FlowType::Market => "market",
            FlowType::Other => "other",
        }
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(FlowType::Product),
            "market" => Ok(FlowType::Market),
            "other" => Ok(FlowType::Other),
            _ => Err(format!("unknown flow type: {} (expected product or market)", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub code: String,
    pub description: String,
    pub flow_type: FlowType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub code: String,
    #[serde(rename = "name")]
    pub display_name: String,
}

/// Read-only lookup tables shared by every adapter
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    activities: Vec<ActivityRecord>,
    regions: Vec<RegionRecord>,
    /// First description wins when a code repeats
    activity_names: HashMap<String, String>,
    region_names: HashMap<String, String>,
    unit_names: HashMap<&'static str, &'static str>,
}

impl ReferenceTables {
    pub fn new(activities: Vec<ActivityRecord>, regions: Vec<RegionRecord>) -> Self {
        let mut activity_names = HashMap::with_capacity(activities.len());
        for activity in &activities {
            activity_names
                .entry(activity.code.clone())
                .or_insert_with(|| activity.description.clone());
        }

        let mut region_names = HashMap::with_capacity(regions.len());
        for region in &regions {
            region_names
                .entry(region.code.clone())
                .or_insert_with(|| region.display_name.clone());
        }

        Self {
            activities,
            regions,
            activity_names,
            region_names,
            unit_names: UNIT_NAMES.iter().copied().collect(),
        }
    }

    pub fn activities(&self) -> &[ActivityRecord] {
        &self.activities
    }

    pub fn regions(&self) -> &[RegionRecord] {
        &self.regions
    }

    /// Find the first activity with this exact description and flow type
    pub fn find_activity(&self, description: &str, flow_type: FlowType) -> Option<&ActivityRecord> {
        self.activities
            .iter()
            .find(|a| a.description == description && a.flow_type == flow_type)
    }

    /// Region code for a display name
    pub fn region_code(&self, display_name: &str) -> Option<&str> {
        self.regions
            .iter()
            .find(|r| r.display_name == display_name)
            .map(|r| r.code.as_str())
    }

    /// Display name for a region code, passing unknown codes through
    pub fn region_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.region_names.get(code).map(String::as_str).unwrap_or(code)
    }

    /// Activity description for a code with its first letter capitalized.
    /// Unknown codes pass through unchanged.
    pub fn activity_name(&self, code: &str) -> String {
        match self.activity_names.get(code) {
            Some(name) => capitalize_first(name),
            None => code.to_string(),
        }
    }

    /// Display unit for a unit code, passing unknown codes through
    pub fn unit_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.unit_names.get(code).copied().unwrap_or(code)
    }
}

pub(crate) fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> ReferenceTables {
        ReferenceTables::new(
            vec![
                ActivityRecord {
                    code: "A_TOM".into(),
                    description: "tomatoes".into(),
                    flow_type: FlowType::Product,
                },
                ActivityRecord {
                    code: "M_TOM".into(),
                    description: "tomatoes".into(),
                    flow_type: FlowType::Market,
                },
            ],
            vec![RegionRecord {
                code: "NL".into(),
                display_name: "Netherlands".into(),
            }],
        )
    }

    #[test]
    fn test_find_activity_matches_flow_type() {
        let t = tables();
        assert_eq!(t.find_activity("tomatoes", FlowType::Market).unwrap().code, "M_TOM");
        assert_eq!(t.find_activity("tomatoes", FlowType::Product).unwrap().code, "A_TOM");
        assert!(t.find_activity("Tomatoes", FlowType::Product).is_none());
    }

    #[test]
    fn test_translations_pass_unknown_codes_through() {
        let t = tables();
        assert_eq!(t.activity_name("A_TOM"), "Tomatoes");
        assert_eq!(t.activity_name("A_XYZ"), "A_XYZ");
        assert_eq!(t.region_name("NL"), "Netherlands");
        assert_eq!(t.region_name("ZZ"), "ZZ");
        assert_eq!(t.unit_name("tonnes"), "Tonnes");
        assert_eq!(t.unit_name("kg"), "kg");
        assert_eq!(t.region_code("Netherlands"), Some("NL"));
    }

    #[test]
    fn test_flow_type_parsing() {
        assert_eq!("market".parse::<FlowType>().unwrap(), FlowType::Market);
        assert!("Market".parse::<FlowType>().is_err());

        let parsed: FlowType = serde_json::from_str("\"intermediate\"").unwrap();
        assert_eq!(parsed, FlowType::Other);
    }
}
