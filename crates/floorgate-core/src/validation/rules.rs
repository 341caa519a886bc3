//! Regional rule sets and their lookup capability

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Building rules for one region; all areas in m², widths in mm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Region key, matched case-insensitively
    pub region: String,
    /// Minimum area of any room
    #[serde(default)]
    pub min_room_area_m2: f64,
    /// Per-room-name minimum areas, overriding `min_room_area_m2`
    #[serde(default)]
    pub room_minimums: HashMap<String, f64>,
    /// At least one door must be this wide
    #[serde(default)]
    pub min_egress_width_mm: f64,
    /// Every door must be this wide
    #[serde(default)]
    pub min_accessible_door_width_mm: f64,
}

impl RuleSet {
    /// Create an empty rule set
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            min_room_area_m2: 0.0,
            room_minimums: HashMap::new(),
            min_egress_width_mm: 0.0,
            min_accessible_door_width_mm: 0.0,
        }
    }

    /// Set the general minimum room area
    #[must_use]
    pub fn with_min_room_area(mut self, area_m2: f64) -> Self {
        self.min_room_area_m2 = area_m2;
        self
    }

    /// Set a minimum area for rooms with this name
    #[must_use]
    pub fn with_room_minimum(mut self, room: impl Into<String>, area_m2: f64) -> Self {
        self.room_minimums.insert(room.into().to_lowercase(), area_m2);
        self
    }

    /// Set the egress width
    #[must_use]
    pub fn with_egress_width(mut self, width_mm: f64) -> Self {
        self.min_egress_width_mm = width_mm;
        self
    }

    /// Set the accessible doorway width
    #[must_use]
    pub fn with_accessible_door_width(mut self, width_mm: f64) -> Self {
        self.min_accessible_door_width_mm = width_mm;
        self
    }

    /// Minimum area that applies to a room name
    #[must_use]
    pub fn minimum_for(&self, room: &str) -> f64 {
        self.room_minimums
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(room))
            .map_or(self.min_room_area_m2, |(_, area)| *area)
    }
}

/// Lookup of regional rule sets
#[cfg_attr(test, mockall::automock)]
pub trait RuleSetLookup: Send + Sync {
    /// Rules for a region, or `None` if the region is unknown
    fn get_rules(&self, region: &str) -> Option<RuleSet>;
}

/// In-memory rule book built from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticRuleBook {
    rules: HashMap<String, RuleSet>,
}

impl StaticRuleBook {
    /// Build from a list of rule sets; later entries replace earlier ones
    #[must_use]
    pub fn new(rule_sets: impl IntoIterator<Item = RuleSet>) -> Self {
        Self {
            rules: rule_sets
                .into_iter()
                .map(|r| (r.region.to_lowercase(), r))
                .collect(),
        }
    }

    /// Known regions, sorted
    #[must_use]
    pub fn regions(&self) -> Vec<String> {
        let mut regions: Vec<_> = self.rules.keys().cloned().collect();
        regions.sort();
        regions
    }
}

impl RuleSetLookup for StaticRuleBook {
    fn get_rules(&self, region: &str) -> Option<RuleSet> {
        self.rules.get(&region.to_lowercase()).cloned()
    }
}
