//! Regulatory compliance validator

use super::normalize::NormalizedLayout;
use super::rules::RuleSetLookup;
use super::types::{Severity, ValidationError};
use super::Validator;
use std::sync::Arc;
use tracing::debug;

/// Checks the proposal against the region's rule set
pub struct RegulatoryValidator {
    lookup: Arc<dyn RuleSetLookup>,
}

impl RegulatoryValidator {
    /// Create a validator backed by `lookup`
    #[must_use]
    pub fn new(lookup: Arc<dyn RuleSetLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait::async_trait]
impl Validator for RegulatoryValidator {
    fn name(&self) -> &'static str {
        "regulatory"
    }

    async fn validate(&self, layout: &NormalizedLayout) -> Vec<ValidationError> {
        let Some(rules) = self.lookup.get_rules(&layout.region) else {
            debug!(region = %layout.region, "No rule set for region");
            return vec![ValidationError::new(
                "REG_NO_RULE_SET",
                Severity::Warning,
                "region",
                format!("no rule set is known for region '{}'", layout.region),
            )
            .with_fix("have a reviewer check local building rules")];
        };

        let mut out = Vec::new();

        for (i, room) in layout.rooms.iter().enumerate() {
            let minimum = rules.minimum_for(&room.name);
            let area = NormalizedLayout::room_area_m2(room);
            if minimum > 0.0 && area < minimum {
                out.push(
                    ValidationError::new(
                        "REG_MIN_ROOM_AREA",
                        Severity::Error,
                        format!("rooms[{i}]"),
                        format!(
                            "room '{}' is {area:.1} m², {} requires at least {minimum:.1} m²",
                            room.name, rules.region
                        ),
                    )
                    .with_fix(format!("increase area to ≥{minimum:.1} m²")),
                );
            }
        }

        if rules.min_accessible_door_width_mm > 0.0 {
            let minimum = rules.min_accessible_door_width_mm;
            for (i, door) in layout.doors.iter().enumerate() {
                if door.width < minimum {
                    out.push(
                        ValidationError::new(
                            "REG_ACCESSIBLE_DOOR_WIDTH",
                            Severity::Error,
                            format!("doors[{i}].width"),
                            format!(
                                "door '{}' is narrower than the {minimum:.0}mm accessible width",
                                door.id
                            ),
                        )
                        .with_fix(format!("increase width to ≥{minimum:.0}mm")),
                    );
                }
            }
        }

        if rules.min_egress_width_mm > 0.0 {
            let minimum = rules.min_egress_width_mm;
            if !layout.doors.iter().any(|d| d.width >= minimum) {
                out.push(
                    ValidationError::new(
                        "REG_EGRESS_WIDTH",
                        Severity::Error,
                        "doors",
                        format!("no door provides the {minimum:.0}mm egress width"),
                    )
                    .with_fix(format!("widen one exterior door to ≥{minimum:.0}mm")),
                );
            }
        }

        out
    }
}
