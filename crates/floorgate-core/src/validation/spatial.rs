//! Spatial/adjacency validator

use super::geometry::collinear_overlap;
use super::normalize::NormalizedLayout;
use super::types::{Severity, ValidationError};
use super::Validator;
use floorgate_llm::{Point, Room};
use std::collections::BTreeSet;

/// Checks room presence, declared adjacencies and total area
#[derive(Debug, Clone)]
pub struct SpatialValidator {
    area_tolerance: f64,
    adjacency_tolerance_mm: f64,
}

impl Default for SpatialValidator {
    fn default() -> Self {
        Self::new(0.10, 1.0)
    }
}

impl SpatialValidator {
    /// `area_tolerance` is a fraction of the program area (0.10 = ±10%)
    #[must_use]
    pub fn new(area_tolerance: f64, adjacency_tolerance_mm: f64) -> Self {
        Self {
            area_tolerance,
            adjacency_tolerance_mm,
        }
    }

    /// Whether some wall lies on a boundary segment the two rooms share
    fn share_wall(&self, layout: &NormalizedLayout, a: &Room, b: &Room) -> bool {
        let tol = self.adjacency_tolerance_mm;
        edges(&a.boundary).any(|ea| {
            edges(&b.boundary).any(|eb| {
                collinear_overlap(ea, eb, tol).is_some_and(|shared| {
                    layout
                        .walls
                        .iter()
                        .any(|w| collinear_overlap(shared, (w.start, w.end), tol).is_some())
                })
            })
        })
    }
}

fn edges(boundary: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let n = boundary.len();
    let count = if n >= 2 { n } else { 0 };
    (0..count).map(move |k| (boundary[k], boundary[(k + 1) % n]))
}

#[async_trait::async_trait]
impl Validator for SpatialValidator {
    fn name(&self) -> &'static str {
        "spatial"
    }

    async fn validate(&self, layout: &NormalizedLayout) -> Vec<ValidationError> {
        let mut out = Vec::new();

        for (i, program) in layout.program.iter().enumerate() {
            if layout.room_named(&program.name).is_none() {
                out.push(
                    ValidationError::new(
                        "SPATIAL_MISSING_ROOM",
                        Severity::Error,
                        format!("program[{i}]"),
                        format!("requested room '{}' is not in the proposal", program.name),
                    )
                    .with_fix(format!("add a room named '{}'", program.name)),
                );
            }
        }

        // A→B and B→A are one requirement
        let mut checked = BTreeSet::new();
        for (i, program) in layout.program.iter().enumerate() {
            for target in &program.adjacent_to {
                let key = {
                    let (x, y) = (program.name.to_lowercase(), target.to_lowercase());
                    if x <= y {
                        (x, y)
                    } else {
                        (y, x)
                    }
                };
                if !checked.insert(key) {
                    continue;
                }
                let (Some(a), Some(b)) = (layout.room_named(&program.name), layout.room_named(target))
                else {
                    continue;
                };
                if !self.share_wall(layout, a, b) {
                    out.push(
                        ValidationError::new(
                            "SPATIAL_ADJACENCY_UNMET",
                            Severity::Error,
                            format!("program[{i}].adjacent_to"),
                            format!("'{}' does not share a wall with '{}'", program.name, target),
                        )
                        .with_fix(format!("place '{}' against '{}'", program.name, target)),
                    );
                }
            }
        }

        let requested = layout.program_area_m2();
        let actual = layout.total_room_area_m2();
        if requested > 0.0 && ((actual - requested).abs() / requested) > self.area_tolerance {
            out.push(
                ValidationError::new(
                    "SPATIAL_AREA_MISMATCH",
                    Severity::Error,
                    "rooms",
                    format!(
                        "total room area {actual:.1} m² differs from the requested {requested:.1} m² by more than {:.0}%",
                        self.area_tolerance * 100.0
                    ),
                )
                .with_fix(format!("resize rooms to total about {requested:.1} m²")),
            );
        }

        out
    }
}
