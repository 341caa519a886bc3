//! Strip-layout fallback generator
//!
//! Places the program's rooms side by side along the X axis with a common
//! depth, so consecutive rooms share a partition wall. Deterministic: the
//! same request always yields the same geometry.

use crate::error::{Error, Result};
use crate::proposal::{LayoutProposal, Opening, Point, Room, Wall};
use crate::provider::FallbackGenerator;
use crate::request::LayoutRequest;

const WALL_HEIGHT_MM: f64 = 2700.0;
const WALL_THICKNESS_MM: f64 = 150.0;
const DOOR_WIDTH_MM: f64 = 900.0;
const DOOR_HEIGHT_MM: f64 = 2100.0;

/// Deterministic rule-based generator
#[derive(Debug, Default, Clone)]
pub struct StripFallbackGenerator;

impl StripFallbackGenerator {
    /// Create the generator
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl FallbackGenerator for StripFallbackGenerator {
    fn name(&self) -> &str {
        "strip-fallback"
    }

    async fn generate(&self, request: &LayoutRequest) -> Result<LayoutProposal> {
        if request.rooms.is_empty() {
            return Err(Error::Fallback("empty room program".to_string()));
        }

        let system = request.measurement_system;
        // lengths are produced in mm, then expressed in the request's unit
        let to_unit = |mm: f64| mm / system.mm_per_unit();
        let areas_mm2: Vec<f64> = request
            .rooms
            .iter()
            .map(|r| r.required_area.max(0.0) * system.m2_per_area_unit() * 1_000_000.0)
            .collect();
        let mean_area = areas_mm2.iter().sum::<f64>() / areas_mm2.len() as f64;
        let depth = mean_area.sqrt();
        if !depth.is_finite() || depth <= 0.0 {
            return Err(Error::Fallback("room program has no area".to_string()));
        }

        let mut proposal = LayoutProposal::new(self.name());
        proposal.used_fallback = true;

        let mut x = 0.0;
        let mut partitions = Vec::with_capacity(request.rooms.len() + 1);
        partitions.push(0.0);
        for (index, (program, area)) in request.rooms.iter().zip(&areas_mm2).enumerate() {
            let width = area / depth;
            let (x0, x1) = (x, x + width);
            let corners = [
                Point::new(to_unit(x0), 0.0),
                Point::new(to_unit(x1), 0.0),
                Point::new(to_unit(x1), to_unit(depth)),
                Point::new(to_unit(x0), to_unit(depth)),
            ];
            proposal = proposal
                .with_room(Room::new(format!("room-{index}"), &program.name, corners.to_vec()))
                .with_wall(Wall::new(
                    format!("south-{index}"),
                    corners[0],
                    corners[1],
                    to_unit(WALL_HEIGHT_MM),
                    to_unit(WALL_THICKNESS_MM),
                ))
                .with_wall(Wall::new(
                    format!("north-{index}"),
                    corners[3],
                    corners[2],
                    to_unit(WALL_HEIGHT_MM),
                    to_unit(WALL_THICKNESS_MM),
                ));
            x = x1;
            partitions.push(x);
        }

        for (index, px) in partitions.iter().enumerate() {
            proposal = proposal.with_wall(Wall::new(
                format!("partition-{index}"),
                Point::new(to_unit(*px), 0.0),
                Point::new(to_unit(*px), to_unit(depth)),
                to_unit(WALL_HEIGHT_MM),
                to_unit(WALL_THICKNESS_MM),
            ));
            // interior partitions get a connecting door
            if index > 0 && index < partitions.len() - 1 {
                proposal = proposal.with_door(Opening::new(
                    format!("door-{index}"),
                    format!("partition-{index}"),
                    0.5,
                    to_unit(DOOR_WIDTH_MM),
                    to_unit(DOOR_HEIGHT_MM),
                ));
            }
        }

        Ok(proposal.with_door(Opening::new(
            "entry",
            "south-0",
            0.5,
            to_unit(DOOR_WIDTH_MM),
            to_unit(DOOR_HEIGHT_MM),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{MeasurementSystem, RoomProgram};

    #[tokio::test]
    async fn test_strip_layout_is_deterministic() {
        let request = LayoutRequest::new("two rooms", "us")
            .with_room(RoomProgram::new("Living", 16.0))
            .with_room(RoomProgram::new("Kitchen", 9.0));

        let gen = StripFallbackGenerator::new();
        let a = gen.generate(&request).await.unwrap();
        let b = gen.generate(&request).await.unwrap();

        assert!(a.used_fallback);
        assert_eq!(a.rooms.len(), 2);
        assert_eq!(a.walls, b.walls);
        assert_eq!(a.rooms, b.rooms);
        // 2 rooms: south+north each, 3 partitions
        assert_eq!(a.walls.len(), 7);
        // one connecting door plus the entry
        assert_eq!(a.doors.len(), 2);
        assert!(a.confidence.is_none());
    }

    #[tokio::test]
    async fn test_imperial_request_yields_inches() {
        let request = LayoutRequest::new("den", "us")
            .with_measurement_system(MeasurementSystem::Imperial)
            .with_room(RoomProgram::new("Den", 100.0));

        let proposal = StripFallbackGenerator::new().generate(&request).await.unwrap();
        let wall = &proposal.walls[0];
        // 100 ft² square room is 120 inches on a side
        assert!((wall.length() - 120.0).abs() < 1e-6);
        assert!((wall.height - 2700.0 / 25.4).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_empty_program_fails() {
        let request = LayoutRequest::new("nothing", "us");
        let result = StripFallbackGenerator::new().generate(&request).await;
        assert!(matches!(result, Err(Error::Fallback(_))));
    }
}
