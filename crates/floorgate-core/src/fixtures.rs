//! Shared test fixtures

use crate::validation::{RuleSet, StaticRuleBook};
use floorgate_llm::{LayoutProposal, LayoutRequest, Opening, Point, Room, RoomProgram, Wall};
use std::sync::Arc;

pub(crate) fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
    vec![
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ]
}

fn wall(id: &str, from: (f64, f64), to: (f64, f64)) -> Wall {
    Wall::new(
        id,
        Point::new(from.0, from.1),
        Point::new(to.0, to.1),
        2700.0,
        150.0,
    )
}

/// Living 20 m² and Kitchen 10 m², Kitchen must touch Living
pub(crate) fn request() -> LayoutRequest {
    LayoutRequest::new("open living room with kitchen", "us")
        .with_room(RoomProgram::new("Living", 20.0))
        .with_room(RoomProgram::new("Kitchen", 10.0).adjacent_to("Living"))
}

/// A proposal satisfying `request()` with no findings
pub(crate) fn clean_proposal() -> LayoutProposal {
    LayoutProposal::new("fixture")
        .with_wall(wall("south", (0.0, 0.0), (8000.0, 0.0)))
        .with_wall(wall("east", (8000.0, 0.0), (8000.0, 2500.0)))
        .with_wall(wall("kitchen-north", (8000.0, 2500.0), (4000.0, 2500.0)))
        .with_wall(wall("partition", (4000.0, 0.0), (4000.0, 5000.0)))
        .with_wall(wall("living-north", (4000.0, 5000.0), (0.0, 5000.0)))
        .with_wall(wall("west", (0.0, 5000.0), (0.0, 0.0)))
        .with_door(Opening::new("entry", "south", 0.25, 900.0, 2100.0))
        .with_door(Opening::new("kitchen-door", "partition", 0.25, 900.0, 2100.0))
        .with_window(Opening::new("west-window", "west", 0.5, 1200.0, 1200.0))
        .with_room(Room::new("r-living", "Living", rect(0.0, 0.0, 4000.0, 5000.0)))
        .with_room(Room::new("r-kitchen", "Kitchen", rect(4000.0, 0.0, 8000.0, 2500.0)))
        .with_confidence(0.95)
}

/// The clean proposal with the kitchen moved away from the living room
pub(crate) fn detached_kitchen_proposal() -> LayoutProposal {
    let mut proposal = clean_proposal();
    proposal.rooms[1].boundary = rect(5000.0, 0.0, 9000.0, 2500.0);
    proposal
}

pub(crate) fn us_rules() -> RuleSet {
    RuleSet::new("us")
        .with_min_room_area(7.0)
        .with_room_minimum("Kitchen", 5.0)
        .with_egress_width(800.0)
        .with_accessible_door_width(800.0)
}

pub(crate) fn rule_book() -> Arc<StaticRuleBook> {
    Arc::new(StaticRuleBook::new([us_rules()]))
}
