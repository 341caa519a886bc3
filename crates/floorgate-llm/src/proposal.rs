//! Layout proposal types
//!
//! A proposal is raw model output: coordinates and dimensions in the
//! request's measurement system. It is never mutated after creation; a
//! correction or reviewer edit produces a new proposal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A 2D point in plan coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A straight wall segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    /// Wall identifier, referenced by openings
    pub id: String,
    /// Start point
    pub start: Point,
    /// End point
    pub end: Point,
    /// Wall height
    pub height: f64,
    /// Wall thickness
    pub thickness: f64,
    /// Floor level
    #[serde(default)]
    pub floor: u32,
}

impl Wall {
    /// Create a wall
    #[must_use]
    pub fn new(id: impl Into<String>, start: Point, end: Point, height: f64, thickness: f64) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            height,
            thickness,
            floor: 0,
        }
    }

    /// Segment length
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end.x - self.start.x).hypot(self.end.y - self.start.y)
    }
}

/// A door or window hosted by a wall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    /// Opening identifier
    pub id: String,
    /// Host wall identifier
    pub wall_id: String,
    /// Centre position as a ratio of host-wall length
    pub position: f64,
    /// Clear width
    pub width: f64,
    /// Clear height
    pub height: f64,
}

impl Opening {
    /// Create an opening
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        wall_id: impl Into<String>,
        position: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id: id.into(),
            wall_id: wall_id.into(),
            position,
            width,
            height,
        }
    }
}

/// A room outlined by a closed polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier
    pub id: String,
    /// Room name, matched against the request's program
    pub name: String,
    /// Boundary vertices in order; the closing edge is implicit
    pub boundary: Vec<Point>,
    /// Floor level
    #[serde(default)]
    pub floor: u32,
}

impl Room {
    /// Create a room
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, boundary: Vec<Point>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            boundary,
            floor: 0,
        }
    }
}

/// A storey of the layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    /// Level number (0 = ground)
    pub level: u32,
    /// Finished floor elevation
    pub elevation: f64,
    /// Display name
    #[serde(default)]
    pub name: String,
}

/// Token and latency metadata of the generation call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposalMetadata {
    /// Model that produced the proposal
    #[serde(default)]
    pub model: Option<String>,
    /// Prompt tokens
    #[serde(default)]
    pub prompt_tokens: Option<u32>,
    /// Completion tokens
    #[serde(default)]
    pub completion_tokens: Option<u32>,
    /// Generation latency
    #[serde(default)]
    pub latency_ms: u64,
}

/// A generated layout prior to validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutProposal {
    /// Proposal identifier
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Provider that produced it
    #[serde(default)]
    pub provider: String,
    /// Walls
    #[serde(default)]
    pub walls: Vec<Wall>,
    /// Doors
    #[serde(default)]
    pub doors: Vec<Opening>,
    /// Windows
    #[serde(default)]
    pub windows: Vec<Opening>,
    /// Rooms
    #[serde(default)]
    pub rooms: Vec<Room>,
    /// Floors
    #[serde(default)]
    pub floors: Vec<Floor>,
    /// Self-reported model confidence, if any
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Produced by the rule-based fallback generator
    #[serde(default)]
    pub used_fallback: bool,
    /// Generation metadata
    #[serde(default)]
    pub metadata: ProposalMetadata,
    /// When the proposal was produced
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl LayoutProposal {
    /// Create an empty proposal attributed to a provider
    #[must_use]
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            provider: provider.into(),
            walls: Vec::new(),
            doors: Vec::new(),
            windows: Vec::new(),
            rooms: Vec::new(),
            floors: Vec::new(),
            confidence: None,
            used_fallback: false,
            metadata: ProposalMetadata::default(),
            created_at: Utc::now(),
        }
    }

    /// Add a wall
    #[must_use]
    pub fn with_wall(mut self, wall: Wall) -> Self {
        self.walls.push(wall);
        self
    }

    /// Add a door
    #[must_use]
    pub fn with_door(mut self, door: Opening) -> Self {
        self.doors.push(door);
        self
    }

    /// Add a window
    #[must_use]
    pub fn with_window(mut self, window: Opening) -> Self {
        self.windows.push(window);
        self
    }

    /// Add a room
    #[must_use]
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// Set the self-reported confidence
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Copy of this proposal re-attributed to another source, with a new id.
    ///
    /// Used when a proposal is replayed (fixtures, mocks) or handed over by
    /// a reviewer; the original stays untouched.
    #[must_use]
    pub fn reissued_by(&self, provider: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            provider: provider.into(),
            created_at: Utc::now(),
            ..self.clone()
        }
    }

    /// Look up a wall by id
    #[must_use]
    pub fn wall(&self, id: &str) -> Option<&Wall> {
        self.walls.iter().find(|w| w.id == id)
    }
}
