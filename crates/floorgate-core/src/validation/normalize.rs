//! Conversion of a proposal and its request into metric units
//!
//! Validators only ever see millimetres and square metres. The source
//! proposal is left untouched.

use floorgate_llm::{LayoutProposal, LayoutRequest, Opening, Point, Room, RoomProgram, Wall};

/// A proposal in millimetres, paired with its metric room program
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedLayout {
    /// Walls (mm)
    pub walls: Vec<Wall>,
    /// Doors (mm)
    pub doors: Vec<Opening>,
    /// Windows (mm)
    pub windows: Vec<Opening>,
    /// Rooms (mm)
    pub rooms: Vec<Room>,
    /// Room program with areas in m²
    pub program: Vec<RoomProgram>,
    /// Building-code region
    pub region: String,
    /// Self-reported provider confidence
    pub provider_confidence: Option<f64>,
    /// The proposal came from the fallback generator
    pub used_fallback: bool,
}

impl NormalizedLayout {
    /// Normalize `proposal`, interpreting its numbers in `request`'s measurement system
    #[must_use]
    pub fn from_proposal(request: &LayoutRequest, proposal: &LayoutProposal) -> Self {
        let system = request.measurement_system;
        let mm = system.mm_per_unit();
        let m2 = system.m2_per_area_unit();
        let point = |p: &Point| Point::new(p.x * mm, p.y * mm);

        let walls = proposal
            .walls
            .iter()
            .map(|w| Wall {
                start: point(&w.start),
                end: point(&w.end),
                height: w.height * mm,
                thickness: w.thickness * mm,
                ..w.clone()
            })
            .collect();

        let opening = |o: &Opening| Opening {
            width: o.width * mm,
            height: o.height * mm,
            ..o.clone()
        };

        let rooms = proposal
            .rooms
            .iter()
            .map(|r| Room {
                boundary: r.boundary.iter().map(point).collect(),
                ..r.clone()
            })
            .collect();

        let program = request
            .rooms
            .iter()
            .map(|r| RoomProgram {
                required_area: r.required_area * m2,
                ..r.clone()
            })
            .collect();

        Self {
            walls,
            doors: proposal.doors.iter().map(opening).collect(),
            windows: proposal.windows.iter().map(opening).collect(),
            rooms,
            program,
            region: request.region.clone(),
            provider_confidence: proposal.confidence,
            used_fallback: proposal.used_fallback,
        }
    }

    /// Look up a wall by id
    #[must_use]
    pub fn wall(&self, id: &str) -> Option<&Wall> {
        self.walls.iter().find(|w| w.id == id)
    }

    /// Find a proposal room by name, ignoring case
    #[must_use]
    pub fn room_named(&self, name: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.name.eq_ignore_ascii_case(name))
    }

    /// Area of a room in m²
    #[must_use]
    pub fn room_area_m2(room: &Room) -> f64 {
        polygon_area_mm2(&room.boundary).abs() / 1_000_000.0
    }

    /// Sum of all room areas in m²
    #[must_use]
    pub fn total_room_area_m2(&self) -> f64 {
        self.rooms.iter().map(Self::room_area_m2).sum()
    }

    /// Sum of required program areas in m²
    #[must_use]
    pub fn program_area_m2(&self) -> f64 {
        self.program.iter().map(|r| r.required_area).sum()
    }
}

/// Signed shoelace area of a closed polygon
#[must_use]
pub fn polygon_area_mm2(boundary: &[Point]) -> f64 {
    if boundary.len() < 3 {
        return 0.0;
    }
    let twice: f64 = boundary
        .iter()
        .zip(boundary.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    twice / 2.0
}
