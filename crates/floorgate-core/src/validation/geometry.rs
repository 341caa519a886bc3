//! Geometry validator
//!
//! Physically impossible geometry is `critical`; dimensions that are merely
//! outside the configured bounds are `error`.

use super::normalize::NormalizedLayout;
use super::types::{Severity, ValidationError};
use super::Validator;
use floorgate_llm::{Opening, Point};
use serde::{Deserialize, Serialize};

/// Lengths at or below this are treated as zero
pub(crate) const LENGTH_EPSILON_MM: f64 = 1e-6;

/// Configured dimension bounds, in millimetres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryBounds {
    /// Minimum wall height
    #[serde(default = "default_min_wall_height")]
    pub min_wall_height_mm: f64,
    /// Maximum wall height
    #[serde(default = "default_max_wall_height")]
    pub max_wall_height_mm: f64,
    /// Minimum wall thickness
    #[serde(default = "default_min_wall_thickness")]
    pub min_wall_thickness_mm: f64,
    /// Maximum wall thickness
    #[serde(default = "default_max_wall_thickness")]
    pub max_wall_thickness_mm: f64,
    /// Minimum door width
    #[serde(default = "default_min_door_width")]
    pub min_door_width_mm: f64,
    /// Maximum door width
    #[serde(default = "default_max_door_width")]
    pub max_door_width_mm: f64,
    /// Minimum door height
    #[serde(default = "default_min_door_height")]
    pub min_door_height_mm: f64,
    /// Maximum door height
    #[serde(default = "default_max_door_height")]
    pub max_door_height_mm: f64,
    /// Minimum window width
    #[serde(default = "default_min_window_width")]
    pub min_window_width_mm: f64,
    /// Maximum window width
    #[serde(default = "default_max_window_width")]
    pub max_window_width_mm: f64,
    /// Openings must sit strictly inside (margin, 1 - margin) of the host wall
    #[serde(default = "default_opening_margin")]
    pub opening_margin: f64,
}

fn default_min_wall_height() -> f64 {
    2100.0
}
fn default_max_wall_height() -> f64 {
    6000.0
}
fn default_min_wall_thickness() -> f64 {
    50.0
}
fn default_max_wall_thickness() -> f64 {
    600.0
}
fn default_min_door_width() -> f64 {
    600.0
}
fn default_max_door_width() -> f64 {
    2400.0
}
fn default_min_door_height() -> f64 {
    1900.0
}
fn default_max_door_height() -> f64 {
    3000.0
}
fn default_min_window_width() -> f64 {
    300.0
}
fn default_max_window_width() -> f64 {
    4000.0
}
fn default_opening_margin() -> f64 {
    0.1
}

impl Default for GeometryBounds {
    fn default() -> Self {
        Self {
            min_wall_height_mm: default_min_wall_height(),
            max_wall_height_mm: default_max_wall_height(),
            min_wall_thickness_mm: default_min_wall_thickness(),
            max_wall_thickness_mm: default_max_wall_thickness(),
            min_door_width_mm: default_min_door_width(),
            max_door_width_mm: default_max_door_width(),
            min_door_height_mm: default_min_door_height(),
            max_door_height_mm: default_max_door_height(),
            min_window_width_mm: default_min_window_width(),
            max_window_width_mm: default_max_window_width(),
            opening_margin: default_opening_margin(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum OpeningKind {
    Door,
    Window,
}

impl OpeningKind {
    fn collection(self) -> &'static str {
        match self {
            Self::Door => "doors",
            Self::Window => "windows",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Self::Door => "door",
            Self::Window => "window",
        }
    }
}

/// Checks walls, openings and room outlines
#[derive(Debug, Clone, Default)]
pub struct GeometryValidator {
    bounds: GeometryBounds,
}

impl GeometryValidator {
    /// Create a validator with the given bounds
    #[must_use]
    pub fn new(bounds: GeometryBounds) -> Self {
        Self { bounds }
    }

    fn check_walls(&self, layout: &NormalizedLayout, out: &mut Vec<ValidationError>) {
        let b = &self.bounds;
        for (i, wall) in layout.walls.iter().enumerate() {
            let path = format!("walls[{i}]");
            let values = [
                wall.start.x,
                wall.start.y,
                wall.end.x,
                wall.end.y,
                wall.height,
                wall.thickness,
            ];
            if values.iter().any(|v| !v.is_finite()) {
                out.push(non_finite(&path, &format!("wall '{}'", wall.id)));
                continue;
            }

            if wall.length() <= LENGTH_EPSILON_MM {
                out.push(
                    ValidationError::new(
                        "GEOM_ZERO_LENGTH_WALL",
                        Severity::Critical,
                        path.clone(),
                        format!("wall '{}' has zero length", wall.id),
                    )
                    .with_fix("give the wall distinct start and end points or remove it"),
                );
            }

            check_dimension(
                out,
                "GEOM_WALL_HEIGHT",
                format!("{path}.height"),
                "height",
                wall.height,
                b.min_wall_height_mm,
                b.max_wall_height_mm,
            );
            check_dimension(
                out,
                "GEOM_WALL_THICKNESS",
                format!("{path}.thickness"),
                "thickness",
                wall.thickness,
                b.min_wall_thickness_mm,
                b.max_wall_thickness_mm,
            );
        }
    }

    fn check_openings(
        &self,
        layout: &NormalizedLayout,
        kind: OpeningKind,
        openings: &[Opening],
        out: &mut Vec<ValidationError>,
    ) {
        let b = &self.bounds;
        for (i, opening) in openings.iter().enumerate() {
            let path = format!("{}[{i}]", kind.collection());
            let label = format!("{} '{}'", kind.noun(), opening.id);
            if [opening.position, opening.width, opening.height]
                .iter()
                .any(|v| !v.is_finite())
            {
                out.push(non_finite(&path, &label));
                continue;
            }

            let Some(host) = layout.wall(&opening.wall_id) else {
                out.push(
                    ValidationError::new(
                        "GEOM_UNKNOWN_HOST_WALL",
                        Severity::Critical,
                        format!("{path}.wall_id"),
                        format!("{label} references unknown wall '{}'", opening.wall_id),
                    )
                    .with_fix("attach the opening to an existing wall"),
                );
                continue;
            };

            if !(0.0..=1.0).contains(&opening.position) {
                out.push(ValidationError::new(
                    "GEOM_OPENING_OFF_WALL",
                    Severity::Critical,
                    format!("{path}.position"),
                    format!("{label} lies outside its host wall (ratio {})", opening.position),
                ));
            } else if opening.position <= b.opening_margin
                || opening.position >= 1.0 - b.opening_margin
            {
                out.push(
                    ValidationError::new(
                        "GEOM_OPENING_POSITION",
                        Severity::Error,
                        format!("{path}.position"),
                        format!("{label} is too close to the end of its wall"),
                    )
                    .with_fix(format!(
                        "move the {} to between {:.0}% and {:.0}% of the wall length",
                        kind.noun(),
                        b.opening_margin * 100.0,
                        (1.0 - b.opening_margin) * 100.0
                    )),
                );
            }

            let host_length = host.length();
            if host_length > LENGTH_EPSILON_MM && opening.width > host_length {
                out.push(
                    ValidationError::new(
                        "GEOM_OPENING_WIDER_THAN_WALL",
                        Severity::Critical,
                        format!("{path}.width"),
                        format!(
                            "{label} is {:.0}mm wide but wall '{}' is {:.0}mm long",
                            opening.width, host.id, host_length
                        ),
                    )
                    .with_fix(format!("reduce width to ≤{:.0}mm", host_length)),
                );
            }

            match kind {
                OpeningKind::Door => {
                    check_dimension(
                        out,
                        "GEOM_DOOR_WIDTH",
                        format!("{path}.width"),
                        "width",
                        opening.width,
                        b.min_door_width_mm,
                        b.max_door_width_mm,
                    );
                    check_dimension(
                        out,
                        "GEOM_DOOR_HEIGHT",
                        format!("{path}.height"),
                        "height",
                        opening.height,
                        b.min_door_height_mm,
                        b.max_door_height_mm,
                    );
                }
                OpeningKind::Window => check_dimension(
                    out,
                    "GEOM_WINDOW_WIDTH",
                    format!("{path}.width"),
                    "width",
                    opening.width,
                    b.min_window_width_mm,
                    b.max_window_width_mm,
                ),
            }
        }
    }

    fn check_rooms(&self, layout: &NormalizedLayout, out: &mut Vec<ValidationError>) {
        for (i, room) in layout.rooms.iter().enumerate() {
            let path = format!("rooms[{i}].boundary");
            let label = format!("room '{}'", room.name);

            if room.boundary.len() < 3 {
                out.push(ValidationError::new(
                    "GEOM_DEGENERATE_ROOM",
                    Severity::Critical,
                    path,
                    format!("{label} has {} vertices, needs at least 3", room.boundary.len()),
                ));
                continue;
            }
            if room
                .boundary
                .iter()
                .any(|p| !p.x.is_finite() || !p.y.is_finite())
            {
                out.push(non_finite(&path, &label));
                continue;
            }
            if NormalizedLayout::room_area_m2(room) * 1_000_000.0 <= LENGTH_EPSILON_MM {
                out.push(ValidationError::new(
                    "GEOM_ZERO_AREA_ROOM",
                    Severity::Critical,
                    path,
                    format!("{label} encloses no area"),
                ));
                continue;
            }
            if self_intersects(&room.boundary) {
                out.push(
                    ValidationError::new(
                        "GEOM_SELF_INTERSECTING",
                        Severity::Critical,
                        path,
                        format!("{label} boundary crosses itself"),
                    )
                    .with_fix("reorder the boundary vertices"),
                );
            }
        }
    }
}

#[async_trait::async_trait]
impl Validator for GeometryValidator {
    fn name(&self) -> &'static str {
        "geometry"
    }

    async fn validate(&self, layout: &NormalizedLayout) -> Vec<ValidationError> {
        let mut out = Vec::new();
        self.check_walls(layout, &mut out);
        self.check_openings(layout, OpeningKind::Door, &layout.doors, &mut out);
        self.check_openings(layout, OpeningKind::Window, &layout.windows, &mut out);
        self.check_rooms(layout, &mut out);
        out
    }
}

fn non_finite(path: &str, label: &str) -> ValidationError {
    ValidationError::new(
        "GEOM_NON_FINITE",
        Severity::Critical,
        path,
        format!("{label} has a non-finite coordinate or dimension"),
    )
}

/// Non-positive values are impossible; values outside bounds are out of policy
fn check_dimension(
    out: &mut Vec<ValidationError>,
    code: &str,
    path: String,
    what: &str,
    value: f64,
    min: f64,
    max: f64,
) {
    if value <= 0.0 {
        out.push(ValidationError::new(
            "GEOM_NON_POSITIVE_DIMENSION",
            Severity::Critical,
            path,
            format!("{what} is {value}mm"),
        ));
    } else if value < min {
        out.push(
            ValidationError::new(
                code,
                Severity::Error,
                path,
                format!("{what} {value:.0}mm is below the {min:.0}mm minimum"),
            )
            .with_fix(format!("increase {what} to ≥{min:.0}mm")),
        );
    } else if value > max {
        out.push(
            ValidationError::new(
                code,
                Severity::Error,
                path,
                format!("{what} {value:.0}mm is above the {max:.0}mm maximum"),
            )
            .with_fix(format!("reduce {what} to ≤{max:.0}mm")),
        );
    }
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn within_box(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Whether segments `p1p2` and `p3p4` touch or cross
pub(crate) fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    let d1 = orientation(p3, p4, p1);
    let d2 = orientation(p3, p4, p2);
    let d3 = orientation(p1, p2, p3);
    let d4 = orientation(p1, p2, p4);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && within_box(p3, p4, p1))
        || (d2 == 0.0 && within_box(p3, p4, p2))
        || (d3 == 0.0 && within_box(p1, p2, p3))
        || (d4 == 0.0 && within_box(p1, p2, p4))
}

/// Whether any two non-adjacent edges of the closed polygon meet
pub(crate) fn self_intersects(boundary: &[Point]) -> bool {
    let n = boundary.len();
    if n < 4 {
        return false;
    }
    let edge = |k: usize| (boundary[k], boundary[(k + 1) % n]);

    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (a, b) = edge(i);
            let (c, d) = edge(j);
            if segments_intersect(a, b, c, d) {
                return true;
            }
        }
    }
    false
}

/// The part of `b` lying on `a`, if the two are collinear within `tolerance`
pub(crate) fn collinear_overlap(
    a: (Point, Point),
    b: (Point, Point),
    tolerance: f64,
) -> Option<(Point, Point)> {
    let (dx, dy) = (a.1.x - a.0.x, a.1.y - a.0.y);
    let length = dx.hypot(dy);
    if length <= LENGTH_EPSILON_MM {
        return None;
    }
    let (ux, uy) = (dx / length, dy / length);
    let offset = |p: Point| ((p.x - a.0.x) * uy - (p.y - a.0.y) * ux).abs();
    if offset(b.0) > tolerance || offset(b.1) > tolerance {
        return None;
    }

    let along = |p: Point| (p.x - a.0.x) * ux + (p.y - a.0.y) * uy;
    let (t0, t1) = (along(b.0), along(b.1));
    let lo = t0.min(t1).max(0.0);
    let hi = t0.max(t1).min(length);
    if hi - lo <= tolerance {
        return None;
    }
    Some((
        Point::new(a.0.x + ux * lo, a.0.y + uy * lo),
        Point::new(a.0.x + ux * hi, a.0.y + uy * hi),
    ))
}
