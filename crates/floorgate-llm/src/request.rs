//! Layout request types
//!
//! A `LayoutRequest` is what a caller submits: a free-text brief, a
//! structured room program, the building-code region and the measurement
//! system its numbers are expressed in.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier tying one request to every record derived from it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Wrap a caller-supplied identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh system-assigned identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CorrelationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Measurement system of a request and of the proposals generated for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Millimetres and square metres
    Metric,
    /// Inches and square feet
    Imperial,
    /// Anything else; rejected by intake
    #[serde(other)]
    Unknown,
}

impl MeasurementSystem {
    /// Millimetres per length unit
    #[must_use]
    pub fn mm_per_unit(&self) -> f64 {
        match self {
            Self::Imperial => 25.4,
            Self::Metric | Self::Unknown => 1.0,
        }
    }

    /// Square metres per area unit
    #[must_use]
    pub fn m2_per_area_unit(&self) -> f64 {
        match self {
            Self::Imperial => 0.092_903_04,
            Self::Metric | Self::Unknown => 1.0,
        }
    }

    /// Whether intake accepts this system
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// One entry of the room program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomProgram {
    /// Room name, matched case-insensitively against proposal room names
    pub name: String,
    /// Required area in the request's area unit
    pub required_area: f64,
    /// Names of rooms this room must share a wall with
    #[serde(default)]
    pub adjacent_to: Vec<String>,
}

impl RoomProgram {
    /// Create a program entry
    #[must_use]
    pub fn new(name: impl Into<String>, required_area: f64) -> Self {
        Self {
            name: name.into(),
            required_area,
            adjacent_to: Vec::new(),
        }
    }

    /// Require adjacency to another room
    #[must_use]
    pub fn adjacent_to(mut self, other: impl Into<String>) -> Self {
        self.adjacent_to.push(other.into());
        self
    }
}

/// Options forwarded to AI providers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiOptions {
    /// Preferred model, if the caller has one
    #[serde(default)]
    pub model_preference: Option<String>,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Caller's confidence threshold; can only make review stricter
    #[serde(default)]
    pub confidence_threshold: Option<f64>,
    /// Token cap for generation
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Run one automatic correction pass on an `InvalidButCorrectable` result
    #[serde(default)]
    pub request_correction: bool,
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    4096
}

impl Default for AiOptions {
    fn default() -> Self {
        Self {
            model_preference: None,
            temperature: default_temperature(),
            confidence_threshold: None,
            max_tokens: default_max_tokens(),
            request_correction: false,
        }
    }
}

/// A request for a floor-plan layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRequest {
    /// Caller-supplied correlation id; intake assigns one when absent
    #[serde(default)]
    pub correlation_id: Option<CorrelationId>,
    /// Free-text brief
    #[serde(default)]
    pub description: String,
    /// Structured room program
    pub rooms: Vec<RoomProgram>,
    /// Building-code region (rule-set key)
    pub region: String,
    /// Measurement system of every number in the request
    pub measurement_system: MeasurementSystem,
    /// Caller tier, used for the auto-approve policy
    #[serde(default)]
    pub tier: Option<String>,
    /// AI options
    #[serde(default)]
    pub ai_options: AiOptions,
}

impl LayoutRequest {
    /// Create a metric request with no rooms
    #[must_use]
    pub fn new(description: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            correlation_id: None,
            description: description.into(),
            rooms: Vec::new(),
            region: region.into(),
            measurement_system: MeasurementSystem::Metric,
            tier: None,
            ai_options: AiOptions::default(),
        }
    }

    /// Set the correlation id
    #[must_use]
    pub fn with_correlation_id(mut self, id: impl Into<CorrelationId>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Add a room to the program
    #[must_use]
    pub fn with_room(mut self, room: RoomProgram) -> Self {
        self.rooms.push(room);
        self
    }

    /// Set the measurement system
    #[must_use]
    pub fn with_measurement_system(mut self, system: MeasurementSystem) -> Self {
        self.measurement_system = system;
        self
    }

    /// Set the caller tier
    #[must_use]
    pub fn with_tier(mut self, tier: impl Into<String>) -> Self {
        self.tier = Some(tier.into());
        self
    }

    /// Set AI options
    #[must_use]
    pub fn with_ai_options(mut self, options: AiOptions) -> Self {
        self.ai_options = options;
        self
    }

    /// Total requested area in square metres
    #[must_use]
    pub fn program_area_m2(&self) -> f64 {
        let factor = self.measurement_system.m2_per_area_unit();
        self.rooms.iter().map(|r| r.required_area * factor).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_measurement_system_deserializes() {
        let system: MeasurementSystem = serde_json::from_str("\"cubits\"").unwrap();
        assert_eq!(system, MeasurementSystem::Unknown);
        assert!(!system.is_known());

        let metric: MeasurementSystem = serde_json::from_str("\"metric\"").unwrap();
        assert!(metric.is_known());
    }

    #[test]
    fn test_request_defaults() {
        let json = r#"{
            "rooms": [{"name": "Kitchen", "required_area": 12.0}],
            "region": "us",
            "measurement_system": "metric"
        }"#;
        let request: LayoutRequest = serde_json::from_str(json).unwrap();

        assert!(request.correlation_id.is_none());
        assert_eq!(request.ai_options.max_tokens, 4096);
        assert!(!request.ai_options.request_correction);
        assert!(request.rooms[0].adjacent_to.is_empty());
    }

    #[test]
    fn test_program_area_converts_imperial() {
        let request = LayoutRequest::new("den", "us")
            .with_measurement_system(MeasurementSystem::Imperial)
            .with_room(RoomProgram::new("Den", 100.0));

        assert!((request.program_area_m2() - 9.290_304).abs() < 1e-9);
    }

    #[test]
    fn test_correlation_id_is_transparent() {
        let id = CorrelationId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
        assert_ne!(CorrelationId::generate(), CorrelationId::generate());
    }
}
