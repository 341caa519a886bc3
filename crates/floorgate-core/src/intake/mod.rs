//! Intake - Schema checks and correlation ids
//!
//! A request is checked before any provider is contacted. Accepted requests
//! always carry a correlation id: the caller's, or a generated one.

use crate::error::SchemaError;
use floorgate_llm::{CorrelationId, LayoutRequest};
use std::collections::HashSet;

mod locks;

pub use locks::{CorrelationGuard, CorrelationLocks};

/// Check a request against the schema
pub fn validate_schema(request: &LayoutRequest) -> Result<(), SchemaError> {
    if let Some(id) = &request.correlation_id {
        if id.as_str().trim().is_empty() {
            return Err(SchemaError::BlankCorrelationId);
        }
    }
    if !request.measurement_system.is_known() {
        return Err(SchemaError::UnknownMeasurementSystem);
    }
    if request.region.trim().is_empty() {
        return Err(SchemaError::MissingRegion);
    }
    if request.rooms.is_empty() {
        return Err(SchemaError::EmptyRoomProgram);
    }

    let mut names = HashSet::new();
    for (index, room) in request.rooms.iter().enumerate() {
        if room.name.trim().is_empty() {
            return Err(SchemaError::BlankRoomName { index });
        }
        if !room.required_area.is_finite() || room.required_area <= 0.0 {
            return Err(SchemaError::NonPositiveArea {
                room: room.name.clone(),
                area: room.required_area,
            });
        }
        names.insert(room.name.to_lowercase());
    }

    for room in &request.rooms {
        if let Some(target) = room
            .adjacent_to
            .iter()
            .find(|t| !names.contains(&t.to_lowercase()))
        {
            return Err(SchemaError::UnknownAdjacency {
                room: room.name.clone(),
                target: target.clone(),
            });
        }
    }

    Ok(())
}

/// Validate a request and make sure it carries a correlation id
pub fn accept(mut request: LayoutRequest) -> Result<(CorrelationId, LayoutRequest), SchemaError> {
    validate_schema(&request)?;
    let id = request
        .correlation_id
        .get_or_insert_with(CorrelationId::generate)
        .clone();
    Ok((id, request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorgate_llm::{MeasurementSystem, RoomProgram};

    fn valid() -> LayoutRequest {
        LayoutRequest::new("flat", "us")
            .with_room(RoomProgram::new("Living", 20.0))
            .with_room(RoomProgram::new("Kitchen", 10.0).adjacent_to("living"))
    }

    #[test]
    fn test_accept_assigns_id() {
        let (id, request) = accept(valid()).unwrap();
        assert!(!id.as_str().is_empty());
        assert_eq!(request.correlation_id, Some(id));

        let (id, _) = accept(valid().with_correlation_id("caller-1")).unwrap();
        assert_eq!(id.as_str(), "caller-1");
    }

    #[test]
    fn test_schema_failures() {
        let empty = LayoutRequest::new("nothing", "us");
        assert_eq!(validate_schema(&empty), Err(SchemaError::EmptyRoomProgram));

        let negative = LayoutRequest::new("x", "us").with_room(RoomProgram::new("Den", -1.0));
        assert!(matches!(
            validate_schema(&negative),
            Err(SchemaError::NonPositiveArea { .. })
        ));

        let nan = LayoutRequest::new("x", "us").with_room(RoomProgram::new("Den", f64::NAN));
        assert!(matches!(
            validate_schema(&nan),
            Err(SchemaError::NonPositiveArea { .. })
        ));

        let unknown = valid().with_measurement_system(MeasurementSystem::Unknown);
        assert_eq!(
            validate_schema(&unknown),
            Err(SchemaError::UnknownMeasurementSystem)
        );

        let dangling = valid().with_room(RoomProgram::new("Bath", 4.0).adjacent_to("Garage"));
        assert!(matches!(
            validate_schema(&dangling),
            Err(SchemaError::UnknownAdjacency { .. })
        ));

        let blank_id = valid().with_correlation_id("  ");
        assert_eq!(validate_schema(&blank_id), Err(SchemaError::BlankCorrelationId));

        let no_region = LayoutRequest::new("x", " ").with_room(RoomProgram::new("Den", 9.0));
        assert_eq!(validate_schema(&no_region), Err(SchemaError::MissingRegion));
    }
}
