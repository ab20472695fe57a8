//! Visualization record domain model.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Base geometry of a renderable 3D description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Geometry {
    Cube,
    Sphere,
    Cylinder,
    Torus,
}

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Geometry::Cube => write!(f, "cube"),
            Geometry::Sphere => write!(f, "sphere"),
            Geometry::Cylinder => write!(f, "cylinder"),
            Geometry::Torus => write!(f, "torus"),
        }
    }
}

/// The renderable 3D description attached to an answer.
///
/// This payload is opaque to the coordination logic: it is produced by the
/// answer generation service and consumed by the rendering collaborator;
/// nothing in between inspects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationDescriptor {
    /// Base geometry to render
    pub geometry: Geometry,
    /// Position in scene space (x, y, z)
    pub position: [f32; 3],
    /// Rotation per axis in degrees
    pub rotation: [f32; 3],
    /// Scale per axis
    pub scale: [f32; 3],
    /// Optional hex color (e.g. "#2563EB")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// One answered question, immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationRecord {
    /// Unique record identifier (UUID format)
    pub id: String,
    /// Identity id of the user who asked the question
    pub owner_id: String,
    /// The question as submitted
    pub question: String,
    /// The generated answer text
    pub answer: String,
    /// Timestamp when the record was created (ISO 8601 format)
    pub created_at: String,
    /// The renderable 3D description
    pub descriptor: VisualizationDescriptor,
}

impl VisualizationRecord {
    /// Materializes an insert payload into a record with a fresh id and
    /// creation timestamp. Store implementations call this at insert time.
    pub fn create(new: NewVisualizationRecord) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: new.owner_id,
            question: new.question,
            answer: new.answer,
            descriptor: new.descriptor,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Compares two records by creation time, newest first.
    ///
    /// Timestamps are parsed as RFC 3339; if parsing fails, falls back to
    /// string comparison.
    pub fn newer_first(a: &Self, b: &Self) -> std::cmp::Ordering {
        match (
            DateTime::parse_from_rfc3339(&a.created_at),
            DateTime::parse_from_rfc3339(&b.created_at),
        ) {
            (Ok(a_created), Ok(b_created)) => b_created.cmp(&a_created),
            _ => b.created_at.as_str().cmp(a.created_at.as_str()),
        }
    }
}

/// Insert payload for a visualization record.
///
/// The store assigns the id and creation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVisualizationRecord {
    /// Identity id of the asking user
    pub owner_id: String,
    /// The question as submitted
    pub question: String,
    /// The generated answer text
    pub answer: String,
    /// The renderable 3D description
    pub descriptor: VisualizationDescriptor,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(created_at: &str) -> VisualizationRecord {
        VisualizationRecord {
            id: Uuid::new_v4().to_string(),
            owner_id: "owner".to_string(),
            question: "q".to_string(),
            answer: "a".to_string(),
            descriptor: VisualizationDescriptor {
                geometry: Geometry::Cube,
                position: [0.0, 0.0, 0.0],
                rotation: [0.0, 0.0, 0.0],
                scale: [1.0, 1.0, 1.0],
                color: None,
            },
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn test_newer_first_orders_by_parsed_timestamp() {
        let older = record("2026-01-01T00:00:00+00:00");
        let newer = record("2026-01-02T00:00:00+00:00");

        let mut records = vec![older.clone(), newer.clone()];
        records.sort_by(VisualizationRecord::newer_first);

        assert_eq!(records[0].id, newer.id);
        assert_eq!(records[1].id, older.id);
    }

    #[test]
    fn test_newer_first_falls_back_to_string_comparison() {
        let older = record("not-a-timestamp-a");
        let newer = record("not-a-timestamp-b");

        let mut records = vec![older.clone(), newer.clone()];
        records.sort_by(VisualizationRecord::newer_first);

        assert_eq!(records[0].id, newer.id);
    }

    #[test]
    fn test_descriptor_omits_absent_color() {
        let mut descriptor = VisualizationDescriptor {
            geometry: Geometry::Torus,
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
            color: None,
        };

        let json = serde_json::to_value(&descriptor).unwrap();
        assert!(json.get("color").is_none());
        assert_eq!(json["geometry"], "torus");

        descriptor.color = Some("#DC2626".to_string());
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["color"], "#DC2626");
    }

    #[test]
    fn test_create_assigns_id_and_timestamp() {
        let new = NewVisualizationRecord {
            owner_id: "owner".to_string(),
            question: "why is the sky blue?".to_string(),
            answer: "scattering".to_string(),
            descriptor: VisualizationDescriptor {
                geometry: Geometry::Sphere,
                position: [0.0, 0.0, 0.0],
                rotation: [0.0, 0.0, 0.0],
                scale: [1.0, 1.0, 1.0],
                color: Some("#2563EB".to_string()),
            },
        };

        let record = VisualizationRecord::create(new);

        assert!(!record.id.is_empty());
        assert!(DateTime::parse_from_rfc3339(&record.created_at).is_ok());
        assert_eq!(record.owner_id, "owner");
    }
}
