//! Sample answer generator.
//!
//! Stand-in for the real answer-generation service: produces a canned
//! explanation and a randomized renderable descriptor. Useful for the REPL
//! and for exercising the pipeline without a remote service.

use async_trait::async_trait;
use rand::Rng;

use prism_core::generation::{AnswerGenerator, GeneratedVisualization, GenerationError};
use prism_core::visualization::{Geometry, VisualizationDescriptor};

const GEOMETRIES: [Geometry; 4] = [
    Geometry::Cube,
    Geometry::Sphere,
    Geometry::Cylinder,
    Geometry::Torus,
];

const COLORS: [&str; 5] = ["#2563EB", "#DC2626", "#059669", "#D97706", "#7C3AED"];

/// Generator that answers every question with a sample explanation and a
/// random geometry, color, and rotation.
#[derive(Debug, Clone, Default)]
pub struct SampleAnswerGenerator;

impl SampleAnswerGenerator {
    /// Creates a new sample generator.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AnswerGenerator for SampleAnswerGenerator {
    async fn generate(&self, question: &str) -> Result<GeneratedVisualization, GenerationError> {
        let descriptor = {
            let mut rng = rand::thread_rng();
            VisualizationDescriptor {
                geometry: GEOMETRIES[rng.gen_range(0..GEOMETRIES.len())],
                position: [0.0, 0.0, 0.0],
                rotation: [
                    rng.gen_range(0.0..360.0),
                    rng.gen_range(0.0..360.0),
                    rng.gen_range(0.0..360.0),
                ],
                scale: [1.0, 1.0, 1.0],
                color: Some(COLORS[rng.gen_range(0..COLORS.len())].to_string()),
            }
        };

        let answer = format!(
            "Here's an explanation about {}\n\nThis is a sample response standing in for \
             the real answer-generation service. It sketches how the question would be \
             analyzed and answered, and pairs the text with a renderable 3D description.",
            question
        );

        Ok(GeneratedVisualization { answer, descriptor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generated_descriptor_stays_in_range() {
        let generator = SampleAnswerGenerator::new();

        let generated = generator.generate("how do tides work?").await.unwrap();

        let descriptor = &generated.descriptor;
        assert!(GEOMETRIES.contains(&descriptor.geometry));
        assert_eq!(descriptor.position, [0.0, 0.0, 0.0]);
        assert_eq!(descriptor.scale, [1.0, 1.0, 1.0]);
        for axis in descriptor.rotation {
            assert!((0.0..360.0).contains(&axis));
        }
        let color = descriptor.color.as_deref().unwrap();
        assert!(COLORS.contains(&color));
    }

    #[tokio::test]
    async fn test_answer_references_the_question() {
        let generator = SampleAnswerGenerator::new();

        let generated = generator.generate("how do tides work?").await.unwrap();

        assert!(generated.answer.contains("how do tides work?"));
    }
}
