//! Core walls: extract the panels of the configured layout and mesh each one
//! through the shared registry.

use tracing::info;

use super::MemberProperties;
use crate::context::BuildContext;
use crate::core_wall::CoreLayout;
use crate::errors::ModelResult;
use crate::geometry::polygon::distance_to_segment;
use crate::geometry::Point2;
use crate::mesh::{NodeSource, ShellElementType, WallMeshGenerator};
use crate::model::Element;
use crate::tags::{Tag, TagRange};

/// Tolerance for snapping beam connections onto a wall line (m)
const CONNECTION_TOLERANCE: f64 = 1.0e-6;

pub struct CoreWallBuilder<'a> {
    layout: &'a CoreLayout,
    properties: MemberProperties,
    /// Wall thickness (m)
    thickness: f64,
    floor_elevations: &'a [f64],
    density: usize,
    element_type: ShellElementType,
}

impl<'a> CoreWallBuilder<'a> {
    pub fn new(
        layout: &'a CoreLayout,
        properties: MemberProperties,
        thickness: f64,
        floor_elevations: &'a [f64],
    ) -> Self {
        CoreWallBuilder {
            layout,
            properties,
            thickness,
            floor_elevations,
            density: 1,
            element_type: ShellElementType::Quad,
        }
    }

    pub fn with_mesh(mut self, density: usize, element_type: ShellElementType) -> Self {
        self.density = density.max(1);
        self.element_type = element_type;
        self
    }

    /// Shortest story; sizes the horizontal divisions so no story's cells
    /// get flatter than the vertical split allows
    fn story_height(&self) -> f64 {
        self.floor_elevations
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .filter(|h| *h > 0.0)
            .reduce(f64::min)
            .unwrap_or(1.0)
    }

    /// Mesh every panel; `connections` are plan points where beams frame into
    /// the core and need a wall node. Returns the next free wall element tag.
    pub fn build(&self, ctx: &mut BuildContext, connections: &[Point2]) -> ModelResult<Tag> {
        let height = self.floor_elevations.last().copied().unwrap_or(0.0);
        let divisions_per_story = 2 * self.density;
        let target = self.story_height() / divisions_per_story as f64;

        let mut panels = self.layout.extract_panels(self.thickness, height);
        for panel in &mut panels {
            for point in connections {
                if distance_to_segment(point, &panel.start, &panel.end) <= CONNECTION_TOLERANCE {
                    panel.add_station(panel.start.distance_to(point));
                }
            }
        }

        let mut shells = 0;
        for panel in &panels {
            let length_divisions = ((panel.length() / target).round() as usize).max(1);
            let generator = WallMeshGenerator::new(length_divisions, divisions_per_story, self.element_type);
            let mesh = generator.generate(
                panel,
                self.floor_elevations,
                &mut NodeSource::Registry { ctx: &mut *ctx, range: TagRange::Wall },
            )?;
            for element in mesh.elements {
                ctx.model.add_element(Element::shell(
                    element.tag,
                    element.nodes,
                    self.properties.material,
                    self.properties.section,
                ))?;
                shells += 1;
            }
        }
        info!(panels = panels.len(), shells, config = %self.layout.config, "Built core walls");
        Ok(ctx.tags.peek_element(TagRange::Wall))
    }
}
