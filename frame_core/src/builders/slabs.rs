//! # Slabs
//!
//! Every bay at every floor above the base is meshed as one or more strips
//! (split by the secondary beams) through the shared registry, so slab edge
//! nodes coincide with beam sub-nodes.
//!
//! Cells are dropped by centroid containment in an opening: a cell straddling
//! an opening edge is kept or dropped whole. The hole therefore follows the
//! mesh grid rather than the exact opening outline, and an opening that holds
//! no cell centroid leaves no hole at all; such openings are reported as
//! `OPENING_NOT_RESOLVED` findings.

use tracing::info;

use super::{MemberProperties, NodeGrid, SUBDIVISIONS};
use crate::config::SecondaryBeamDirection;
use crate::context::BuildContext;
use crate::errors::ModelResult;
use crate::geometry::Point2;
use crate::loads::{LoadPattern, SurfaceLoad};
use crate::mesh::{NodeSource, Opening, ShellElementType, SlabMeshGenerator, SlabPanel};
use crate::model::Element;
use crate::tags::{Tag, TagRange};
use crate::validation::ValidationWarning;

pub struct SlabBuilder<'a> {
    grid: &'a NodeGrid,
    properties: MemberProperties,
    /// Slab thickness (m)
    thickness: f64,
    openings: Vec<Opening>,
    secondary_beams_per_bay: usize,
    secondary_direction: SecondaryBeamDirection,
    density: usize,
    element_type: ShellElementType,
    /// Factored pressure (kPa) applied to every shell, if loads are applied
    pressure: Option<f64>,
}

impl<'a> SlabBuilder<'a> {
    pub fn new(grid: &'a NodeGrid, properties: MemberProperties, thickness: f64) -> Self {
        SlabBuilder {
            grid,
            properties,
            thickness,
            openings: Vec::new(),
            secondary_beams_per_bay: 0,
            secondary_direction: SecondaryBeamDirection::default(),
            density: 1,
            element_type: ShellElementType::Quad,
            pressure: None,
        }
    }

    pub fn with_openings(mut self, openings: Vec<Opening>) -> Self {
        self.openings = openings;
        self
    }

    pub fn with_strips(mut self, secondary_beams_per_bay: usize, direction: SecondaryBeamDirection) -> Self {
        self.secondary_beams_per_bay = secondary_beams_per_bay;
        self.secondary_direction = direction;
        self
    }

    pub fn with_mesh(mut self, density: usize, element_type: ShellElementType) -> Self {
        self.density = density.max(1);
        self.element_type = element_type;
        self
    }

    pub fn with_pressure(mut self, pressure_kpa: f64) -> Self {
        self.pressure = Some(pressure_kpa);
        self
    }

    /// Strip panels of one bay, with their (x, y) mesh divisions
    fn bay_panels(&self, bx: usize, by: usize, floor: usize) -> Vec<(SlabPanel, usize, usize)> {
        let grid = self.grid;
        let (x0, x1) = (grid.x_lines[bx], grid.x_lines[bx + 1]);
        let (y0, y1) = (grid.y_lines[by], grid.y_lines[by + 1]);
        let strips = self.secondary_beams_per_bay + 1;
        let base = SUBDIVISIONS * self.density;
        let across = (base / strips).max(1);

        (0..strips)
            .map(|k| {
                let (lo, hi) = (k as f64 / strips as f64, (k + 1) as f64 / strips as f64);
                let (origin, width_x, width_y, nx, ny) = match self.secondary_direction {
                    // Beams along Y: strips side by side in X
                    SecondaryBeamDirection::Y => {
                        let (a, b) = (x0 + (x1 - x0) * lo, x0 + (x1 - x0) * hi);
                        (Point2::new(a, y0), b - a, y1 - y0, across, base)
                    }
                    SecondaryBeamDirection::X => {
                        let (a, b) = (y0 + (y1 - y0) * lo, y0 + (y1 - y0) * hi);
                        (Point2::new(x0, a), x1 - x0, b - a, base, across)
                    }
                };
                let panel = SlabPanel {
                    id: format!("slab-F{floor}-{}{}-{k}", super::grid_letter(bx), by + 1),
                    origin,
                    width_x,
                    width_y,
                    elevation: grid.elevations[floor],
                    thickness: self.thickness,
                    openings: self.openings.clone(),
                };
                (panel, nx, ny)
            })
            .collect()
    }

    /// Mesh every bay at every floor; returns the next free slab element tag
    pub fn build(&self, ctx: &mut BuildContext) -> ModelResult<Tag> {
        let mut shells = 0;
        let mut skipped = 0;
        let mut resolved = vec![false; self.openings.len()];
        for floor in 1..=self.grid.floors() {
            for by in 0..self.grid.bays_y() {
                for bx in 0..self.grid.bays_x() {
                    for (panel, nx, ny) in self.bay_panels(bx, by, floor) {
                        let generator = SlabMeshGenerator::new(nx, ny, self.element_type);
                        let mesh = generator.generate(
                            &panel,
                            floor,
                            &mut NodeSource::Registry { ctx: &mut *ctx, range: TagRange::Slab },
                        )?;
                        skipped += mesh.skipped_cells();
                        for centroid in &mesh.skipped_centroids {
                            for (opening, hit) in self.openings.iter().zip(resolved.iter_mut()) {
                                *hit |= opening.contains(&centroid.plan());
                            }
                        }
                        for element in mesh.elements {
                            ctx.model.add_element(Element::shell(
                                element.tag,
                                element.nodes,
                                self.properties.material,
                                self.properties.section,
                            ))?;
                            if let Some(pressure_kpa) = self.pressure {
                                ctx.model.add_surface_load(SurfaceLoad {
                                    element: element.tag,
                                    pattern: LoadPattern::Gravity,
                                    pressure_kpa,
                                })?;
                            }
                            shells += 1;
                        }
                    }
                }
            }
        }
        for (opening, _) in self.openings.iter().zip(&resolved).filter(|(_, hit)| !**hit) {
            ctx.findings.push(ValidationWarning::OpeningNotResolved {
                x_min: opening.x_min,
                y_min: opening.y_min,
                x_max: opening.x_max,
                y_max: opening.y_max,
            });
        }
        info!(shells, skipped_cells = skipped, pressure_kpa = ?self.pressure, "Built slabs");
        Ok(ctx.tags.peek_element(TagRange::Slab))
    }
}
