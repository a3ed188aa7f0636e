//! # Rigid Diaphragms and Wind
//!
//! One diaphragm per floor above the base. The master node sits at the
//! centroid of the floor's nodes, takes its tag from the diaphragm range and
//! is kept out of the registry index so it can never merge with a structural
//! node that happens to sit at the centroid.
//!
//! Wind shears are lumped on the masters. Story forces follow the height
//! distribution `F_i = V · h_i / Σh` unless explicit forces are given. The
//! torsion pattern uses
//!
//! ```text
//! e_x = (x_c - x_m) + a · B_x      e_y = (y_c - y_m) + a · B_y
//! M_z = F_y · e_x - F_x · e_y
//! ```
//!
//! where (x_c, y_c) is the geometric centre of the plan, (x_m, y_m) the
//! master, `a` the accidental eccentricity ratio and B the plan dimensions.

use tracing::{debug, info, warn};

use crate::config::{GeometryConfig, WindConfig};
use crate::context::BuildContext;
use crate::errors::ModelResult;
use crate::geometry::Point3;
use crate::loads::{LoadPattern, PointLoad};
use crate::model::{Restraints, RigidDiaphragm};
use crate::tags::TagRange;

/// Z translation is perpendicular to a floor diaphragm
const PERPENDICULAR_DOF: u8 = 3;

/// Loads below this magnitude are not applied
const NEGLIGIBLE_LOAD: f64 = 1.0e-9;

pub struct DiaphragmBuilder<'a> {
    floor_elevations: &'a [f64],
}

impl<'a> DiaphragmBuilder<'a> {
    pub fn new(floor_elevations: &'a [f64]) -> Self {
        DiaphragmBuilder { floor_elevations }
    }

    /// Create masters and diaphragms; floors without nodes are skipped with a warning
    pub fn build(&self, ctx: &mut BuildContext) -> ModelResult<Vec<RigidDiaphragm>> {
        let tolerance = ctx.registry.tolerance();
        let mut diaphragms = Vec::new();

        for (floor, &elevation) in self.floor_elevations.iter().enumerate().skip(1) {
            let slaves: Vec<_> = ctx
                .registry
                .nodes_on_floor(floor)
                .iter()
                .copied()
                .filter(|tag| {
                    ctx.model
                        .node(*tag)
                        .is_some_and(|n| (n.z - elevation).abs() <= tolerance)
                })
                .collect();
            if slaves.is_empty() {
                warn!(floor, elevation, "Rigid diaphragm floor has no slave nodes; skipped");
                continue;
            }

            let (sx, sy) = slaves
                .iter()
                .filter_map(|tag| ctx.model.node(*tag))
                .fold((0.0, 0.0), |(x, y), n| (x + n.x, y + n.y));
            let count = slaves.len() as f64;
            let master = ctx.standalone_node(
                TagRange::Diaphragm,
                Point3::new(sx / count, sy / count, elevation),
                Restraints::DIAPHRAGM_MASTER,
                floor,
            )?;
            debug!(floor, master, slaves = slaves.len(), "Created rigid diaphragm");
            diaphragms.push(RigidDiaphragm {
                floor_level: floor,
                elevation,
                master,
                slaves,
                perpendicular_dof: PERPENDICULAR_DOF,
            });
        }

        info!(diaphragms = diaphragms.len(), "Applied rigid diaphragms");
        ctx.model.diaphragms.extend(diaphragms.iter().cloned());
        Ok(diaphragms)
    }
}

/// Story force distribution for one direction
fn story_forces(base_shear: f64, explicit: Option<&[f64]>, elevations: &[f64]) -> Vec<f64> {
    if let Some(forces) = explicit {
        return forces.to_vec();
    }
    let heights = &elevations[1.min(elevations.len())..];
    let total: f64 = heights.iter().sum();
    if total <= 0.0 {
        return vec![0.0; heights.len()];
    }
    heights.iter().map(|h| base_shear * h / total).collect()
}

pub struct WindLoadBuilder<'a> {
    wind: &'a WindConfig,
    geometry: &'a GeometryConfig,
}

impl<'a> WindLoadBuilder<'a> {
    pub fn new(wind: &'a WindConfig, geometry: &'a GeometryConfig) -> Self {
        WindLoadBuilder { wind, geometry }
    }

    /// Story forces along X and Y, floor 1 first
    pub fn story_forces(&self) -> (Vec<f64>, Vec<f64>) {
        let elevations = self.geometry.floor_elevations();
        (
            story_forces(self.wind.base_shear_x, self.wind.floor_forces_x.as_deref(), &elevations),
            story_forces(self.wind.base_shear_y, self.wind.floor_forces_y.as_deref(), &elevations),
        )
    }

    /// Apply WindX, WindY and WindTorsion loads to the diaphragm masters
    pub fn apply(&self, ctx: &mut BuildContext, diaphragms: &[RigidDiaphragm]) -> ModelResult<()> {
        let (fx, fy) = self.story_forces();
        let (plan_x, plan_y) = (self.geometry.plan_width(), self.geometry.plan_depth());
        let centre = (plan_x / 2.0, plan_y / 2.0);
        let ratio = self.wind.accidental_eccentricity;
        let mut loads = 0;

        for diaphragm in diaphragms {
            let index = diaphragm.floor_level - 1;
            let (Some(&force_x), Some(&force_y)) = (fx.get(index), fy.get(index)) else {
                continue;
            };
            let Some(master) = ctx.model.node(diaphragm.master).map(|n| (n.x, n.y)) else {
                continue;
            };

            let mut pending = Vec::new();
            if force_x.abs() > NEGLIGIBLE_LOAD {
                pending.push(PointLoad::force_x(diaphragm.master, LoadPattern::WindX, force_x));
            }
            if force_y.abs() > NEGLIGIBLE_LOAD {
                pending.push(PointLoad::force_y(diaphragm.master, LoadPattern::WindY, force_y));
            }
            let e_x = (centre.0 - master.0) + ratio * plan_x;
            let e_y = (centre.1 - master.1) + ratio * plan_y;
            let torsion = force_y * e_x - force_x * e_y;
            if torsion.abs() > NEGLIGIBLE_LOAD {
                pending.push(PointLoad::moment_z(diaphragm.master, LoadPattern::WindTorsion, torsion));
            }
            for load in pending {
                ctx.model.add_point_load(load)?;
                loads += 1;
            }
        }
        info!(loads, "Applied wind loads");
        Ok(())
    }
}
