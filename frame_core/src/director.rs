//! # Model Director
//!
//! Runs the builders in dependency order against one [`BuildContext`]:
//!
//! ```text
//! 1. materials + sections     (PropertyTags)
//! 2. node grid                (NodeGridBuilder)
//! 3. columns                  (ColumnBuilder)
//! 4. beams                    (primary, secondary, coupling)
//! 5. core walls               (if enabled and configured)
//! 6. slabs                    (if enabled)
//! 7. diaphragms + wind loads
//! ```
//!
//! Each phase only references entities created by earlier phases, which is
//! what lets the model reject dangling references at insertion time. The
//! core layout is resolved once up front and shared by column omission, beam
//! trimming, coupling beams, walls and slab openings.
//!
//! ## Example
//!
//! ```rust
//! use frame_core::config::{BuildInput, BuildOptions, BuildingDescription};
//! use frame_core::director::ModelDirector;
//!
//! let input = BuildInput::new(BuildingDescription::default(), BuildOptions::frame_only());
//! let report = ModelDirector::new(input).build().unwrap();
//! assert_eq!(report.model.summary().diaphragms, 2);
//! ```

use tracing::{info, info_span};

use crate::builders::beams::{BeamFamily, SelfWeight};
use crate::builders::columns::omitted_positions;
use crate::builders::{
    BeamBuilder, ColumnBuilder, CoreWallBuilder, DiaphragmBuilder, NodeGrid, NodeGridBuilder, PropertyTags,
    SlabBuilder, WindLoadBuilder,
};
use crate::config::{BuildInput, BuildOptions, BuildingDescription};
use crate::context::BuildContext;
use crate::core_wall::CoreLayout;
use crate::errors::ModelResult;
use crate::loads::LoadType;
use crate::model::StructuralModel;
use crate::units::{KiloPascals, KnPerCubicMeter, Meters, Millimeters};
use crate::validation::{validate_model, ValidationReport};

/// Output of one build
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub model: StructuralModel,
    pub validation: ValidationReport,
    /// Resolved core position, when walls were built
    pub core_layout: Option<CoreLayout>,
    pub property_tags: PropertyTags,
    /// Wind story forces along X and Y, floor 1 first (empty when wind is off)
    pub story_forces: (Vec<f64>, Vec<f64>),
}

pub struct ModelDirector {
    building: BuildingDescription,
    options: BuildOptions,
}

impl ModelDirector {
    pub fn new(input: BuildInput) -> Self {
        ModelDirector {
            building: input.building,
            options: input.options,
        }
    }

    pub fn building(&self) -> &BuildingDescription {
        &self.building
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    fn core_layout(&self) -> ModelResult<Option<CoreLayout>> {
        if !self.options.include_core_wall {
            return Ok(None);
        }
        let geometry = &self.building.geometry;
        self.building
            .lateral
            .core_wall
            .as_ref()
            .map(|core| core.layout(geometry.plan_width(), geometry.plan_depth()))
            .transpose()
    }

    /// Factored slab pressure γ_G·(t·ρ + SDL) + γ_Q·LL
    fn slab_pressure(&self) -> KiloPascals {
        let loads = &self.building.loads;
        let thickness = Meters::from(Millimeters(self.building.sections.slab_thickness_mm));
        let self_weight = KnPerCubicMeter(self.building.materials.unit_weight).over_thickness(thickness);
        KiloPascals(loads.combination.factored(&[
            (LoadType::Dead, self_weight.value()),
            (LoadType::SuperimposedDead, loads.superimposed_dead_kpa),
            (LoadType::Live, loads.live_kpa),
        ]))
    }

    /// Build a fresh model. Identical input always yields identical tags.
    pub fn build(&self) -> ModelResult<BuildReport> {
        let building = &self.building;
        let options = &self.options;
        let _span = info_span!("build").entered();

        building.validate()?;
        options.validate()?;
        let geometry = &building.geometry;
        let elevations = geometry.floor_elevations();
        let mut ctx = BuildContext::new(options.tolerance);

        // Phase 1
        let props = PropertyTags::register(&mut ctx, building)?;
        info!(
            materials = ctx.model.materials.len(),
            sections = ctx.model.sections.len(),
            "Registered materials and sections"
        );

        let layout = self.core_layout()?;
        let outline = layout.as_ref().map(CoreLayout::outline);
        if let Some(layout) = &layout {
            info!(config = %layout.config, x = layout.origin.x, y = layout.origin.y, "Resolved core layout");
        }

        // Phases 2 and 3
        let near_core = if options.omit_columns_near_core { outline.as_ref() } else { None };
        let omitted = omitted_positions(
            &NodeGrid::layout(geometry),
            near_core,
            options.column_omission_clearance,
            &options.omitted_columns,
        );
        let grid = NodeGridBuilder::new(geometry, &omitted).build(&mut ctx)?;
        ColumnBuilder::new(&grid, props.column, &omitted).build(&mut ctx)?;

        // Phase 4
        let sections = &building.sections;
        let mut beams = BeamBuilder::new(
            &grid,
            BeamFamily { properties: props.primary_beam, dimensions: sections.primary_beam },
            BeamFamily { properties: props.secondary_beam, dimensions: sections.secondary_beam },
            BeamFamily { properties: props.coupling_beam, dimensions: sections.coupling_beam },
        )
        .with_trimming(options.trim_beams_at_core);
        if options.apply_gravity_loads {
            beams = beams.with_self_weight(SelfWeight {
                gamma_g: building.loads.combination.gamma_g,
                unit_weight: KnPerCubicMeter(building.materials.unit_weight),
            });
        }
        beams.create_primary_beams(&mut ctx, layout.as_ref())?;
        beams.create_secondary_beams(
            &mut ctx,
            layout.as_ref(),
            options.secondary_beams_per_bay,
            options.secondary_beam_direction,
        )?;
        beams.create_coupling_beams(&mut ctx, layout.as_ref())?;
        let connections = beams.core_connections().to_vec();

        // Phase 5
        if let Some(layout) = &layout {
            let thickness = Meters::from(Millimeters(sections.wall_thickness_mm));
            CoreWallBuilder::new(layout, props.wall, thickness.0, &elevations)
                .with_mesh(options.shell_mesh_density, options.shell_element_type)
                .build(&mut ctx, &connections)?;
        }

        // Phase 6
        if options.include_slabs {
            let mut openings = geometry.slab_openings.clone();
            openings.extend(layout.as_ref().map(CoreLayout::footprint));
            let thickness = Meters::from(Millimeters(sections.slab_thickness_mm));
            let mut slabs = SlabBuilder::new(&grid, props.slab, thickness.0)
                .with_openings(openings)
                .with_strips(options.secondary_beams_per_bay, options.secondary_beam_direction)
                .with_mesh(options.shell_mesh_density, options.shell_element_type);
            if options.apply_gravity_loads {
                let pressure = self.slab_pressure();
                info!(
                    combination = %building.loads.combination.equation(),
                    pressure_kpa = pressure.value(),
                    "Factored slab pressure"
                );
                slabs = slabs.with_pressure(pressure.value());
            }
            slabs.build(&mut ctx)?;
        }

        // Phase 7
        let diaphragms = DiaphragmBuilder::new(&elevations).build(&mut ctx)?;
        let mut story_forces = (Vec::new(), Vec::new());
        if options.apply_wind_loads {
            let wind = WindLoadBuilder::new(&building.lateral.wind, geometry);
            wind.apply(&mut ctx, &diaphragms)?;
            story_forces = wind.story_forces();
        }

        let (model, mut validation) = ctx.into_parts();
        validation.merge(validate_model(&model, options.tolerance));
        let summary = model.summary();
        info!(
            nodes = summary.nodes,
            elements = summary.elements,
            diaphragms = summary.diaphragms,
            warnings = validation.len(),
            "Model build complete"
        );

        Ok(BuildReport {
            model,
            validation,
            core_layout: layout,
            property_tags: props,
            story_forces,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_wall::{CoreWallConfig, CoreWallGeometry};
    use approx::assert_relative_eq;

    #[test]
    fn test_slab_pressure() {
        let director = ModelDirector::new(BuildInput::default());
        // 1.4 x (0.2 x 24.5 + 1.5) + 1.6 x 3.0
        assert_relative_eq!(director.slab_pressure().0, 1.4 * (4.9 + 1.5) + 4.8, epsilon = 1e-9);
    }

    #[test]
    fn test_core_layout_only_when_enabled() {
        let mut input = BuildInput::default();
        input.building.lateral.core_wall = Some(CoreWallGeometry::new(CoreWallConfig::ISection, 4.0, 4.0, 0.0));
        let director = ModelDirector::new(input.clone());
        let layout = director.core_layout().unwrap().unwrap();
        assert_relative_eq!(layout.origin.x, 4.0);

        input.options.include_core_wall = false;
        assert!(ModelDirector::new(input).core_layout().unwrap().is_none());
    }

    #[test]
    fn test_invalid_options_are_fatal() {
        let mut input = BuildInput::default();
        input.options.secondary_beams_per_bay = 3;
        let err = ModelDirector::new(input).build().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
