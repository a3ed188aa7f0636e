//! # Build Input
//!
//! [`BuildingDescription`] says *what* to build (bay grid, stories, grades,
//! member sizes, loads, core and wind). [`BuildOptions`] says *how* (which
//! phases run, mesh density, tolerance). Both deserialise from JSON with
//! defaults for every field, so a minimal input only names what differs.
//!
//! ## Example
//!
//! ```rust
//! use frame_core::config::BuildInput;
//!
//! let input = BuildInput::from_json_str(r#"{
//!     "building": { "geometry": { "bays_x": 3, "floors": 5 } },
//!     "options": { "include_slabs": false }
//! }"#).unwrap();
//! assert_eq!(input.building.geometry.bays_x, 3);
//! assert_eq!(input.building.geometry.bays_y, 2);
//! assert!(!input.options.include_slabs);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::builders::SUBDIVISIONS;
use crate::core_wall::CoreWallGeometry;
use crate::errors::{ModelError, ModelResult};
use crate::loads::GravityCombination;
use crate::materials::{ConcreteGrade, RectangularSection, DEFAULT_UNIT_WEIGHT};
use crate::mesh::{Opening, ShellElementType};
use crate::registry::DEFAULT_TOLERANCE;

// ============================================================================
// Building description
// ============================================================================

/// Regular bay grid and story stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub bays_x: usize,
    pub bays_y: usize,
    /// Bay width along X (m)
    pub bay_width_x: f64,
    /// Bay width along Y (m)
    pub bay_width_y: f64,
    /// Stories above the base
    pub floors: usize,
    /// Typical story height (m)
    pub story_height: f64,
    /// Rectangular slab voids applied at every floor (plan, m)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub slab_openings: Vec<Opening>,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        GeometryConfig {
            bays_x: 2,
            bays_y: 2,
            bay_width_x: 6.0,
            bay_width_y: 6.0,
            floors: 2,
            story_height: 3.5,
            slab_openings: Vec::new(),
        }
    }
}

impl GeometryConfig {
    pub fn plan_width(&self) -> f64 {
        self.bays_x as f64 * self.bay_width_x
    }

    pub fn plan_depth(&self) -> f64 {
        self.bays_y as f64 * self.bay_width_y
    }

    /// Elevation of every floor line, base first
    pub fn floor_elevations(&self) -> Vec<f64> {
        (0..=self.floors).map(|k| k as f64 * self.story_height).collect()
    }

    pub fn validate(&self) -> ModelResult<()> {
        for (field, count) in [("bays_x", self.bays_x), ("bays_y", self.bays_y), ("floors", self.floors)] {
            if count == 0 {
                return Err(ModelError::invalid_input(field, "0", "Must be at least 1"));
            }
        }
        for (field, value) in [
            ("bay_width_x", self.bay_width_x),
            ("bay_width_y", self.bay_width_y),
            ("story_height", self.story_height),
        ] {
            if !(value > 0.0) {
                return Err(ModelError::invalid_input(field, value.to_string(), "Must be positive"));
            }
        }
        self.slab_openings.iter().try_for_each(Opening::validate)
    }
}

/// Concrete grade per member family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialsConfig {
    pub column: ConcreteGrade,
    pub beam: ConcreteGrade,
    pub wall: ConcreteGrade,
    pub slab: ConcreteGrade,
    pub coupling_beam: ConcreteGrade,
    /// Reinforced concrete unit weight (kN/m³)
    pub unit_weight: f64,
}

impl Default for MaterialsConfig {
    fn default() -> Self {
        MaterialsConfig {
            column: ConcreteGrade::C45,
            beam: ConcreteGrade::C40,
            wall: ConcreteGrade::C45,
            slab: ConcreteGrade::C35,
            coupling_beam: ConcreteGrade::C40,
            unit_weight: DEFAULT_UNIT_WEIGHT,
        }
    }
}

impl MaterialsConfig {
    pub fn validate(&self) -> ModelResult<()> {
        self.column.validate("materials.column")?;
        self.beam.validate("materials.beam")?;
        self.wall.validate("materials.wall")?;
        self.slab.validate("materials.slab")?;
        self.coupling_beam.validate("materials.coupling_beam")?;
        if !(self.unit_weight > 0.0) {
            return Err(ModelError::invalid_input(
                "materials.unit_weight",
                self.unit_weight.to_string(),
                "Unit weight must be positive",
            ));
        }
        Ok(())
    }
}

/// Member sizes (mm)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionsConfig {
    pub column: RectangularSection,
    pub primary_beam: RectangularSection,
    pub secondary_beam: RectangularSection,
    pub coupling_beam: RectangularSection,
    pub wall_thickness_mm: f64,
    pub slab_thickness_mm: f64,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        SectionsConfig {
            column: RectangularSection::new(500.0, 500.0),
            primary_beam: RectangularSection::new(300.0, 600.0),
            secondary_beam: RectangularSection::new(250.0, 500.0),
            coupling_beam: RectangularSection::new(300.0, 800.0),
            wall_thickness_mm: 300.0,
            slab_thickness_mm: 200.0,
        }
    }
}

impl SectionsConfig {
    pub fn validate(&self) -> ModelResult<()> {
        self.column.validate("column")?;
        self.primary_beam.validate("primary_beam")?;
        self.secondary_beam.validate("secondary_beam")?;
        self.coupling_beam.validate("coupling_beam")?;
        if !(self.wall_thickness_mm > 0.0) {
            return Err(ModelError::invalid_section("core_wall", "thickness_mm", self.wall_thickness_mm));
        }
        if !(self.slab_thickness_mm > 0.0) {
            return Err(ModelError::invalid_section("slab", "thickness_mm", self.slab_thickness_mm));
        }
        Ok(())
    }
}

/// Area loads on floors (kPa, unfactored) and the gravity combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityLoadsConfig {
    pub superimposed_dead_kpa: f64,
    pub live_kpa: f64,
    pub combination: GravityCombination,
}

impl Default for GravityLoadsConfig {
    fn default() -> Self {
        GravityLoadsConfig {
            superimposed_dead_kpa: 1.5,
            live_kpa: 3.0,
            combination: GravityCombination::default(),
        }
    }
}

impl GravityLoadsConfig {
    pub fn validate(&self) -> ModelResult<()> {
        for (field, value) in [
            ("loads.superimposed_dead_kpa", self.superimposed_dead_kpa),
            ("loads.live_kpa", self.live_kpa),
        ] {
            if value < 0.0 || !value.is_finite() {
                return Err(ModelError::invalid_input(field, value.to_string(), "Area load cannot be negative"));
            }
        }
        self.combination.validate()
    }
}

/// Static wind shears
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    /// Total base shear along X (kN)
    pub base_shear_x: f64,
    /// Total base shear along Y (kN)
    pub base_shear_y: f64,
    /// Explicit story forces along X, floor 1 first; overrides `base_shear_x`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_forces_x: Option<Vec<f64>>,
    /// Explicit story forces along Y, floor 1 first; overrides `base_shear_y`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_forces_y: Option<Vec<f64>>,
    /// Accidental eccentricity as a fraction of the plan dimension
    pub accidental_eccentricity: f64,
}

impl Default for WindConfig {
    fn default() -> Self {
        WindConfig {
            base_shear_x: 0.0,
            base_shear_y: 0.0,
            floor_forces_x: None,
            floor_forces_y: None,
            accidental_eccentricity: 0.05,
        }
    }
}

impl WindConfig {
    pub fn validate(&self, floors: usize) -> ModelResult<()> {
        for (field, forces) in [("wind.floor_forces_x", &self.floor_forces_x), ("wind.floor_forces_y", &self.floor_forces_y)] {
            if let Some(forces) = forces {
                if forces.len() != floors {
                    return Err(ModelError::invalid_input(
                        field,
                        forces.len().to_string(),
                        format!("Expected one force per floor ({floors})"),
                    ));
                }
            }
        }
        if !(0.0..=0.5).contains(&self.accidental_eccentricity) {
            return Err(ModelError::invalid_input(
                "wind.accidental_eccentricity",
                self.accidental_eccentricity.to_string(),
                "Accidental eccentricity ratio must be between 0 and 0.5",
            ));
        }
        Ok(())
    }
}

/// Core wall and wind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LateralConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_wall: Option<CoreWallGeometry>,
    pub wind: WindConfig,
}

/// Everything about the building itself
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingDescription {
    pub geometry: GeometryConfig,
    pub materials: MaterialsConfig,
    pub sections: SectionsConfig,
    pub loads: GravityLoadsConfig,
    pub lateral: LateralConfig,
}

impl BuildingDescription {
    pub fn validate(&self) -> ModelResult<()> {
        self.geometry.validate()?;
        self.materials.validate()?;
        self.sections.validate()?;
        self.loads.validate()?;
        self.lateral.wind.validate(self.geometry.floors)
    }
}

// ============================================================================
// Build options
// ============================================================================

/// Axis secondary beams span along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SecondaryBeamDirection {
    /// Beams run along X and split each bay into strips stacked in Y
    X,
    /// Beams run along Y and split each bay into strips side by side in X
    #[default]
    Y,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    pub include_core_wall: bool,
    pub include_slabs: bool,
    pub apply_gravity_loads: bool,
    pub apply_wind_loads: bool,
    pub trim_beams_at_core: bool,
    pub omit_columns_near_core: bool,
    /// Grid points this close to the core outline are omitted (m)
    pub column_omission_clearance: f64,
    /// Column ids to omit regardless of the core, e.g. "B-2"
    pub omitted_columns: Vec<String>,
    pub secondary_beams_per_bay: usize,
    pub secondary_beam_direction: SecondaryBeamDirection,
    /// Multiplier on the base shell mesh divisions
    pub shell_mesh_density: usize,
    pub shell_element_type: ShellElementType,
    /// Node merge tolerance (m)
    pub tolerance: f64,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            include_core_wall: true,
            include_slabs: true,
            apply_gravity_loads: true,
            apply_wind_loads: true,
            trim_beams_at_core: true,
            omit_columns_near_core: true,
            column_omission_clearance: 0.5,
            omitted_columns: Vec::new(),
            secondary_beams_per_bay: 0,
            secondary_beam_direction: SecondaryBeamDirection::default(),
            shell_mesh_density: 1,
            shell_element_type: ShellElementType::default(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl BuildOptions {
    /// Options for a bare frame: no core, slabs or lateral loads
    pub fn frame_only() -> Self {
        BuildOptions {
            include_core_wall: false,
            include_slabs: false,
            apply_wind_loads: false,
            trim_beams_at_core: false,
            omit_columns_near_core: false,
            ..BuildOptions::default()
        }
    }

    pub fn validate(&self) -> ModelResult<()> {
        if !(self.tolerance > 0.0) {
            return Err(ModelError::invalid_input(
                "tolerance",
                self.tolerance.to_string(),
                "Tolerance must be positive",
            ));
        }
        if self.shell_mesh_density == 0 {
            return Err(ModelError::invalid_input("shell_mesh_density", "0", "Must be at least 1"));
        }
        if self.column_omission_clearance < 0.0 {
            return Err(ModelError::invalid_input(
                "column_omission_clearance",
                self.column_omission_clearance.to_string(),
                "Clearance cannot be negative",
            ));
        }
        // Secondary beam ends must land on primary beam sub-nodes
        let strips = self.secondary_beams_per_bay + 1;
        if SUBDIVISIONS % strips != 0 {
            return Err(ModelError::invalid_input(
                "secondary_beams_per_bay",
                self.secondary_beams_per_bay.to_string(),
                format!("Bay strips ({strips}) must divide the {SUBDIVISIONS} primary beam subdivisions"),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Input file
// ============================================================================

/// Complete build input as read from JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildInput {
    pub building: BuildingDescription,
    pub options: BuildOptions,
}

impl BuildInput {
    pub fn new(building: BuildingDescription, options: BuildOptions) -> Self {
        BuildInput { building, options }
    }

    pub fn validate(&self) -> ModelResult<()> {
        self.building.validate()?;
        self.options.validate()
    }

    pub fn from_json_str(json: &str) -> ModelResult<Self> {
        serde_json::from_str(json).map_err(|e| ModelError::input_error("<string>", e.to_string()))
    }

    pub fn from_path(path: &Path) -> ModelResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ModelError::input_error(path.display().to_string(), e.to_string()))?;
        serde_json::from_str(&contents)
            .map_err(|e| ModelError::input_error(path.display().to_string(), e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_wall::CoreWallConfig;

    #[test]
    fn test_defaults_validate() {
        BuildInput::default().validate().unwrap();
        BuildOptions::frame_only().validate().unwrap();
    }

    #[test]
    fn test_floor_elevations() {
        let geometry = GeometryConfig { floors: 3, story_height: 3.0, ..Default::default() };
        assert_eq!(geometry.floor_elevations(), vec![0.0, 3.0, 6.0, 9.0]);
    }

    #[test]
    fn test_secondary_beam_count_must_divide_subdivisions() {
        for (count, ok) in [(0, true), (1, true), (2, true), (3, false), (4, false), (5, true)] {
            let options = BuildOptions { secondary_beams_per_bay: count, ..Default::default() };
            assert_eq!(options.validate().is_ok(), ok, "count {count}");
        }
    }

    #[test]
    fn test_invalid_geometry() {
        let mut building = BuildingDescription::default();
        building.geometry.story_height = 0.0;
        let err = building.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let mut building = BuildingDescription::default();
        building.sections.primary_beam.depth_mm = -600.0;
        assert_eq!(building.validate().unwrap_err().error_code(), "INVALID_SECTION");
    }

    #[test]
    fn test_wind_floor_forces_length() {
        let mut building = BuildingDescription::default();
        building.lateral.wind.floor_forces_x = Some(vec![10.0]);
        assert!(building.validate().is_err());
        building.lateral.wind.floor_forces_x = Some(vec![10.0, 20.0]);
        building.validate().unwrap();
    }

    #[test]
    fn test_json_with_core() {
        let input = BuildInput::from_json_str(
            r#"{
                "building": {
                    "lateral": {
                        "core_wall": {
                            "config": "TWO_C_FACING",
                            "length_x": 6.0,
                            "length_y": 4.0,
                            "opening_width": 2.0
                        },
                        "wind": { "base_shear_x": 300.0 }
                    }
                },
                "options": { "secondary_beams_per_bay": 1, "shell_element_type": "Triangle" }
            }"#,
        )
        .unwrap();
        let core = input.building.lateral.core_wall.unwrap();
        assert_eq!(core.config, CoreWallConfig::TwoCFacing);
        assert_eq!(core.origin, None);
        assert_eq!(input.building.lateral.wind.accidental_eccentricity, 0.05);
        assert_eq!(input.options.shell_element_type, ShellElementType::Triangle);
        input.validate().unwrap();
    }

    #[test]
    fn test_bad_json_is_input_error() {
        let err = BuildInput::from_json_str("{ not json").unwrap_err();
        assert_eq!(err.error_code(), "INPUT_ERROR");
        let err = BuildInput::from_path(Path::new("/nonexistent/building.json")).unwrap_err();
        assert_eq!(err.error_code(), "INPUT_ERROR");
    }
}
