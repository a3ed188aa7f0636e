//! # Core Wall Layouts
//!
//! A core wall is one of a closed set of plan shapes. Each shape has its own
//! extractor that turns the resolved [`CoreLayout`] into plan wall segments
//! (split at every junction, so shared edges are segment endpoints) and the
//! coupling-beam spans across its openings.
//!
//! ## Plan conventions
//!
//! All layouts live in the rectangle `origin .. origin + (length_x, length_y)`.
//! That rectangle is also the core outline used for beam trimming, column
//! omission and the slab void.
//!
//! ```text
//! ISection          TwoCFacing        TwoCBackToBack    TubeCenterOpening  TubeSideOpening
//! ───┬───           ──┐   ┌──         ──┐   ┌──         ┌─────┐            ┌─────┐
//!    │                │   │             │   │           │     │            │     │
//! ───┴───           ──┘   └──         ──┘   └──         └─┘ └─┘            └─────┘ (gap in right wall)
//! ```

pub mod i_section;
pub mod tube;
pub mod two_c;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ModelError, ModelResult};
use crate::geometry::polygon::{distance_to_segment, segment_intersection, BOUNDARY_TOLERANCE};
use crate::geometry::{plan_direction, Point2, Polygon, MIN_SEGMENT_LENGTH};
use crate::mesh::{Opening, WallPanel};

/// Supported core wall plan shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CoreWallConfig {
    /// Two flanges along X joined by a central web along Y
    ISection,
    /// Two C shapes whose open sides face each other across the opening
    TwoCFacing,
    /// Two C shapes whose webs face each other across the opening
    TwoCBackToBack,
    /// Closed tube with an opening centred in the bottom (min-y) wall
    TubeCenterOpening,
    /// Closed tube with an opening centred in the right (max-x) wall
    TubeSideOpening,
}

impl CoreWallConfig {
    pub const ALL: [CoreWallConfig; 5] = [
        CoreWallConfig::ISection,
        CoreWallConfig::TwoCFacing,
        CoreWallConfig::TwoCBackToBack,
        CoreWallConfig::TubeCenterOpening,
        CoreWallConfig::TubeSideOpening,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CoreWallConfig::ISection => "I_SECTION",
            CoreWallConfig::TwoCFacing => "TWO_C_FACING",
            CoreWallConfig::TwoCBackToBack => "TWO_C_BACK_TO_BACK",
            CoreWallConfig::TubeCenterOpening => "TUBE_CENTER_OPENING",
            CoreWallConfig::TubeSideOpening => "TUBE_SIDE_OPENING",
        }
    }

    /// Whether the shape has an opening bridged by coupling beams
    pub fn has_opening(&self) -> bool {
        !matches!(self, CoreWallConfig::ISection)
    }
}

impl fmt::Display for CoreWallConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CoreWallConfig {
    type Err = ModelError;

    /// Accepts the canonical names case-insensitively, with `-` or `_`
    /// separators or none ("TubeSideOpening", "tube-side-opening").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        CoreWallConfig::ALL
            .into_iter()
            .find(|config| config.name().replace('_', "") == normalized)
            .ok_or_else(|| {
                ModelError::unsupported_core_wall(
                    s,
                    format!(
                        "Expected one of {}",
                        CoreWallConfig::ALL.map(|c| c.name()).join(", ")
                    ),
                )
            })
    }
}

impl TryFrom<String> for CoreWallConfig {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CoreWallConfig> for String {
    fn from(config: CoreWallConfig) -> Self {
        config.name().to_string()
    }
}

/// Core wall input geometry (m)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoreWallGeometry {
    pub config: CoreWallConfig,
    /// Overall plan extent along X
    pub length_x: f64,
    /// Overall plan extent along Y
    pub length_y: f64,
    /// Clear width of the opening bridged by coupling beams
    #[serde(default)]
    pub opening_width: f64,
    /// Min-x, min-y corner; centred in the building plan when omitted
    #[serde(default)]
    pub origin: Option<Point2>,
}

impl CoreWallGeometry {
    pub fn new(config: CoreWallConfig, length_x: f64, length_y: f64, opening_width: f64) -> Self {
        CoreWallGeometry {
            config,
            length_x,
            length_y,
            opening_width,
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: Point2) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Resolve the layout inside a building plan of the given size
    pub fn layout(&self, plan_width: f64, plan_depth: f64) -> ModelResult<CoreLayout> {
        let origin = self.origin.unwrap_or_else(|| {
            Point2::new((plan_width - self.length_x) / 2.0, (plan_depth - self.length_y) / 2.0)
        });
        let layout = CoreLayout {
            config: self.config,
            origin,
            length_x: self.length_x,
            length_y: self.length_y,
            opening_width: self.opening_width,
        };
        layout.validate()?;
        Ok(layout)
    }
}

/// Core geometry placed in the building plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoreLayout {
    pub config: CoreWallConfig,
    pub origin: Point2,
    pub length_x: f64,
    pub length_y: f64,
    pub opening_width: f64,
}

/// Wall centreline segment in plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanWall {
    pub label: String,
    pub start: Point2,
    pub end: Point2,
}

impl PlanWall {
    pub(crate) fn new(label: &str, start: Point2, end: Point2) -> Self {
        PlanWall {
            label: label.to_string(),
            start,
            end,
        }
    }
}

/// Coupling beam line between two pier ends, repeated at every floor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CouplingSpan {
    pub start: Point2,
    pub end: Point2,
}

impl CouplingSpan {
    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Local x-z plane vector of a horizontal member along this span, chosen
    /// so local y points up
    pub fn vecxz(&self) -> Option<[f64; 3]> {
        plan_direction(&self.start, &self.end).map(|(dx, dy)| [dy, -dx, 0.0])
    }
}

/// Output of a layout extractor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoreWallShape {
    pub walls: Vec<PlanWall>,
    pub coupling_spans: Vec<CouplingSpan>,
}

impl CoreWallShape {
    /// Wall centrelines followed by coupling spans
    fn lines(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        self.walls
            .iter()
            .map(|w| (w.start, w.end))
            .chain(self.coupling_spans.iter().map(|s| (s.start, s.end)))
    }

    /// First wall or coupling span met walking from `entry` along the unit
    /// `direction` for at most `reach` metres. An entry already on a line is
    /// its own framing point.
    pub fn framing_point(&self, entry: Point2, direction: (f64, f64), reach: f64) -> Option<Point2> {
        let far = Point2::new(entry.x + direction.0 * reach, entry.y + direction.1 * reach);
        let mut nearest: Option<f64> = None;
        for (a, b) in self.lines() {
            let hit = if distance_to_segment(&entry, &a, &b) <= BOUNDARY_TOLERANCE {
                Some(0.0)
            } else {
                segment_intersection(&entry, &far, &a, &b)
            };
            if let Some(t) = hit {
                nearest = Some(nearest.map_or(t, |n| n.min(t)));
            }
        }
        nearest.map(|t| entry.lerp(&far, t))
    }
}

impl CoreLayout {
    pub fn x_min(&self) -> f64 {
        self.origin.x
    }

    pub fn x_max(&self) -> f64 {
        self.origin.x + self.length_x
    }

    pub fn y_min(&self) -> f64 {
        self.origin.y
    }

    pub fn y_max(&self) -> f64 {
        self.origin.y + self.length_y
    }

    pub fn x_mid(&self) -> f64 {
        self.origin.x + self.length_x / 2.0
    }

    pub fn y_mid(&self) -> f64 {
        self.origin.y + self.length_y / 2.0
    }

    /// Core outline polygon
    pub fn outline(&self) -> Polygon {
        Polygon::rectangle(self.origin, self.length_x, self.length_y)
    }

    /// Slab void covering the core
    pub fn footprint(&self) -> Opening {
        Opening::rectangle(self.origin, self.length_x, self.length_y)
    }

    /// Check the geometry can be realised by the configured shape
    pub fn validate(&self) -> ModelResult<()> {
        if self.length_x < MIN_SEGMENT_LENGTH || self.length_y < MIN_SEGMENT_LENGTH {
            return Err(ModelError::unsupported_core_wall(
                self.config.name(),
                format!("Core plan {} x {} m is degenerate", self.length_x, self.length_y),
            ));
        }
        if !self.config.has_opening() {
            return Ok(());
        }
        let available = match self.config {
            CoreWallConfig::TubeSideOpening => self.length_y,
            _ => self.length_x,
        };
        if self.opening_width < MIN_SEGMENT_LENGTH {
            return Err(ModelError::unsupported_core_wall(
                self.config.name(),
                "Configuration requires a positive opening width",
            ));
        }
        if self.opening_width > available - 2.0 * MIN_SEGMENT_LENGTH {
            return Err(ModelError::unsupported_core_wall(
                self.config.name(),
                format!(
                    "Opening width {} m leaves no wall in a {} m core side",
                    self.opening_width, available
                ),
            ));
        }
        Ok(())
    }

    /// Plan walls and coupling spans for the configured shape
    pub fn shape(&self) -> CoreWallShape {
        match self.config {
            CoreWallConfig::ISection => i_section::extract(self),
            CoreWallConfig::TwoCFacing => two_c::extract_facing(self),
            CoreWallConfig::TwoCBackToBack => two_c::extract_back_to_back(self),
            CoreWallConfig::TubeCenterOpening => tube::extract_center_opening(self),
            CoreWallConfig::TubeSideOpening => tube::extract_side_opening(self),
        }
    }

    /// Full-height wall panels in global coordinates
    pub fn extract_panels(&self, thickness: f64, height: f64) -> Vec<WallPanel> {
        self.shape()
            .walls
            .into_iter()
            .map(|wall| {
                WallPanel::new(
                    format!("{}/{}", self.config.name(), wall.label),
                    wall.start,
                    wall.end,
                    thickness,
                    height,
                )
            })
            .collect()
    }

    pub fn coupling_spans(&self) -> Vec<CouplingSpan> {
        self.shape().coupling_spans
    }
}
