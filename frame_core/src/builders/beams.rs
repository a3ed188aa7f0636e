//! # Beams
//!
//! Primary beams run along every gridline in both plan directions at every
//! floor above the base, one member per bay. Secondary beams split each bay
//! into equal strips. Coupling beams bridge core-wall openings.
//!
//! Primary and secondary beams are clipped against the core outline when a
//! core is given. A clipped end is then carried inward along the beam to the
//! first wall or coupling span of the real layout, since not every face of
//! the outline carries a wall (the I-section has none on its x faces). That
//! point is a moment connection; it is recorded so the wall mesh places a
//! node there, and a coupling beam is split there when it lands in an opening
//! between sub-nodes.

use tracing::{debug, info, warn};

use super::{beam_lineage, coupling_lineage, horizontal_vecxz, LineMember, MemberProperties, NodeGrid, SUBDIVISIONS};
use crate::config::SecondaryBeamDirection;
use crate::context::BuildContext;
use crate::core_wall::{CoreLayout, CoreWallShape, CouplingSpan};
use crate::errors::{ModelError, ModelResult};
use crate::geometry::polygon::{distance_to_segment, BOUNDARY_TOLERANCE};
use crate::geometry::{plan_direction, trim_segment, BeamSegment, EndCondition, Point2, Polygon};
use crate::materials::RectangularSection;
use crate::model::ElementKind;
use crate::tags::{Tag, TagRange};
use crate::units::{KnPerCubicMeter, KnPerMeter};

/// Factored self-weight inputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelfWeight {
    pub gamma_g: f64,
    pub unit_weight: KnPerCubicMeter,
}

impl SelfWeight {
    /// γ_G · ρ · b · h
    pub fn line_load(&self, section: &RectangularSection) -> KnPerMeter {
        self.unit_weight.over_area(section.area_m2()) * self.gamma_g
    }
}

/// Core outline for clipping plus the walls and spans beams frame into
struct CoreTarget {
    outline: Polygon,
    shape: CoreWallShape,
    /// Longer than any chord through the core
    reach: f64,
}

impl CoreTarget {
    fn new(core: &CoreLayout) -> Self {
        CoreTarget {
            outline: core.outline(),
            shape: core.shape(),
            reach: core.length_x + core.length_y,
        }
    }

    /// Where a beam clipped at `entry` and heading along `direction` meets
    /// the core. The stretch walked must lie inside the outline, so a beam
    /// running along a bare face is not carried onto a corner.
    fn framing_point(&self, entry: Point2, direction: (f64, f64)) -> Option<Point2> {
        let point = self.shape.framing_point(entry, direction, self.reach)?;
        let inside = entry.distance_to(&point) <= BOUNDARY_TOLERANCE
            || self.outline.strictly_contains(&entry.lerp(&point, 0.5));
        inside.then_some(point)
    }
}

/// Section properties and dimensions for one beam family
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamFamily {
    pub properties: MemberProperties,
    pub dimensions: RectangularSection,
}

pub struct BeamBuilder<'a> {
    grid: &'a NodeGrid,
    primary: BeamFamily,
    secondary: BeamFamily,
    coupling: BeamFamily,
    self_weight: Option<SelfWeight>,
    trim_requested: bool,
    warned_missing_core: bool,
    /// Plan points where clipped beams meet the core
    connections: Vec<Point2>,
}

impl<'a> BeamBuilder<'a> {
    pub fn new(grid: &'a NodeGrid, primary: BeamFamily, secondary: BeamFamily, coupling: BeamFamily) -> Self {
        BeamBuilder {
            grid,
            primary,
            secondary,
            coupling,
            self_weight: None,
            trim_requested: false,
            warned_missing_core: false,
            connections: Vec::new(),
        }
    }

    pub fn with_self_weight(mut self, self_weight: SelfWeight) -> Self {
        self.self_weight = Some(self_weight);
        self
    }

    /// Clip primary and secondary beams at the core outline
    pub fn with_trimming(mut self, trim: bool) -> Self {
        self.trim_requested = trim;
        self
    }

    /// Plan points of moment connections to the core
    pub fn core_connections(&self) -> &[Point2] {
        &self.connections
    }

    fn core_target(&mut self, core: Option<&CoreLayout>) -> Option<CoreTarget> {
        if !self.trim_requested {
            return None;
        }
        if core.is_none() && !self.warned_missing_core {
            warn!("Beam trimming requested but no core wall is configured; beams are not trimmed");
            self.warned_missing_core = true;
        }
        core.map(CoreTarget::new)
    }

    /// Gridline beams in X and Y at every floor; returns the next free frame element tag
    pub fn create_primary_beams(&mut self, ctx: &mut BuildContext, core: Option<&CoreLayout>) -> ModelResult<Tag> {
        let target = self.core_target(core);
        let target = target.as_ref();
        let grid = self.grid;
        let mut members = 0;
        for floor in 1..=grid.floors() {
            for iy in 0..grid.y_lines.len() {
                for ix in 0..grid.bays_x() {
                    let (a, b) = (grid.plan_point(ix, iy), grid.plan_point(ix + 1, iy));
                    members += self.place(ctx, a, b, floor, target, ElementKind::ElasticBeam, self.primary)?;
                }
            }
            for ix in 0..grid.x_lines.len() {
                for iy in 0..grid.bays_y() {
                    let (a, b) = (grid.plan_point(ix, iy), grid.plan_point(ix, iy + 1));
                    members += self.place(ctx, a, b, floor, target, ElementKind::ElasticBeam, self.primary)?;
                }
            }
        }
        info!(members, "Built primary beams");
        Ok(ctx.tags.peek_element(TagRange::Frame))
    }

    /// `per_bay` beams inside every bay, spanning along `direction`
    pub fn create_secondary_beams(
        &mut self,
        ctx: &mut BuildContext,
        core: Option<&CoreLayout>,
        per_bay: usize,
        direction: SecondaryBeamDirection,
    ) -> ModelResult<Tag> {
        if per_bay == 0 {
            return Ok(ctx.tags.peek_element(TagRange::Frame));
        }
        if SUBDIVISIONS % (per_bay + 1) != 0 {
            return Err(ModelError::invalid_input(
                "secondary_beams_per_bay",
                per_bay.to_string(),
                format!("Bay strips must divide the {SUBDIVISIONS} primary beam subdivisions"),
            ));
        }
        let target = self.core_target(core);
        let target = target.as_ref();
        let grid = self.grid;
        let strips = (per_bay + 1) as f64;
        let mut members = 0;
        for floor in 1..=grid.floors() {
            for by in 0..grid.bays_y() {
                for bx in 0..grid.bays_x() {
                    let (x0, x1) = (grid.x_lines[bx], grid.x_lines[bx + 1]);
                    let (y0, y1) = (grid.y_lines[by], grid.y_lines[by + 1]);
                    for k in 1..=per_bay {
                        let t = k as f64 / strips;
                        let (a, b) = match direction {
                            SecondaryBeamDirection::Y => {
                                let x = x0 + (x1 - x0) * t;
                                (Point2::new(x, y0), Point2::new(x, y1))
                            }
                            SecondaryBeamDirection::X => {
                                let y = y0 + (y1 - y0) * t;
                                (Point2::new(x0, y), Point2::new(x1, y))
                            }
                        };
                        members += self.place(ctx, a, b, floor, target, ElementKind::SecondaryBeam, self.secondary)?;
                    }
                }
            }
        }
        info!(members, per_bay, ?direction, "Built secondary beams");
        Ok(ctx.tags.peek_element(TagRange::Frame))
    }

    /// One coupling beam per core opening per floor; returns the next free
    /// coupling-beam element tag. Call after the primary and secondary beams
    /// so that beams framing into an opening are known.
    pub fn create_coupling_beams(&mut self, ctx: &mut BuildContext, core: Option<&CoreLayout>) -> ModelResult<Tag> {
        let Some(core) = core else {
            return Ok(ctx.tags.peek_element(TagRange::CouplingBeam));
        };
        let weight = self.self_weight.map(|sw| sw.line_load(&self.coupling.dimensions).value());
        let mut spans = Vec::new();
        for span in core.coupling_spans() {
            let vecxz = span.vecxz().ok_or_else(|| {
                ModelError::unsupported_core_wall(core.config.name(), "Coupling beam span has no length")
            })?;
            let pieces = self.coupling_pieces(&span);
            if pieces.len() > 1 {
                debug!(?span, pieces = pieces.len(), "Coupling beam split at framing beams");
            }
            spans.push((vecxz, pieces));
        }

        let mut members = 0;
        for floor in 1..=self.grid.floors() {
            let z = self.grid.elevations[floor];
            for (vecxz, pieces) in &spans {
                for (start, end) in pieces {
                    LineMember {
                        start: start.at(z),
                        end: end.at(z),
                        floor_level: floor,
                        range: TagRange::CouplingBeam,
                        kind: ElementKind::CouplingBeam,
                        properties: self.coupling.properties,
                        vecxz: *vecxz,
                        lineage: coupling_lineage,
                        self_weight: weight,
                    }
                    .build(ctx)?;
                    members += 1;
                }
            }
        }
        info!(members, config = %core.config, "Built coupling beams");
        Ok(ctx.tags.peek_element(TagRange::CouplingBeam))
    }

    /// Pieces of a coupling span. The span stays whole when every connection
    /// inside it lands on one of its sub-nodes; otherwise it is split at the
    /// connections.
    fn coupling_pieces(&self, span: &CouplingSpan) -> Vec<(Point2, Point2)> {
        let length = span.length();
        let mut stations: Vec<(f64, Point2)> = self
            .connections
            .iter()
            .filter(|p| distance_to_segment(p, &span.start, &span.end) <= BOUNDARY_TOLERANCE)
            .map(|p| (span.start.distance_to(p), *p))
            .filter(|(d, _)| *d > BOUNDARY_TOLERANCE && *d < length - BOUNDARY_TOLERANCE)
            .collect();
        stations.sort_by(|a, b| a.0.total_cmp(&b.0));
        stations.dedup_by(|b, a| (b.0 - a.0).abs() <= BOUNDARY_TOLERANCE);

        let step = length / SUBDIVISIONS as f64;
        let on_sub_node = |d: f64| ((d / step).round() * step - d).abs() <= BOUNDARY_TOLERANCE;
        if stations.iter().all(|(d, _)| on_sub_node(*d)) {
            return vec![(span.start, span.end)];
        }
        let mut points = vec![span.start];
        points.extend(stations.into_iter().map(|(_, p)| p));
        points.push(span.end);
        points.windows(2).map(|pair| (pair[0], pair[1])).collect()
    }

    /// Carry the clipped ends of `piece` inward along the beam to the first
    /// wall or coupling span. Ends that reach neither are left free.
    fn frame_into_core(&mut self, target: &CoreTarget, mut piece: BeamSegment) -> BeamSegment {
        if piece.start_condition == EndCondition::Moment {
            match self.connect(target, piece.start, piece.end) {
                Some(point) => piece.start = point,
                None => piece.start_condition = EndCondition::Free,
            }
        }
        if piece.end_condition == EndCondition::Moment {
            match self.connect(target, piece.end, piece.start) {
                Some(point) => piece.end = point,
                None => piece.end_condition = EndCondition::Free,
            }
        }
        piece
    }

    /// Framing point for the clipped end `entry` of a beam whose other end is `from`
    fn connect(&mut self, target: &CoreTarget, entry: Point2, from: Point2) -> Option<Point2> {
        let point = plan_direction(&from, &entry).and_then(|dir| target.framing_point(entry, dir));
        match point {
            Some(point) => self.connections.push(point),
            None => warn!(x = entry.x, y = entry.y, "Beam end on the core outline meets no wall"),
        }
        point
    }

    /// Clip a plan segment and build each surviving piece; returns pieces built
    #[allow(clippy::too_many_arguments)]
    fn place(
        &mut self,
        ctx: &mut BuildContext,
        a: Point2,
        b: Point2,
        floor: usize,
        target: Option<&CoreTarget>,
        kind: ElementKind,
        family: BeamFamily,
    ) -> ModelResult<usize> {
        let z = self.grid.elevations[floor];
        let Some(vecxz) = horizontal_vecxz(&a, &b) else {
            return Ok(0);
        };
        let weight = self.self_weight.map(|sw| sw.line_load(&family.dimensions).value());
        let mut pieces = trim_segment(a, b, target.map(|t| &t.outline));
        if pieces.is_empty() {
            debug!(?a, ?b, floor, "Beam lies inside core; skipped");
        }
        if let Some(target) = target {
            pieces = pieces.into_iter().map(|piece| self.frame_into_core(target, piece)).collect();
        }
        for piece in &pieces {
            LineMember {
                start: piece.start.at(z),
                end: piece.end.at(z),
                floor_level: floor,
                range: TagRange::Frame,
                kind,
                properties: family.properties,
                vecxz,
                lineage: beam_lineage,
                self_weight: weight,
            }
            .build(ctx)?;
        }
        Ok(pieces.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::grid::NodeGridBuilder;
    use crate::builders::PropertyTags;
    use crate::config::{BuildingDescription, SectionsConfig};
    use crate::core_wall::{CoreWallConfig, CoreWallGeometry};
    use crate::model::ElementLineage;
    use approx::assert_relative_eq;
    use std::collections::BTreeSet;

    struct Fixture {
        ctx: BuildContext,
        grid: NodeGrid,
        primary: BeamFamily,
        secondary: BeamFamily,
        coupling: BeamFamily,
    }

    fn fixture() -> Fixture {
        let building = BuildingDescription::default();
        let mut ctx = BuildContext::default();
        let props = PropertyTags::register(&mut ctx, &building).unwrap();
        let grid = NodeGridBuilder::new(&building.geometry, &BTreeSet::new()).build(&mut ctx).unwrap();
        let s = SectionsConfig::default();
        Fixture {
            ctx,
            grid,
            primary: BeamFamily { properties: props.primary_beam, dimensions: s.primary_beam },
            secondary: BeamFamily { properties: props.secondary_beam, dimensions: s.secondary_beam },
            coupling: BeamFamily { properties: props.coupling_beam, dimensions: s.coupling_beam },
        }
    }

    #[test]
    fn test_primary_beam_counts() {
        let mut f = fixture();
        let mut builder = BeamBuilder::new(&f.grid, f.primary, f.secondary, f.coupling);
        builder.create_primary_beams(&mut f.ctx, None).unwrap();
        // 2 floors x (3 lines x 2 bays) x 2 directions = 24 members
        assert_eq!(f.ctx.model.elements.len(), 24 * SUBDIVISIONS);
        assert!(f.ctx.model.uniform_loads.is_empty());
        // Ends reuse grid nodes: 27 grid nodes + 5 per member
        assert_eq!(f.ctx.model.nodes.len(), 27 + 24 * 5);
    }

    #[test]
    fn test_self_weight_per_sub_element() {
        let mut f = fixture();
        let mut builder = BeamBuilder::new(&f.grid, f.primary, f.secondary, f.coupling)
            .with_self_weight(SelfWeight { gamma_g: 1.4, unit_weight: KnPerCubicMeter(24.5) });
        builder.create_primary_beams(&mut f.ctx, None).unwrap();
        assert_eq!(f.ctx.model.uniform_loads.len(), 24 * SUBDIVISIONS);
        let w = f.ctx.model.uniform_loads[0].components[2];
        assert_relative_eq!(
            SelfWeight { gamma_g: 1.4, unit_weight: KnPerCubicMeter(24.5) }.line_load(&f.primary.dimensions).0,
            -w,
            epsilon = 1e-12
        );
        assert_relative_eq!(w, -1.4 * 24.5 * 0.3 * 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_trimming_at_core_records_connections() {
        let mut f = fixture();
        let core = CoreWallGeometry::new(CoreWallConfig::ISection, 2.0, 2.0, 0.0)
            .layout(12.0, 12.0)
            .unwrap();
        let outline = core.outline();
        let shape = core.shape();
        let mut builder = BeamBuilder::new(&f.grid, f.primary, f.secondary, f.coupling).with_trimming(true);
        builder.create_primary_beams(&mut f.ctx, Some(&core)).unwrap();

        // Core (5..7, 5..7) cuts the 4 bays touching the centre gridlines, per floor
        let connections = builder.core_connections();
        assert_eq!(connections.len(), 4 * 2);
        for p in connections {
            assert!(shape.walls.iter().any(|w| distance_to_segment(p, &w.start, &w.end) < 1e-9));
        }
        // The x faces carry no wall, so beams along y = 6 run on to the web
        let on_web = connections.iter().filter(|p| p.distance_to(&Point2::new(6.0, 6.0)) < 1e-9).count();
        assert_eq!(on_web, 2 * 2);
        for element in f.ctx.model.elements.values() {
            for tag in &element.nodes {
                let n = &f.ctx.model.nodes[tag];
                if outline.strictly_contains(&Point2::new(n.x, n.y)) {
                    assert!((n.x - 6.0).abs() < 1e-9 && (n.y - 6.0).abs() < 1e-9);
                }
            }
        }
    }

    fn kinds_at(ctx: &BuildContext, x: f64, y: f64, z: f64) -> Vec<ElementKind> {
        let Some(node) = ctx
            .model
            .nodes
            .values()
            .find(|n| (n.x - x).abs() < 1e-9 && (n.y - y).abs() < 1e-9 && (n.z - z).abs() < 1e-9)
        else {
            return Vec::new();
        };
        ctx.model
            .elements
            .values()
            .filter(|e| e.nodes.contains(&node.tag))
            .map(|e| e.kind)
            .collect()
    }

    #[test]
    fn test_off_centre_opening_splits_coupling_beam() {
        let mut f = fixture();
        // Opening 5.2..6.2 on the y = 4 and y = 8 faces; gridline x = 6 lands inside it
        let core = CoreWallGeometry::new(CoreWallConfig::TwoCFacing, 4.0, 4.0, 1.0)
            .with_origin(Point2::new(3.7, 4.0))
            .layout(12.0, 12.0)
            .unwrap();
        let mut builder = BeamBuilder::new(&f.grid, f.primary, f.secondary, f.coupling).with_trimming(true);
        builder.create_primary_beams(&mut f.ctx, Some(&core)).unwrap();
        builder.create_coupling_beams(&mut f.ctx, Some(&core)).unwrap();

        // 2 spans x 2 pieces x 2 floors
        assert_eq!(
            f.ctx.model.elements_of_kind(ElementKind::CouplingBeam).count(),
            2 * 2 * 2 * SUBDIVISIONS
        );
        for (y, z) in [(4.0, 3.5), (8.0, 3.5), (4.0, 7.0), (8.0, 7.0)] {
            let kinds = kinds_at(&f.ctx, 6.0, y, z);
            assert!(kinds.contains(&ElementKind::ElasticBeam), "({y}, {z})");
            assert!(kinds.contains(&ElementKind::CouplingBeam), "({y}, {z})");
        }
    }

    #[test]
    fn test_centred_opening_keeps_coupling_beam_whole() {
        let mut f = fixture();
        // Opening 5.5..6.5; x = 6 is the middle sub-node of the coupling beam
        let core = CoreWallGeometry::new(CoreWallConfig::TubeCenterOpening, 4.0, 4.0, 1.0)
            .layout(12.0, 12.0)
            .unwrap();
        let mut builder = BeamBuilder::new(&f.grid, f.primary, f.secondary, f.coupling).with_trimming(true);
        builder.create_primary_beams(&mut f.ctx, Some(&core)).unwrap();
        builder.create_coupling_beams(&mut f.ctx, Some(&core)).unwrap();
        assert_eq!(f.ctx.model.elements_of_kind(ElementKind::CouplingBeam).count(), 2 * SUBDIVISIONS);
        let kinds = kinds_at(&f.ctx, 6.0, 4.0, 3.5);
        assert!(kinds.contains(&ElementKind::ElasticBeam));
        assert!(kinds.contains(&ElementKind::CouplingBeam));
    }

    #[test]
    fn test_trim_without_core_still_builds() {
        let mut f = fixture();
        let mut builder = BeamBuilder::new(&f.grid, f.primary, f.secondary, f.coupling).with_trimming(true);
        builder.create_primary_beams(&mut f.ctx, None).unwrap();
        builder.create_secondary_beams(&mut f.ctx, None, 1, SecondaryBeamDirection::Y).unwrap();
        assert!(builder.warned_missing_core);
        assert_eq!(f.ctx.model.elements_of_kind(ElementKind::SecondaryBeam).count(), 2 * 4 * SUBDIVISIONS);
    }

    #[test]
    fn test_secondary_beams_land_on_primary_nodes() {
        let mut f = fixture();
        let mut builder = BeamBuilder::new(&f.grid, f.primary, f.secondary, f.coupling);
        builder.create_primary_beams(&mut f.ctx, None).unwrap();
        let before = f.ctx.model.nodes.len();
        builder.create_secondary_beams(&mut f.ctx, None, 2, SecondaryBeamDirection::X).unwrap();
        // Only intermediate nodes are new: 2 floors x 4 bays x 2 beams x 5
        assert_eq!(f.ctx.model.nodes.len(), before + 2 * 4 * 2 * 5);
        let err = builder.create_secondary_beams(&mut f.ctx, None, 3, SecondaryBeamDirection::X).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_coupling_beams_use_reserved_range() {
        let mut f = fixture();
        let core = CoreWallGeometry::new(CoreWallConfig::TubeSideOpening, 4.0, 4.0, 1.2)
            .layout(12.0, 12.0)
            .unwrap();
        let mut builder = BeamBuilder::new(&f.grid, f.primary, f.secondary, f.coupling);
        let next = builder.create_coupling_beams(&mut f.ctx, Some(&core)).unwrap();
        assert_eq!(next, TagRange::CouplingBeam.base() + 2 * SUBDIVISIONS as Tag);
        let coupling: Vec<_> = f.ctx.model.elements_of_kind(ElementKind::CouplingBeam).collect();
        assert_eq!(coupling.len(), 2 * SUBDIVISIONS);
        for el in &coupling {
            assert!(TagRange::CouplingBeam.contains(el.tag));
            assert!(el.is_coupling_beam());
            assert_eq!(el.vecxz, Some([1.0, 0.0, 0.0]));
            assert!(matches!(el.lineage, ElementLineage::CouplingBeamSegment { .. }));
        }
    }
}
