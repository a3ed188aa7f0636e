//! Elements, their kinds, and subdivision lineage.
//!
//! Every primary member (column story, beam, coupling beam) is emitted as a
//! chain of sub-elements. [`ElementLineage`] records which member a
//! sub-element came from and where it sits in the chain, so force diagrams
//! can be stitched back together after analysis.
//!
//! Consumers that expect the flat metadata keys (`parent_beam_id`,
//! `sub_element_index`, `coupling_beam`, `vecxz`, ...) read them through
//! [`Element::metadata`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::tags::Tag;

/// Element formulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementKind {
    /// Elastic beam-column (columns and primary beams)
    ElasticBeam,
    /// Elastic beam-column used for secondary beams
    SecondaryBeam,
    /// Elastic beam-column spanning a core-wall opening
    CouplingBeam,
    /// 4-node shell
    ShellQuad,
    /// 3-node shell
    ShellTri,
}

impl ElementKind {
    pub const ALL: [ElementKind; 5] = [
        ElementKind::ElasticBeam,
        ElementKind::SecondaryBeam,
        ElementKind::CouplingBeam,
        ElementKind::ShellQuad,
        ElementKind::ShellTri,
    ];

    /// Number of nodes the formulation connects
    pub fn node_count(&self) -> usize {
        match self {
            ElementKind::ElasticBeam | ElementKind::SecondaryBeam | ElementKind::CouplingBeam => 2,
            ElementKind::ShellQuad => 4,
            ElementKind::ShellTri => 3,
        }
    }

    pub fn is_line(&self) -> bool {
        self.node_count() == 2
    }

    pub fn is_shell(&self) -> bool {
        !self.is_line()
    }

    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::ElasticBeam => "ElasticBeam",
            ElementKind::SecondaryBeam => "SecondaryBeam",
            ElementKind::CouplingBeam => "CouplingBeam",
            ElementKind::ShellQuad => "ShellQuad",
            ElementKind::ShellTri => "ShellTri",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Where an element came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "lineage")]
pub enum ElementLineage {
    /// Not part of a subdivided member (shells)
    #[default]
    Plain,
    ColumnSegment {
        parent_column_id: u32,
        sub_element_index: usize,
    },
    BeamSegment {
        parent_beam_id: u32,
        sub_element_index: usize,
    },
    CouplingBeamSegment {
        parent_coupling_beam_id: u32,
        sub_element_index: usize,
    },
}

impl ElementLineage {
    /// (parent id, index within parent) for subdivided members
    pub fn parent(&self) -> Option<(u32, usize)> {
        match *self {
            ElementLineage::Plain => None,
            ElementLineage::ColumnSegment { parent_column_id, sub_element_index } => {
                Some((parent_column_id, sub_element_index))
            }
            ElementLineage::BeamSegment { parent_beam_id, sub_element_index } => {
                Some((parent_beam_id, sub_element_index))
            }
            ElementLineage::CouplingBeamSegment { parent_coupling_beam_id, sub_element_index } => {
                Some((parent_coupling_beam_id, sub_element_index))
            }
        }
    }
}

/// Model element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag: Tag,
    pub kind: ElementKind,
    /// Connectivity; shells are counter-clockwise about their positive normal
    pub nodes: Vec<Tag>,
    pub material: Tag,
    pub section: Option<Tag>,
    pub lineage: ElementLineage,
    /// Vector in the local x-z plane for line elements
    pub vecxz: Option<[f64; 3]>,
}

impl Element {
    /// Line element with a local-axis vector
    pub fn line(
        tag: Tag,
        kind: ElementKind,
        nodes: [Tag; 2],
        material: Tag,
        section: Tag,
        vecxz: [f64; 3],
        lineage: ElementLineage,
    ) -> Self {
        Element {
            tag,
            kind,
            nodes: nodes.to_vec(),
            material,
            section: Some(section),
            lineage,
            vecxz: Some(vecxz),
        }
    }

    /// Shell element (quad or triangle, chosen by node count)
    pub fn shell(tag: Tag, nodes: Vec<Tag>, material: Tag, section: Tag) -> Self {
        let kind = if nodes.len() == 3 {
            ElementKind::ShellTri
        } else {
            ElementKind::ShellQuad
        };
        Element {
            tag,
            kind,
            nodes,
            material,
            section: Some(section),
            lineage: ElementLineage::Plain,
            vecxz: None,
        }
    }

    pub fn is_coupling_beam(&self) -> bool {
        matches!(self.lineage, ElementLineage::CouplingBeamSegment { .. })
    }

    /// Flat key/value view consumed by visualization and design checks
    pub fn metadata(&self) -> BTreeMap<&'static str, Value> {
        let mut meta = BTreeMap::new();
        match self.lineage {
            ElementLineage::Plain => {}
            ElementLineage::ColumnSegment { parent_column_id, sub_element_index } => {
                meta.insert("parent_column_id", json!(parent_column_id));
                meta.insert("sub_element_index", json!(sub_element_index));
            }
            ElementLineage::BeamSegment { parent_beam_id, sub_element_index } => {
                meta.insert("parent_beam_id", json!(parent_beam_id));
                meta.insert("sub_element_index", json!(sub_element_index));
            }
            ElementLineage::CouplingBeamSegment { parent_coupling_beam_id, sub_element_index } => {
                meta.insert("parent_coupling_beam_id", json!(parent_coupling_beam_id));
                meta.insert("sub_element_index", json!(sub_element_index));
                meta.insert("coupling_beam", json!(true));
            }
        }
        if let Some(v) = self.vecxz {
            meta.insert("vecxz", json!(v));
        }
        meta
    }
}
