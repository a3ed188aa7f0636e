//! # Tag Namespaces
//!
//! Every node and element tag in a model comes from one of a fixed set of
//! ranges. Downstream tooling (solver post-processing, visualization, design
//! checks) attributes results by these ranges, so the bases are part of the
//! external contract:
//!
//! | Range          | First tag | Used for                                  |
//! |----------------|-----------|-------------------------------------------|
//! | `Frame`        | 1         | grid/column/beam nodes, columns, beams    |
//! | `Wall`         | 50000     | core-wall mesh nodes and shells           |
//! | `Slab`         | 60000     | slab mesh nodes and shells                |
//! | `CouplingBeam` | 70000     | coupling-beam nodes and elements          |
//! | `Diaphragm`    | 90000     | rigid-diaphragm master nodes              |
//!
//! [`TagAllocator`] owns one node counter and one element counter per range
//! and refuses to hand out a tag that would spill into the next range.

use serde::{Deserialize, Serialize};

use crate::errors::{ModelError, ModelResult};

/// A node or element tag
pub type Tag = u32;

/// Named tag namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TagRange {
    Frame,
    Wall,
    Slab,
    CouplingBeam,
    Diaphragm,
}

impl TagRange {
    /// All ranges in ascending tag order
    pub const ALL: [TagRange; 5] = [
        TagRange::Frame,
        TagRange::Wall,
        TagRange::Slab,
        TagRange::CouplingBeam,
        TagRange::Diaphragm,
    ];

    /// First tag in the range
    pub const fn base(self) -> Tag {
        match self {
            TagRange::Frame => 1,
            TagRange::Wall => 50_000,
            TagRange::Slab => 60_000,
            TagRange::CouplingBeam => 70_000,
            TagRange::Diaphragm => 90_000,
        }
    }

    /// One past the last tag in the range
    pub const fn limit(self) -> Tag {
        match self {
            TagRange::Frame => TagRange::Wall.base(),
            TagRange::Wall => TagRange::Slab.base(),
            TagRange::Slab => TagRange::CouplingBeam.base(),
            TagRange::CouplingBeam => TagRange::Diaphragm.base(),
            TagRange::Diaphragm => 100_000,
        }
    }

    /// Range a tag belongs to, if any
    pub fn of(tag: Tag) -> Option<TagRange> {
        TagRange::ALL
            .iter()
            .copied()
            .find(|range| tag >= range.base() && tag < range.limit())
    }

    /// Whether `tag` falls inside this range
    pub fn contains(self, tag: Tag) -> bool {
        tag >= self.base() && tag < self.limit()
    }

    fn index(self) -> usize {
        match self {
            TagRange::Frame => 0,
            TagRange::Wall => 1,
            TagRange::Slab => 2,
            TagRange::CouplingBeam => 3,
            TagRange::Diaphragm => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TagRange::Frame => "Frame",
            TagRange::Wall => "Wall",
            TagRange::Slab => "Slab",
            TagRange::CouplingBeam => "CouplingBeam",
            TagRange::Diaphragm => "Diaphragm",
        }
    }
}

impl std::fmt::Display for TagRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-range node and element counters.
///
/// One allocator lives for one build. It is plain data threaded through the
/// builders by `&mut`, never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAllocator {
    next_node: [Tag; 5],
    next_element: [Tag; 5],
}

impl TagAllocator {
    pub fn new() -> Self {
        let bases = TagRange::ALL.map(TagRange::base);
        TagAllocator {
            next_node: bases,
            next_element: bases,
        }
    }

    /// Allocate the next node tag in `range`
    pub fn next_node(&mut self, range: TagRange) -> ModelResult<Tag> {
        Self::take(&mut self.next_node[range.index()], range)
    }

    /// Allocate the next element tag in `range`
    pub fn next_element(&mut self, range: TagRange) -> ModelResult<Tag> {
        Self::take(&mut self.next_element[range.index()], range)
    }

    /// Next element tag that would be handed out in `range`
    pub fn peek_element(&self, range: TagRange) -> Tag {
        self.next_element[range.index()]
    }

    /// Next node tag that would be handed out in `range`
    pub fn peek_node(&self, range: TagRange) -> Tag {
        self.next_node[range.index()]
    }

    fn take(counter: &mut Tag, range: TagRange) -> ModelResult<Tag> {
        let tag = *counter;
        if tag >= range.limit() {
            return Err(ModelError::TagRangeExhausted {
                range: range.name().to_string(),
                next: tag,
                limit: range.limit(),
            });
        }
        *counter += 1;
        Ok(tag)
    }
}

impl Default for TagAllocator {
    fn default() -> Self {
        Self::new()
    }
}
