//! Nodes and their restraints.

use serde::{Deserialize, Serialize};

use crate::geometry::Point3;
use crate::tags::Tag;

/// Fixity flags for the six nodal degrees of freedom
/// `[UX, UY, UZ, RX, RY, RZ]`; `true` means restrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Restraints(pub [bool; 6]);

impl Restraints {
    pub const FREE: Restraints = Restraints([false; 6]);
    pub const FIXED: Restraints = Restraints([true; 6]);
    pub const PINNED: Restraints = Restraints([true, true, true, false, false, false]);
    /// Out-of-plane DOFs of a rigid-diaphragm master: UZ, RX, RY
    pub const DIAPHRAGM_MASTER: Restraints = Restraints([false, false, true, true, true, false]);

    pub fn is_free(&self) -> bool {
        self.0.iter().all(|dof| !dof)
    }

    pub fn is_fixed(&self) -> bool {
        self.0.iter().all(|dof| *dof)
    }

    /// Any DOF restrained
    pub fn is_support(&self) -> bool {
        self.0.iter().any(|dof| *dof)
    }

    /// Most-restrictive merge: a DOF restrained by either side stays restrained
    pub fn merge(self, other: Restraints) -> Restraints {
        let mut out = self.0;
        for (dof, theirs) in out.iter_mut().zip(other.0) {
            *dof |= theirs;
        }
        Restraints(out)
    }

    /// Flags as 0/1 integers, the form solvers take them in
    pub fn as_flags(&self) -> [u8; 6] {
        self.0.map(u8::from)
    }
}

/// Model node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub tag: Tag,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub restraints: Restraints,
    /// Floor index; 0 is the base
    pub floor_level: usize,
}

impl Node {
    pub fn new(tag: Tag, point: Point3, restraints: Restraints, floor_level: usize) -> Self {
        Node {
            tag,
            x: point.x,
            y: point.y,
            z: point.z,
            restraints,
            floor_level,
        }
    }

    pub fn point(&self) -> Point3 {
        Point3::new(self.x, self.y, self.z)
    }

    pub fn is_support(&self) -> bool {
        self.restraints.is_support()
    }
}
