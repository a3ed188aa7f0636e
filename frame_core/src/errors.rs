//! # Error Types
//!
//! Structured error types for frame_core. Every fatal condition of a build is
//! a caller configuration error, so each variant carries enough context (tag,
//! coordinate, or configuration value) to diagnose it without a debugger.
//!
//! Non-fatal conditions (omitted columns, poor mesh aspect ratios, empty
//! diaphragms) are never represented here; they are logged through `tracing`
//! and collected in [`crate::validation::ValidationReport`].
//!
//! ## Example
//!
//! ```rust
//! use frame_core::errors::{ModelError, ModelResult};
//!
//! fn validate_story_height(height_m: f64) -> ModelResult<()> {
//!     if height_m <= 0.0 {
//!         return Err(ModelError::invalid_input(
//!             "story_height",
//!             height_m.to_string(),
//!             "Story height must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for frame_core operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Structured error type for model construction.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ModelError {
    /// An input value is invalid (out of range, inconsistent, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A node tag was added twice
    #[error("Duplicate node tag {tag} at ({x:.4}, {y:.4}, {z:.4})")]
    DuplicateNode { tag: u32, x: f64, y: f64, z: f64 },

    /// An element tag was added twice
    #[error("Duplicate element tag {tag}")]
    DuplicateElement { tag: u32 },

    /// An element references a node that is not in the model
    #[error("Element {element} references missing node {node}")]
    MissingNode { element: u32, node: u32 },

    /// An element references a material that is not in the model
    #[error("Element {element} references missing material {material}")]
    MissingMaterial { element: u32, material: u32 },

    /// An element references a section that is not in the model
    #[error("Element {element} references missing section {section}")]
    MissingSection { element: u32, section: u32 },

    /// Element kind and node count disagree
    #[error("Element {element} of kind {kind} needs {expected} nodes, got {actual}")]
    NodeCountMismatch {
        element: u32,
        kind: String,
        expected: usize,
        actual: usize,
    },

    /// Material or section tag registered twice
    #[error("Duplicate {entity} tag {tag}")]
    DuplicateDefinition { entity: String, tag: u32 },

    /// Section dimensions are non-positive
    #[error("Invalid section '{section}': {dimension} = {value} must be positive")]
    InvalidSection {
        section: String,
        dimension: String,
        value: f64,
    },

    /// Core-wall configuration name or geometry that no extractor supports
    #[error("Unsupported core wall configuration '{config}': {reason}")]
    UnsupportedCoreWall { config: String, reason: String },

    /// A tag namespace ran into the next one
    #[error("Tag range {range} exhausted: next tag {next} would reach {limit}")]
    TagRangeExhausted { range: String, next: u32, limit: u32 },

    /// Input file could not be read or parsed
    #[error("Input error: {path} - {reason}")]
    InputError { path: String, reason: String },

    /// An external solver rejected the model or failed to converge
    #[error("Solver failed: {reason}")]
    SolverFailed { reason: String },
}

impl ModelError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ModelError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingNode error
    pub fn missing_node(element: u32, node: u32) -> Self {
        ModelError::MissingNode { element, node }
    }

    /// Create an InvalidSection error
    pub fn invalid_section(section: impl Into<String>, dimension: impl Into<String>, value: f64) -> Self {
        ModelError::InvalidSection {
            section: section.into(),
            dimension: dimension.into(),
            value,
        }
    }

    /// Create an UnsupportedCoreWall error
    pub fn unsupported_core_wall(config: impl Into<String>, reason: impl Into<String>) -> Self {
        ModelError::UnsupportedCoreWall {
            config: config.into(),
            reason: reason.into(),
        }
    }

    /// Create an InputError
    pub fn input_error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ModelError::InputError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ModelError::InvalidInput { .. } => "INVALID_INPUT",
            ModelError::DuplicateNode { .. } => "DUPLICATE_NODE",
            ModelError::DuplicateElement { .. } => "DUPLICATE_ELEMENT",
            ModelError::MissingNode { .. } => "MISSING_NODE",
            ModelError::MissingMaterial { .. } => "MISSING_MATERIAL",
            ModelError::MissingSection { .. } => "MISSING_SECTION",
            ModelError::NodeCountMismatch { .. } => "NODE_COUNT_MISMATCH",
            ModelError::DuplicateDefinition { .. } => "DUPLICATE_DEFINITION",
            ModelError::InvalidSection { .. } => "INVALID_SECTION",
            ModelError::UnsupportedCoreWall { .. } => "UNSUPPORTED_CORE_WALL",
            ModelError::TagRangeExhausted { .. } => "TAG_RANGE_EXHAUSTED",
            ModelError::InputError { .. } => "INPUT_ERROR",
            ModelError::SolverFailed { .. } => "SOLVER_FAILED",
        }
    }
}
