//! # frame_core - Structural Mesh Builder
//!
//! `frame_core` turns a handful of building parameters (bay grid, story
//! heights, member sizes, core-wall layout, slab openings) into a fully
//! connected, uniquely tagged structural model that an external
//! finite-element solver can consume directly. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **One registry**: every builder asks for nodes by coordinate, so
//!   independently generated sub-meshes share nodes where they touch
//! - **Deterministic**: identical input yields identical tags
//! - **Rich Errors**: fatal conditions are typed [`ModelError`]s; non-fatal
//!   ones are logged through `tracing` and returned in the build report
//! - **No solver**: analysis is behind the [`solver::Solver`] trait
//!
//! ## Quick Start
//!
//! ```rust
//! use frame_core::config::{BuildInput, BuildOptions, BuildingDescription};
//! use frame_core::director::ModelDirector;
//! use frame_core::model::ElementKind;
//!
//! let input = BuildInput::new(BuildingDescription::default(), BuildOptions::frame_only());
//! let report = ModelDirector::new(input).build().unwrap();
//!
//! // 2 x 2 bays, 2 floors: 9 column lines x 2 stories x 6 sub-elements
//! let summary = report.model.summary();
//! assert_eq!(summary.count(ElementKind::ElasticBeam), 108 + 144);
//! assert!(report.validation.is_clean());
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Building description and build options
//! - [`director`] - Phase-ordered model construction
//! - [`builders`] - Grid, column, beam, wall, slab and lateral builders
//! - [`registry`] - Coordinate-deduplicating node registry
//! - [`mesh`] - Wall and slab shell mesh generators
//! - [`core_wall`] - Core-wall layouts and panel extraction
//! - [`geometry`] - Plan geometry and polygon beam trimming
//! - [`model`] - The solver-ready structural model
//! - [`tags`] - Tag namespaces and allocation
//! - [`validation`] - Post-build model checks
//! - [`lineage`] / [`solver`] - Result regrouping and the solver boundary

pub mod builders;
pub mod config;
pub mod context;
pub mod core_wall;
pub mod director;
pub mod errors;
pub mod geometry;
pub mod lineage;
pub mod loads;
pub mod materials;
pub mod mesh;
pub mod model;
pub mod registry;
pub mod solver;
pub mod tags;
pub mod units;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use config::{BuildInput, BuildOptions, BuildingDescription};
pub use director::{BuildReport, ModelDirector};
pub use errors::{ModelError, ModelResult};
pub use model::{Element, ElementKind, Node, StructuralModel};
pub use tags::{Tag, TagRange};
pub use validation::{ValidationReport, ValidationWarning};
