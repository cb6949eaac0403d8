//! Constrained random synthesis of the personnel dataset.
//!
//! The engine generates departments, positions, employees and their
//! payroll, license and on-call rows in dependency order, repairs every
//! cross-field violation with a deterministic fallback, and writes one
//! transactional SQL artifact per table using batched bulk inserts.

pub mod engine;
pub mod errors;
pub mod model;
pub mod output;
pub mod primitives;
pub mod sequences;
pub mod synth;

pub use engine::{Dataset, GenerationEngine, GenerationResult, TableSink};
pub use errors::GenerationError;
pub use model::{CountRange, GenerateOptions, GenerationReport, TableReport};
