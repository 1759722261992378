//! Artifact Core - contract artifact normalization and ABI type interpreter
//!
//! Turns the JSON artifact a contract compiler emits into the canonical
//! interface schema deployment tooling expects, and interprets the ABI type
//! grammar used by function parameters.
//!
//! # Architecture
//!
//! ```text
//! artifact JSON → RawArtifact → Normalizer ──(per function)──→ Classifier
//!                                   ↓
//!                          filter + backfill → CanonicalArtifact → SHA-256
//!
//! parameter type → TypeDescriptor → size  (word count)
//!                                 → dummy (placeholder value)
//! ```
//!
//! # Guarantees
//!
//! - **Deterministic**: same input always produces identical output
//! - **Idempotent**: normalizing a canonical artifact returns it unchanged
//! - **Total**: `size`, `dummy` and `classify` never fail; unknown type kinds
//!   fall back unless a strict walk is requested

pub mod artifact;
pub mod classifier;
pub mod config;
pub mod deploy_output;
pub mod diagnostics;
pub mod dummy;
pub mod error;
pub mod normalizer;
pub mod size;
pub mod types;

pub use artifact::{CanonicalArtifact, FunctionRecord, RawArtifact, RawFunction};
pub use classifier::{classify, Classification, FunctionType};
pub use config::NormalizerConfig;
pub use diagnostics::{Diagnostic, DiagnosticSink, Diagnostics, NullSink, TracingSink};
pub use error::{Error, Result};
pub use normalizer::{artifact_hash, normalize, normalize_artifact};
pub use types::{TypeDescriptor, TypeMode};

/// Version of this library crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
