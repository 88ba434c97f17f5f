//! In-place code generation driven by the calibration schema.
//!
//! Target files carry marker comments delimiting generator blocks:
//!
//! ```text
//! // Impinj_calgen | gen_cal_v5_c_example {
//! ...generated content, replaced on every run...
//! // Impinj_calgen }
//! ```
//!
//! Everything outside the markers is hand-written and preserved byte for
//! byte. Everything between them is regenerated by rendering the template
//! named by the tag against a context built from the validated
//! [`calgen_schema::AddressMap`].
//!
//! # Modules
//!
//! - [`config`] - Project paths, sentinel token and worklist for one run
//! - [`scanner`] - Line-level state machine splitting a file into spans and blocks
//! - [`block`] - The `CalGenBlock` descriptor and marker payload parsing
//! - [`context`] - Calibration context consumed by the bundled templates
//! - [`registry`] - Tag → context-producing plugin table
//! - [`resolver`] - Template search path and tag resolution
//! - [`template_engine`] - Tera rendering with code-generation filters
//! - [`weaver`] - Reassembly and (atomic) file replacement
//! - [`orchestrator`] - Drives the worklist end to end

pub mod block;
pub mod config;
pub mod context;
pub mod error;
pub mod orchestrator;
pub mod registry;
pub mod resolver;
pub mod scanner;
pub mod template_engine;
pub mod weaver;

pub use block::CalGenBlock;
pub use config::CalgenConfig;
pub use error::WeaveError;
pub use orchestrator::{FileOutcome, Orchestrator, RunObserver, RunReport, SilentObserver};
pub use registry::{GeneratorPlugin, GeneratorRegistry, SchemaSource};
pub use resolver::ModuleResolver;
pub use scanner::{scan, ScannedFile};
