//! Compile pipeline and serialized artifact for knotweave stories.
//!
//! [`compile`] is the whole compiler as one pure function: script text in,
//! complete [`StoryGraph`](knotweave_core::StoryGraph) out, or a single
//! [`CompileError`] naming the stage that failed. [`to_json`] renders the
//! graph in the artifact layout consumed by renderers.

pub mod error;
pub mod format;
pub mod pipeline;

pub use error::CompileError;
pub use format::{digest, from_json, to_json, Artifact, GraphSection};
pub use pipeline::{compile, compile_to_json, compile_with_entry, Compilation};
