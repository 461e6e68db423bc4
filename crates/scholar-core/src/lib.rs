//! Course index build, retrieval, prompt assembly and answer generation.

pub mod agent;
pub mod answer;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod format;
pub mod index;
pub mod prompt;
pub mod retriever;
pub mod tool;

pub use agent::AgentDescriptor;
pub use answer::AnswerGenerator;
pub use config::Config;
pub use error::PipelineError;
pub use index::{BuildReport, CourseIndex, build_index};
pub use retriever::{RetrievedChunk, Retriever};
pub use tool::RagTool;
