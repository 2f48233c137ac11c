// Library crate: the scene model, geometry and export pipeline, plus the
// headless harness and command protocol used by the CLI and integration tests.

pub mod ai_client;
pub mod build;
pub mod command;
pub mod error;
pub mod export;
pub mod fixtures;
pub mod harness;
pub mod mesh;
pub mod share;
pub mod state;
pub mod validation;

pub use error::{DesignError, DesignResult};
