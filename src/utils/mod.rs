//! Terminal and logging helpers shared by the CLI and the pipeline

pub mod logging;
pub mod progress;
pub mod styling;

pub use logging::init_tracing;
