//! CLI module - argument parsing and interactive prompts

mod args;
mod prompts;

pub use args::{
    evaluation_config, segment_run_config, BinningArgs, Cli, Commands, DataArgs, ReportArgs, SegmentArgs,
};
pub use prompts::*;
