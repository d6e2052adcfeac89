//! Golden file testing over fixture directories
//!
//! Each subdirectory of a fixtures root holds one case: an input file, an
//! optional options sidecar and a baseline. A generator produces actual
//! output from the input, which must equal the baseline exactly. Mismatches
//! fail with a colored character or line diff.
pub mod assert;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod format;
pub mod path;
pub mod style;

// Re-export commonly used types
pub use assert::{AssertionError, assert_equal};
pub use config::{FixturesConfig, is_ci};
pub use error::{Error, Result};
pub use fixtures::{
   FixturesDirectory, Generate, Generated, Harness, Registration, Registry, RunOutcome,
   RunSettings, TestSpec, TestSummary, VFile, create_test, load_options, resolve_input,
};
pub use format::{CommandFormatter, Formatter};
pub use path::pretty_path;
