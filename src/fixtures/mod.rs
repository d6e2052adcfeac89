//! Fixture-based golden file testing
//!
//! Every subdirectory of a fixtures root is one test case. A generator turns
//! the case's input (and optional options) into actual output, which is
//! compared against a stored baseline.
//!
//! # Directory Structure
//!
//! ```text
//! tests/fixtures/
//! ├── simple/
//! │   ├── input.md               # Input, matched by stem
//! │   └── output.md              # Baseline, named after the test
//! ├── with-options/
//! │   ├── input
//! │   ├── options.json           # Or options.toml, options.{js,cjs,mjs}
//! │   └── output.md
//! └── ...
//! ```
//!
//! A missing baseline is written on first run, except in CI where it is an
//! error.

pub mod harness;
pub mod resolve;
pub mod runner;
pub mod spec;
pub mod vfile;
pub mod walker;

pub use harness::{GROUP_SEPARATOR, Harness, Registration, Registry, TestResult, TestSummary};
pub use resolve::{
   CommandScriptLoader, OptionsFormat, ScriptOptionsLoader, find_options, load_options,
   resolve_input,
};
pub use runner::{FixtureRun, RunFn, RunFuture, RunOutcome, RunSettings, create_test};
pub use spec::{DEFAULT_INPUT, Generate, Generated, NormalizedTest, TestSpec};
pub use vfile::VFile;
pub use walker::{FixturesDirectory, list_fixture_dirs};
