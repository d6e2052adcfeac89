//! Test registration and execution
//!
//! [`Registry`] is the seam between directory walking and whatever runs the
//! tests. [`Harness`] is the stock registry: it runs every registered fixture
//! on the tokio runtime and prints a status line for each test once its
//! registration finishes, in registration order.

use std::fmt::Write as _;

use super::runner::{RunFn, RunOutcome};
use crate::style::{self, icons};

/// Separator between a fixture directory and a nested test name
pub const GROUP_SEPARATOR: &str = " \u{203A} ";

/// One entry handed to a registry.
pub enum Registration {
   /// A single test named after its fixture directory
   Test { name: String, run: RunFn },
   /// A fixture directory holding one nested test per configured spec
   Group { name: String, tests: Vec<(String, RunFn)> },
}

impl Registration {
   pub fn name(&self) -> &str {
      match self {
         Self::Test { name, .. } | Self::Group { name, .. } => name,
      }
   }
}

impl std::fmt::Debug for Registration {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      match self {
         Self::Test { name, .. } => f.debug_struct("Test").field("name", name).finish(),
         Self::Group { name, tests } => f
            .debug_struct("Group")
            .field("name", name)
            .field("tests", &tests.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>())
            .finish(),
      }
   }
}

/// Anything that accepts fixture tests.
pub trait Registry {
   fn register(&mut self, registration: Registration);
}

impl Registry for Vec<Registration> {
   fn register(&mut self, registration: Registration) {
      self.push(registration);
   }
}

/// Result of running a single test
#[derive(Debug)]
pub struct TestResult {
   /// Display name, `dir` or `dir › test`
   pub name:    String,
   /// Outcome, or the rendered failure
   pub outcome: Result<RunOutcome, String>,
}

impl TestResult {
   pub const fn passed(&self) -> bool {
      self.outcome.is_ok()
   }
}

/// Runs registered fixture tests.
#[derive(Debug, Default)]
pub struct Harness {
   registrations: Vec<Registration>,
   quiet:         bool,
}

impl Registry for Harness {
   fn register(&mut self, registration: Registration) {
      self.registrations.push(registration);
   }
}

impl Harness {
   pub fn new() -> Self {
      Self::default()
   }

   /// Suppress per-test status lines
   pub const fn quiet(mut self) -> Self {
      self.quiet = true;
      self
   }

   pub fn registrations(&self) -> &[Registration] {
      &self.registrations
   }

   /// Run everything that was registered.
   ///
   /// Each registration runs as its own task; tests inside a group run one
   /// after another, each in its own task so a panic stays with its test.
   /// Results are reported in registration order.
   pub async fn run(self) -> TestSummary {
      let handles: Vec<_> = self
         .registrations
         .into_iter()
         .map(|registration| {
            let name = registration.name().to_string();
            (name, tokio::spawn(run_registration(registration)))
         })
         .collect();

      let mut results = Vec::new();
      for (name, handle) in handles {
         let finished = match handle.await {
            Ok(group_results) => group_results,
            Err(err) => vec![TestResult { name, outcome: Err(panic_message(&err)) }],
         };
         if !self.quiet {
            finished.iter().for_each(print_result);
         }
         results.extend(finished);
      }

      TestSummary::from_results(results)
   }
}

async fn run_registration(registration: Registration) -> Vec<TestResult> {
   match registration {
      Registration::Test { name, run } => vec![run_isolated(name, run).await],
      Registration::Group { name, tests } => {
         let mut results = Vec::with_capacity(tests.len());
         for (test_name, run) in tests {
            results.push(run_isolated(format!("{name}{GROUP_SEPARATOR}{test_name}"), run).await);
         }
         results
      },
   }
}

/// Run one test on its own task.
async fn run_isolated(name: String, run: RunFn) -> TestResult {
   let outcome = match tokio::spawn(run()).await {
      Ok(outcome) => outcome.map_err(|e| e.to_string()),
      Err(err) => Err(panic_message(&err)),
   };
   TestResult { name, outcome }
}

fn panic_message(err: &tokio::task::JoinError) -> String {
   if err.is_panic() {
      format!("test panicked: {err}")
   } else {
      format!("test did not complete: {err}")
   }
}

fn print_result(result: &TestResult) {
   match &result.outcome {
      Ok(RunOutcome::Passed) => println!("{} {}", style::success(icons::SUCCESS), result.name),
      Ok(RunOutcome::BaselineWritten) => println!(
         "{} {} {}",
         style::warning(icons::SAVE),
         result.name,
         style::dim("(baseline written)")
      ),
      Err(_) => println!("{} {}", style::error(icons::ERROR), style::bold(&result.name)),
   }
}

/// Summary of a test run
#[derive(Debug, Default)]
pub struct TestSummary {
   pub total:   usize,
   pub passed:  usize,
   pub failed:  usize,
   pub written: usize,
   pub results: Vec<TestResult>,
}

impl TestSummary {
   /// Create summary from results
   pub fn from_results(results: Vec<TestResult>) -> Self {
      let mut summary = Self { total: results.len(), ..Default::default() };

      for result in &results {
         match result.outcome {
            Ok(RunOutcome::Passed) => summary.passed += 1,
            Ok(RunOutcome::BaselineWritten) => summary.written += 1,
            Err(_) => summary.failed += 1,
         }
      }

      summary.results = results;
      summary
   }

   /// Check if all tests passed
   pub const fn all_passed(&self) -> bool {
      self.failed == 0
   }

   pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
      self.results.iter().filter(|r| !r.passed())
   }

   /// One-line count of each outcome.
   pub fn headline(&self) -> String {
      format!(
         "{} tests: {} passed, {} failed, {} written",
         self.total, self.passed, self.failed, self.written
      )
   }

   /// Failure report: each failing test followed by its message.
   pub fn report(&self) -> String {
      let mut out = self.headline();
      for failure in self.failures() {
         if let Err(message) = &failure.outcome {
            let _ = write!(out, "\n\n{} {}\n{message}", icons::ERROR, failure.name);
         }
      }
      out
   }

   /// Panic with the failure report unless every test passed.
   pub fn assert_passed(&self) {
      assert!(self.all_passed(), "{}", self.report());
   }
}
