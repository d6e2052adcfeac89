//! Runs one test against one fixture directory

use std::{
   future::Future,
   io::ErrorKind,
   path::{Path, PathBuf},
   pin::Pin,
   sync::Arc,
};

use serde::de::DeserializeOwned;

use super::{
   resolve::{ScriptOptionsLoader, load_options, resolve_input},
   spec::{NormalizedTest, TestSpec},
   vfile::VFile,
};
use crate::{
   assert::assert_equal,
   error::{Error, Result},
   format::{Formatter, format_for},
   path::pretty_path,
   style,
};

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
   /// Actual output matched the baseline
   Passed,
   /// No baseline existed; the actual output was stored as the new one
   BaselineWritten,
}

/// Settings shared by every fixture run of a suite.
#[derive(Clone, Default)]
pub struct RunSettings {
   /// Overwrite the baseline when it does not match. Has no effect in CI.
   pub write:     bool,
   /// Running under continuous integration: a missing baseline is an error
   pub ci:        bool,
   /// Formatter applied to actual output before comparison
   pub formatter: Option<Arc<dyn Formatter>>,
   /// Loader for `options.js`-style sidecars
   pub scripts:   Option<Arc<dyn ScriptOptionsLoader>>,
}

impl std::fmt::Debug for RunSettings {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.debug_struct("RunSettings")
         .field("write", &self.write)
         .field("ci", &self.ci)
         .field("format", &self.formatter.is_some())
         .field("scripts", &self.scripts.is_some())
         .finish()
   }
}

impl RunSettings {
   /// Whether a mismatching baseline gets overwritten.
   pub const fn writes_baselines(&self) -> bool {
      self.write && !self.ci
   }
}

pub type RunFuture = Pin<Box<dyn Future<Output = Result<RunOutcome>> + Send>>;

/// A zero-argument fixture run, ready to hand to a test registry.
pub type RunFn = Arc<dyn Fn() -> RunFuture + Send + Sync>;

/// One test bound to one fixture directory.
#[derive(Debug)]
pub struct FixtureRun<O> {
   directory: PathBuf,
   test:      NormalizedTest<O>,
   settings:  Arc<RunSettings>,
}

impl<O> FixtureRun<O>
where
   O: DeserializeOwned + Send + 'static,
{
   pub fn new(
      directory: impl Into<PathBuf>,
      name: &str,
      spec: &TestSpec<O>,
      settings: Arc<RunSettings>,
   ) -> Self {
      Self { directory: directory.into(), test: spec.normalize(name), settings }
   }

   /// Location of the baseline file.
   pub fn expected_path(&self) -> PathBuf {
      self.directory.join(&self.test.expected)
   }

   /// Run the fixture: generate, then compare against or create the baseline.
   pub async fn run(&self) -> Result<RunOutcome> {
      let input_path = resolve_input(&self.directory, &self.test.input).await?;
      let file = VFile::read(input_path).await?;
      let options = self.options().await?;

      let expected_path = self.expected_path();
      let expected = match tokio::fs::read_to_string(&expected_path).await {
         Ok(text) => Some(text),
         Err(err) if err.kind() == ErrorKind::NotFound && !self.settings.ci => None,
         Err(err) => return Err(err.into()),
      };

      let generated = self.test.generate.call(file, options).await.map_err(Error::Generate)?;
      let mut actual = generated.into_text();
      if let Some(formatter) = &self.settings.formatter {
         actual = format_for(formatter.as_ref(), actual, &expected_path).await?;
      }

      let Some(expected) = expected else {
         write_baseline(&expected_path, &actual).await?;
         return Ok(RunOutcome::BaselineWritten);
      };

      if let Err(mismatch) = assert_equal(&actual, &expected, Some(&expected_path)) {
         if self.settings.writes_baselines() {
            write_baseline(&expected_path, &actual).await?;
         }
         return Err(mismatch.into());
      }

      Ok(RunOutcome::Passed)
   }

   async fn options(&self) -> Result<O> {
      let value = load_options(&self.directory, self.settings.scripts.as_deref()).await?;
      serde_json::from_value(value).map_err(|e| Error::Options {
         path:   pretty_path(&self.directory),
         reason: e.to_string(),
      })
   }

   /// Erase the options type so the run can be registered.
   pub fn into_fn(self) -> RunFn {
      let run = Arc::new(self);
      Arc::new(move || -> RunFuture {
         let run = Arc::clone(&run);
         Box::pin(async move { run.run().await })
      })
   }
}

/// Build the run function for one test in one fixture directory.
pub fn create_test<O>(
   directory: impl Into<PathBuf>,
   name: &str,
   spec: &TestSpec<O>,
   settings: Arc<RunSettings>,
) -> RunFn
where
   O: DeserializeOwned + Send + 'static,
{
   FixtureRun::new(directory, name, spec, settings).into_fn()
}

async fn write_baseline(path: &Path, content: &str) -> Result<()> {
   style::print_info(&format!("Writing {}", pretty_path(path)));
   tokio::fs::write(path, content).await?;
   Ok(())
}
