//! Registers fixture tests for every subdirectory of a fixtures root

use std::{
   fs,
   path::{Path, PathBuf},
   sync::Arc,
};

use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use super::{
   harness::{Harness, Registration, Registry, TestSummary},
   resolve::ScriptOptionsLoader,
   runner::{RunSettings, create_test},
   spec::TestSpec,
};
use crate::{
   config::{self, FixturesConfig},
   error::Result,
   format::Formatter,
};

/// A fixtures root plus the tests to run against each of its subdirectories.
#[derive(Debug)]
pub struct FixturesDirectory<O> {
   directory: PathBuf,
   tests:     IndexMap<String, TestSpec<O>>,
   settings:  RunSettings,
}

impl<O> FixturesDirectory<O>
where
   O: DeserializeOwned + Send + 'static,
{
   /// Fixtures below `directory`, with CI detected from the environment.
   pub fn new(directory: impl Into<PathBuf>) -> Self {
      Self {
         directory: directory.into(),
         tests:     IndexMap::new(),
         settings:  RunSettings { ci: config::is_ci(), ..Default::default() },
      }
   }

   /// Fixtures described by a loaded config.
   pub fn from_config(config: &FixturesConfig) -> Result<Self> {
      let mut fixtures = Self::new(config.directory.clone());
      fixtures.settings = config.settings(fixtures.settings.ci)?;
      Ok(fixtures)
   }

   /// Add a named test. Re-adding a name replaces its spec.
   pub fn test(mut self, name: impl Into<String>, spec: impl Into<TestSpec<O>>) -> Self {
      self.tests.insert(name.into(), spec.into());
      self
   }

   /// Overwrite mismatching baselines. Ignored in CI.
   pub fn write(mut self, write: bool) -> Self {
      self.settings.write = write;
      self
   }

   /// Override CI detection.
   pub fn ci(mut self, ci: bool) -> Self {
      self.settings.ci = ci;
      self
   }

   /// Format actual output before comparing.
   pub fn formatter(mut self, formatter: impl Formatter + 'static) -> Self {
      self.settings.formatter = Some(Arc::new(formatter));
      self
   }

   /// Evaluate `options.js`-style sidecars with `loader`.
   pub fn scripts(mut self, loader: impl ScriptOptionsLoader + 'static) -> Self {
      self.settings.scripts = Some(Arc::new(loader));
      self
   }

   pub fn directory(&self) -> &Path {
      &self.directory
   }

   pub const fn settings(&self) -> &RunSettings {
      &self.settings
   }

   /// Immediate subdirectories as `(name, path)`, in listing order.
   pub fn fixture_dirs(&self) -> Result<Vec<(String, PathBuf)>> {
      list_fixture_dirs(&self.directory)
   }

   /// Register one test per fixture directory, or one group when several
   /// tests are configured. Returns how many directories were registered.
   pub fn register(&self, registry: &mut dyn Registry) -> Result<usize> {
      let dirs = self.fixture_dirs()?;
      let settings = Arc::new(RunSettings {
         write: self.settings.writes_baselines(),
         ..self.settings.clone()
      });

      for (name, path) in &dirs {
         let registration = if self.tests.len() == 1
            && let Some((test_name, spec)) = self.tests.first()
         {
            Registration::Test {
               name: name.clone(),
               run:  create_test(path, test_name, spec, Arc::clone(&settings)),
            }
         } else {
            let tests = self
               .tests
               .iter()
               .map(|(test_name, spec)| {
                  (test_name.clone(), create_test(path, test_name, spec, Arc::clone(&settings)))
               })
               .collect();
            Registration::Group { name: name.clone(), tests }
         };
         registry.register(registration);
      }

      Ok(dirs.len())
   }

   /// Register everything with a fresh [`Harness`] and run it.
   pub async fn run(&self) -> Result<TestSummary> {
      let mut harness = Harness::new();
      self.register(&mut harness)?;
      Ok(harness.run().await)
   }
}

/// Immediate subdirectories of `root`, in listing order. Symlinks to
/// directories count as directories.
pub fn list_fixture_dirs(root: &Path) -> Result<Vec<(String, PathBuf)>> {
   let mut dirs = Vec::new();
   for entry in fs::read_dir(root)? {
      let path = entry?.path();
      if !fs::metadata(&path).is_ok_and(|meta| meta.is_dir()) {
         continue;
      }
      if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
         dirs.push((name.to_string(), path.clone()));
      }
   }
   Ok(dirs)
}
