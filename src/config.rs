use std::{
   path::{Path, PathBuf},
   sync::Arc,
};

use serde::{Deserialize, Serialize};

use crate::{
   command::ExternalCommand,
   error::{Error, Result},
   fixtures::{
      resolve::{CommandScriptLoader, ScriptOptionsLoader},
      runner::RunSettings,
   },
   format::{CommandFormatter, Formatter},
};

/// Default fixtures directory relative to the crate root
pub const FIXTURES_DIR: &str = "tests/fixtures";

/// Config file looked up in the current directory
pub const CONFIG_FILE: &str = "snapshot-fixtures.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixturesConfig {
   /// Root directory holding one subdirectory per fixture
   pub directory: PathBuf,

   /// Overwrite mismatching baselines (overridden by `SNAPSHOT_FIXTURES_WRITE`,
   /// always off in CI)
   pub write: bool,

   /// Run generated output through the formatter (overridden by
   /// `SNAPSHOT_FIXTURES_FORMAT`)
   pub format: bool,

   /// External formatter, required when `format` is on
   pub formatter: Option<CommandFormatter>,

   /// Program that evaluates `options.js`-style sidecars and prints JSON
   pub scripts: Option<ExternalCommand>,
}

impl Default for FixturesConfig {
   fn default() -> Self {
      Self {
         directory: fixtures_dir(),
         write:     false,
         format:    false,
         formatter: None,
         scripts:   None,
      }
   }
}

/// Get the default fixtures directory path
pub fn fixtures_dir() -> PathBuf {
   // Try to find it relative to CARGO_MANIFEST_DIR or current dir
   if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
      return Path::new(&manifest_dir).join(FIXTURES_DIR);
   }

   Path::new(FIXTURES_DIR).to_path_buf()
}

impl FixturesConfig {
   /// Load config from `SNAPSHOT_FIXTURES_CONFIG` or `snapshot-fixtures.toml`
   /// in the current directory, falling back to defaults. Environment
   /// variables override file values:
   /// - `SNAPSHOT_FIXTURES_WRITE` overrides `write`
   /// - `SNAPSHOT_FIXTURES_FORMAT` overrides `format`
   pub fn load() -> Result<Self> {
      let cwd = std::env::current_dir()?;
      Self::load_with(&cwd, |key| std::env::var(key).ok())
   }

   /// [`load`](Self::load) against an explicit working directory and
   /// environment.
   pub fn load_with(cwd: &Path, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
      let config_path = lookup("SNAPSHOT_FIXTURES_CONFIG")
         .map_or_else(|| cwd.join(CONFIG_FILE), |path| cwd.join(path));

      let mut config = if config_path.exists() {
         Self::read_file(&config_path)?
      } else {
         Self::default()
      };

      Self::apply_env_overrides(&mut config, lookup);
      Ok(config)
   }

   /// Load config from specific file. A relative `directory` is taken
   /// relative to the file.
   pub fn from_file(path: &Path) -> Result<Self> {
      let mut config = Self::read_file(path)?;
      Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok());
      Ok(config)
   }

   fn read_file(path: &Path) -> Result<Self> {
      let contents = std::fs::read_to_string(path)
         .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;
      let mut config = Self::from_toml(&contents)?;

      if config.directory.is_relative()
         && let Some(parent) = path.parent()
      {
         config.directory = parent.join(&config.directory);
      }
      Ok(config)
   }

   /// Parse config from TOML text, without environment overrides
   pub fn from_toml(contents: &str) -> Result<Self> {
      toml::from_str(contents).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
   }

   /// Apply environment variable overrides to config
   fn apply_env_overrides(config: &mut Self, lookup: impl Fn(&str) -> Option<String>) {
      if let Some(write) = lookup("SNAPSHOT_FIXTURES_WRITE") {
         config.write = is_truthy(&write);
      }

      if let Some(format) = lookup("SNAPSHOT_FIXTURES_FORMAT") {
         config.format = is_truthy(&format);
      }
   }

   /// Build run settings. In CI the write flag is dropped.
   pub fn settings(&self, ci: bool) -> Result<RunSettings> {
      let formatter: Option<Arc<dyn Formatter>> = match (self.format, &self.formatter) {
         (false, _) => None,
         (true, Some(formatter)) => Some(Arc::new(formatter.clone())),
         (true, None) => {
            return Err(Error::Config(
               "format is enabled but no [formatter] is configured".to_string(),
            ));
         },
      };

      let scripts: Option<Arc<dyn ScriptOptionsLoader>> = self
         .scripts
         .clone()
         .map(|command| Arc::new(CommandScriptLoader::new(command)) as _);

      Ok(RunSettings { write: self.write && !ci, ci, formatter, scripts })
   }
}

fn is_truthy(value: &str) -> bool {
   value == "1" || value.eq_ignore_ascii_case("true")
}

/// Vendor variables that mark a CI environment
const CI_VARS: &[&str] = &[
   "CI",
   "CONTINUOUS_INTEGRATION",
   "BUILD_NUMBER",
   "RUN_ID",
   "GITHUB_ACTIONS",
   "GITLAB_CI",
   "BUILDKITE",
   "CIRCLECI",
   "TRAVIS",
   "TF_BUILD",
   "JENKINS_URL",
   "TEAMCITY_VERSION",
];

/// Whether the process runs under continuous integration.
pub fn is_ci() -> bool {
   is_ci_with(|key| std::env::var(key).ok())
}

/// [`is_ci`] over an arbitrary environment lookup.
pub fn is_ci_with(lookup: impl Fn(&str) -> Option<String>) -> bool {
   if lookup("CI").is_some_and(|v| v == "false" || v == "0") {
      return false;
   }
   CI_VARS.iter().any(|key| lookup(key).is_some())
}
