//! Input file resolution and options sidecar loading

use std::{
   future::Future,
   path::{Path, PathBuf},
   pin::Pin,
};

use serde_json::{Map, Value};

use crate::{
   command::ExternalCommand,
   error::{BoxError, Error, Result},
   path::pretty_path,
};

/// Options sidecar names, with how each is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsFormat {
   Json,
   Toml,
   Script,
}

impl OptionsFormat {
   /// The format for a recognized sidecar file name.
   pub fn from_file_name(name: &str) -> Option<Self> {
      match name {
         "options.json" => Some(Self::Json),
         "options.toml" => Some(Self::Toml),
         "options.cjs" | "options.js" | "options.mjs" => Some(Self::Script),
         _ => None,
      }
   }
}

pub type ScriptFuture<'a> =
   Pin<Box<dyn Future<Output = std::result::Result<Value, BoxError>> + Send + 'a>>;

/// Evaluates script sidecars (`options.js` and friends) into a value.
pub trait ScriptOptionsLoader: Send + Sync {
   fn load<'a>(&'a self, path: &'a Path) -> ScriptFuture<'a>;
}

const NODE_DEFAULT_EXPORT: &str = "const m = await import(process.argv[1]); \
   process.stdout.write(JSON.stringify(m.default ?? null))";

/// Loads script sidecars by running a program that prints the options as JSON.
///
/// The `{path}` placeholder receives the sidecar location.
#[derive(Debug, Clone)]
pub struct CommandScriptLoader {
   pub command: ExternalCommand,
}

impl CommandScriptLoader {
   pub const fn new(command: ExternalCommand) -> Self {
      Self { command }
   }

   /// Node loader printing the module's default export.
   pub fn node() -> Self {
      Self::new(
         ExternalCommand::new("node")
            .args(["--input-type=module", "--eval", NODE_DEFAULT_EXPORT])
            .arg("{path}"),
      )
   }
}

impl ScriptOptionsLoader for CommandScriptLoader {
   fn load<'a>(&'a self, path: &'a Path) -> ScriptFuture<'a> {
      Box::pin(async move {
         let location = path.display().to_string();
         let stdout = self.command.run(&[("path", location.as_str())], None).await?;
         let value: Value = serde_json::from_str(&stdout)?;
         Ok::<_, BoxError>(value)
      })
   }
}

/// List file names in a directory, in the order the OS returns them.
async fn list_dir(directory: &Path) -> Result<Vec<String>> {
   let mut entries = tokio::fs::read_dir(directory).await?;
   let mut names = Vec::new();
   while let Some(entry) = entries.next_entry().await? {
      if let Some(name) = entry.file_name().to_str() {
         names.push(name.to_string());
      }
   }
   Ok(names)
}

/// Find the input file for a fixture.
///
/// A name with an extension is taken as an exact file name and not checked
/// here. Otherwise an entry named exactly `input` wins, then the first entry
/// named `input.<anything>`.
pub async fn resolve_input(directory: &Path, input: &str) -> Result<PathBuf> {
   if Path::new(input).extension().is_some() {
      return Ok(directory.join(input));
   }

   let names = list_dir(directory).await?;
   if names.iter().any(|name| name == input) {
      return Ok(directory.join(input));
   }

   let prefix = format!("{input}.");
   names
      .iter()
      .find(|name| name.starts_with(&prefix))
      .map(|name| directory.join(name))
      .ok_or_else(|| Error::InputNotFound { directory: pretty_path(directory) })
}

/// Locate a fixture's options sidecar. The first recognized name in
/// listing order wins.
pub async fn find_options(directory: &Path) -> Result<Option<(PathBuf, OptionsFormat)>> {
   Ok(list_dir(directory).await?.into_iter().find_map(|name| {
      OptionsFormat::from_file_name(&name).map(|format| (directory.join(name), format))
   }))
}

/// Load a fixture's options sidecar, or `{}` when there is none.
pub async fn load_options(
   directory: &Path,
   scripts: Option<&dyn ScriptOptionsLoader>,
) -> Result<Value> {
   let Some((path, format)) = find_options(directory).await? else {
      return Ok(Value::Object(Map::new()));
   };

   match format {
      OptionsFormat::Json => {
         let content = tokio::fs::read_to_string(&path).await?;
         serde_json::from_str(&content).map_err(|e| options_error(&path, e))
      },
      OptionsFormat::Toml => {
         let content = tokio::fs::read_to_string(&path).await?;
         toml::from_str(&content).map_err(|e| options_error(&path, e))
      },
      OptionsFormat::Script => {
         let loader =
            scripts.ok_or_else(|| Error::UnsupportedOptions { path: pretty_path(&path) })?;
         loader.load(&path).await.map_err(|e| options_error(&path, e))
      },
   }
}

fn options_error(path: &Path, reason: impl std::fmt::Display) -> Error {
   Error::Options { path: pretty_path(path), reason: reason.to_string() }
}
