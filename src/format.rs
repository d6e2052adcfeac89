//! Optional post-processing of generated output by an external formatter.
//!
//! The runner only talks to the [`Formatter`] trait. [`CommandFormatter`] is
//! the stock implementation: it pipes text through a program chosen by file
//! extension.

use std::{
   future::Future,
   path::{Path, PathBuf},
   pin::Pin,
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
   command::ExternalCommand,
   error::{BoxError, Error, Result},
};

pub type FormatFuture<'a, T> =
   Pin<Box<dyn Future<Output = std::result::Result<T, BoxError>> + Send + 'a>>;

/// What a formatter knows about a target file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInfo {
   /// Parser the formatter would use, `None` if it does not handle the file
   pub parser:  Option<String>,
   /// Excluded by the formatter's ignore rules
   pub ignored: bool,
}

impl FileInfo {
   /// Parser to format with, if the file should be formatted at all.
   pub fn applicable_parser(&self) -> Option<&str> {
      if self.ignored { None } else { self.parser.as_deref() }
   }
}

/// An external code formatter.
pub trait Formatter: Send + Sync {
   /// Inspect a target location.
   fn file_info<'a>(&'a self, path: &'a Path) -> FormatFuture<'a, FileInfo>;

   /// Reformat `text` as if it were the contents of `path`.
   fn format<'a>(
      &'a self,
      text: &'a str,
      path: &'a Path,
      parser: &'a str,
   ) -> FormatFuture<'a, String>;
}

/// Formats by piping text through a program.
///
/// Arguments may use `{parser}` and `{path}` placeholders, e.g.
/// `prettier --parser {parser} --stdin-filepath {path}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandFormatter {
   #[serde(flatten)]
   pub command: ExternalCommand,
   /// File extension (without dot) to parser name
   #[serde(default)]
   pub parsers: IndexMap<String, String>,
   /// Paths the formatter must leave alone
   #[serde(default)]
   pub ignore:  Vec<PathBuf>,
}

impl CommandFormatter {
   pub fn new(command: ExternalCommand) -> Self {
      Self { command, parsers: IndexMap::new(), ignore: Vec::new() }
   }

   /// Handle files with `extension` using `parser`.
   pub fn parser(mut self, extension: impl Into<String>, parser: impl Into<String>) -> Self {
      self.parsers.insert(extension.into(), parser.into());
      self
   }

   /// Skip a file, or every file below a directory.
   pub fn ignore(mut self, path: impl Into<PathBuf>) -> Self {
      self.ignore.push(path.into());
      self
   }

   fn is_ignored(&self, path: &Path) -> bool {
      self.ignore.iter().any(|ignored| path.starts_with(ignored))
   }
}

impl Formatter for CommandFormatter {
   fn file_info<'a>(&'a self, path: &'a Path) -> FormatFuture<'a, FileInfo> {
      let parser = path
         .extension()
         .and_then(|ext| ext.to_str())
         .and_then(|ext| self.parsers.get(ext))
         .cloned();
      let ignored = self.is_ignored(path);
      Box::pin(async move { Ok::<_, BoxError>(FileInfo { parser, ignored }) })
   }

   fn format<'a>(
      &'a self,
      text: &'a str,
      path: &'a Path,
      parser: &'a str,
   ) -> FormatFuture<'a, String> {
      Box::pin(async move {
         let path = path.display().to_string();
         let vars = [("parser", parser), ("path", path.as_str())];
         let formatted = self.command.run(&vars, Some(text)).await?;
         Ok::<_, BoxError>(formatted)
      })
   }
}

/// Reformat `text` for `path` if the formatter handles that file.
pub async fn format_for(formatter: &dyn Formatter, text: String, path: &Path) -> Result<String> {
   let info = formatter.file_info(path).await.map_err(Error::Format)?;
   match info.applicable_parser() {
      Some(parser) => formatter.format(&text, path, parser).await.map_err(Error::Format),
      None => Ok(text),
   }
}
