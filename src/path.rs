//! Display formatting for fixture paths.

use std::path::{MAIN_SEPARATOR, Path};

use crate::style::Paint;

/// Turn a path into a display string for console output.
///
/// - A single trailing separator is stripped.
/// - When the path lives under the current directory, that prefix is muted.
pub fn pretty_path(path: &Path) -> String {
   let cwd = std::env::current_dir().ok();
   pretty_path_in(path, cwd.as_deref(), Paint::detect())
}

/// [`pretty_path`] against an explicit working directory and paint mode.
pub fn pretty_path_in(path: &Path, cwd: Option<&Path>, paint: Paint) -> String {
   let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
   let mut pretty = absolute.display().to_string();
   if pretty.len() > 1 && pretty.ends_with(MAIN_SEPARATOR) {
      pretty.pop();
   }

   let Some(cwd) = cwd else {
      return pretty;
   };
   let mut prefix = cwd.display().to_string();
   if !prefix.ends_with(MAIN_SEPARATOR) {
      prefix.push(MAIN_SEPARATOR);
   }

   match pretty.strip_prefix(&prefix) {
      Some(rest) => format!("{}{rest}", paint.muted(&prefix)),
      None => pretty,
   }
}
