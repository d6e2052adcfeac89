//! Command line surface: inspect fixture trees and diff files.

use std::{
   fmt::Write as _,
   path::{Path, PathBuf},
   process::ExitCode,
};

use clap::{Parser, Subcommand, ValueEnum};

use crate::{
   assert::assert_equal,
   config::FixturesConfig,
   error::Result,
   fixtures::{DEFAULT_INPUT, find_options, list_fixture_dirs, resolve_input},
   path::pretty_path,
   style::{self, icons},
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect golden file fixtures", long_about = None)]
pub struct Args {
   /// When to color output
   #[arg(long, value_enum, default_value = "auto", global = true)]
   pub color: ColorChoice,

   /// Path to config file (default: snapshot-fixtures.toml)
   #[arg(long, global = true)]
   pub config: Option<PathBuf>,

   #[command(subcommand)]
   pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
   /// Color when the terminal supports it and `NO_COLOR` is unset
   Auto,
   Always,
   Never,
}

impl ColorChoice {
   pub fn apply(self) {
      style::set_colors(match self {
         Self::Auto => None,
         Self::Always => Some(true),
         Self::Never => Some(false),
      });
   }
}

#[derive(Subcommand, Debug)]
pub enum Command {
   /// List fixtures with their resolved input, options and baseline
   List {
      /// Fixtures root (default: configured directory)
      dir: Option<PathBuf>,

      /// Logical input name to resolve in each fixture
      #[arg(long, default_value = DEFAULT_INPUT)]
      input: String,

      /// Baseline file name to check for
      #[arg(long)]
      expected: Option<String>,
   },

   /// Show the difference between an actual and an expected file
   Diff { actual: PathBuf, expected: PathBuf },
}

/// What `list` found in one fixture directory.
#[derive(Debug)]
pub struct FixtureListing {
   pub name:     String,
   /// Resolved input, or why it could not be resolved
   pub input:    std::result::Result<PathBuf, String>,
   pub options:  Option<PathBuf>,
   /// Baseline path and whether it exists, when a name was requested
   pub baseline: Option<(PathBuf, bool)>,
}

impl FixtureListing {
   pub async fn inspect(
      name: String,
      directory: &Path,
      input: &str,
      expected: Option<&str>,
   ) -> Result<Self> {
      let input = resolve_input(directory, input).await.map_err(|e| e.to_string());
      let options = find_options(directory).await?.map(|(path, _)| path);
      let baseline = match expected {
         Some(expected) => {
            let path = directory.join(expected);
            let exists = tokio::fs::try_exists(&path).await?;
            Some((path, exists))
         },
         None => None,
      };
      Ok(Self { name, input, options, baseline })
   }

   pub fn render(&self) -> String {
      let mut out = format!("{} {}\n", icons::BULLET, style::bold(&self.name));
      match &self.input {
         Ok(path) => {
            let _ = writeln!(out, "  {} input: {}", icons::ARROW, pretty_path(path));
         },
         Err(reason) => {
            let _ = writeln!(out, "  {} {}", style::error(icons::ERROR), reason);
         },
      }
      if let Some(options) = &self.options {
         let _ = writeln!(out, "  {} options: {}", icons::ARROW, pretty_path(options));
      }
      match &self.baseline {
         Some((path, true)) => {
            let _ = writeln!(out, "  {} baseline: {}", icons::ARROW, pretty_path(path));
         },
         Some((path, false)) => {
            let _ = writeln!(
               out,
               "  {} baseline: {} {}",
               style::warning(icons::WARNING),
               pretty_path(path),
               style::dim("(missing)")
            );
         },
         None => {},
      }
      out
   }
}

fn load_config(args: &Args) -> Result<FixturesConfig> {
   match &args.config {
      Some(path) => FixturesConfig::from_file(path),
      None => FixturesConfig::load(),
   }
}

/// Run the parsed command line. Exits with failure when `diff` finds a
/// mismatch.
pub async fn run(args: Args) -> Result<ExitCode> {
   args.color.apply();

   match &args.command {
      Command::List { dir, input, expected } => {
         let root = match dir {
            Some(dir) => dir.clone(),
            None => load_config(&args)?.directory,
         };
         list(&root, input, expected.as_deref()).await?;
         Ok(ExitCode::SUCCESS)
      },
      Command::Diff { actual, expected } => {
         let identical = diff(actual, expected).await?;
         Ok(if identical { ExitCode::SUCCESS } else { ExitCode::FAILURE })
      },
   }
}

async fn list(root: &Path, input: &str, expected: Option<&str>) -> Result<()> {
   let dirs = list_fixture_dirs(root)?;
   if dirs.is_empty() {
      style::print_info(&format!("No fixtures in {}", pretty_path(root)));
      return Ok(());
   }

   for (name, path) in dirs {
      let listing = FixtureListing::inspect(name, &path, input, expected).await?;
      print!("{}", listing.render());
   }
   Ok(())
}

/// Print the diff between two files. Returns whether they are identical.
async fn diff(actual: &Path, expected: &Path) -> Result<bool> {
   let (actual_text, expected_text) =
      tokio::try_join!(tokio::fs::read_to_string(actual), tokio::fs::read_to_string(expected))?;

   match assert_equal(&actual_text, &expected_text, Some(expected)) {
      Ok(()) => {
         println!("{} Files are identical", style::success(icons::SUCCESS));
         Ok(true)
      },
      Err(mismatch) => {
         print!("{}", mismatch.message);
         Ok(false)
      },
   }
}

#[cfg(test)]
mod tests {
   use std::fs;

   use super::*;

   #[test]
   fn test_parse_list() {
      let args = Args::parse_from(["snapshot-fixtures", "list", "fixtures", "--expected", "out.md"]);
      assert_eq!(args.color, ColorChoice::Auto);
      let Command::List { dir, input, expected } = args.command else {
         panic!("expected list");
      };
      assert_eq!(dir, Some(PathBuf::from("fixtures")));
      assert_eq!(input, "input");
      assert_eq!(expected.as_deref(), Some("out.md"));
   }

   #[test]
   fn test_parse_diff_with_global_flags() {
      let args = Args::parse_from(["snapshot-fixtures", "diff", "a.txt", "b.txt", "--color", "never"]);
      assert_eq!(args.color, ColorChoice::Never);
      assert!(matches!(args.command, Command::Diff { .. }));
   }

   #[tokio::test]
   async fn test_listing_reports_fixture_files() {
      style::set_colors(Some(false));
      let dir = tempfile::tempdir().unwrap();
      fs::write(dir.path().join("input.md"), "# x\n").unwrap();
      fs::write(dir.path().join("options.json"), "{}").unwrap();

      let listing =
         FixtureListing::inspect("case".to_string(), dir.path(), "input", Some("output.md"))
            .await
            .unwrap();
      assert_eq!(listing.input.as_ref().unwrap(), &dir.path().join("input.md"));
      assert_eq!(listing.options, Some(dir.path().join("options.json")));
      assert_eq!(listing.baseline, Some((dir.path().join("output.md"), false)));

      let rendered = listing.render();
      assert!(rendered.starts_with("\u{2022} case\n"));
      assert!(rendered.contains("input: "));
      assert!(rendered.contains("(missing)"));
   }

   #[tokio::test]
   async fn test_listing_without_input() {
      style::set_colors(Some(false));
      let dir = tempfile::tempdir().unwrap();

      let listing =
         FixtureListing::inspect("empty".to_string(), dir.path(), "input", None).await.unwrap();
      assert!(listing.input.unwrap_err().starts_with("Input not found in directory"));
      assert!(listing.options.is_none());
      assert!(listing.baseline.is_none());
   }

   #[tokio::test]
   async fn test_diff_detects_mismatch() {
      style::set_colors(Some(false));
      let dir = tempfile::tempdir().unwrap();
      let a = dir.path().join("a.txt");
      let b = dir.path().join("b.txt");
      fs::write(&a, "same\n").unwrap();
      fs::write(&b, "same\n").unwrap();
      assert!(diff(&a, &b).await.unwrap());

      fs::write(&b, "other\n").unwrap();
      assert!(!diff(&a, &b).await.unwrap());

      fs::remove_file(&b).unwrap();
      assert!(diff(&a, &b).await.is_err());
   }
}
