//! String equality assertion with a readable diff.
//!
//! Two strings that both span multiple lines are diffed line by line; anything
//! else is diffed character by character. Additions are what the actual value
//! has over the expected value.

use std::path::Path;

use similar::{ChangeTag, TextDiff};
use thiserror::Error;

use crate::{
   path::pretty_path_in,
   style::Paint,
};

/// Operator recorded on every assertion failure.
pub const STRICT_EQUAL: &str = "===";

const HEADER: &str = "Expected values to be strictly equal:";

/// A failed string comparison.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AssertionError {
   /// Header, optional location, legend and rendered diff
   pub message:           String,
   /// The value that was produced
   pub actual:            String,
   /// The value that was expected
   pub expected:          String,
   /// Always [`STRICT_EQUAL`]
   pub operator:          &'static str,
   /// Marks the message as generated rather than written by a user
   pub generated_message: bool,
}

/// Assert two strings are equal.
///
/// On mismatch the error carries both values and a diff of them. When a
/// `location` is given (typically the baseline file) its path is printed
/// below the header.
pub fn assert_equal(
   actual: &str,
   expected: &str,
   location: Option<&Path>,
) -> Result<(), AssertionError> {
   assert_equal_painted(actual, expected, location, Paint::detect())
}

/// [`assert_equal`] with an explicit paint mode.
pub fn assert_equal_painted(
   actual: &str,
   expected: &str,
   location: Option<&Path>,
   paint: Paint,
) -> Result<(), AssertionError> {
   if actual == expected {
      return Ok(());
   }

   let mut message = format!("{HEADER}\n");
   if let Some(location) = location {
      let cwd = std::env::current_dir().ok();
      message.push_str(&pretty_path_in(location, cwd.as_deref(), paint));
      message.push('\n');
   }
   message.push_str(&legend(paint));
   message.push_str("\n\n");
   message.push_str(&render_diff(actual, expected, paint));
   message.push('\n');

   Err(AssertionError {
      message,
      actual: actual.to_string(),
      expected: expected.to_string(),
      operator: STRICT_EQUAL,
      generated_message: true,
   })
}

fn legend(paint: Paint) -> String {
   format!("{} {}", paint.added("+ actual"), paint.removed("- expected"))
}

/// Render the diff body between `actual` and `expected`.
pub fn render_diff(actual: &str, expected: &str, paint: Paint) -> String {
   if expected.contains('\n') && actual.contains('\n') {
      render_lines(actual, expected, paint)
   } else {
      render_chars(actual, expected, paint)
   }
}

fn render_chars(actual: &str, expected: &str, paint: Paint) -> String {
   let diff = TextDiff::from_chars(expected, actual);

   // Paint runs of the same tag rather than single characters.
   let mut runs: Vec<(ChangeTag, String)> = Vec::new();
   for change in diff.iter_all_changes() {
      if let Some((tag, text)) = runs.last_mut()
         && *tag == change.tag()
      {
         text.push_str(change.value());
         continue;
      }
      runs.push((change.tag(), change.value().to_string()));
   }

   runs
      .iter()
      .map(|(tag, text)| match tag {
         ChangeTag::Insert => paint.added(text),
         ChangeTag::Delete => paint.removed(text),
         ChangeTag::Equal => text.clone(),
      })
      .collect()
}

fn render_lines(actual: &str, expected: &str, paint: Paint) -> String {
   // Lines keep their newline, so `b` and `b\n` differ.
   let diff = TextDiff::from_lines(expected, actual);

   let mut out = String::new();
   for change in diff.iter_all_changes() {
      let line = change.value();
      let line = line.strip_suffix('\n').unwrap_or(line);
      match change.tag() {
         ChangeTag::Equal => {
            out.push_str("  ");
            out.push_str(line);
         },
         ChangeTag::Delete => out.push_str(&paint.removed(&format!("- {line}"))),
         ChangeTag::Insert => out.push_str(&paint.added(&format!("+ {line}"))),
      }
      out.push('\n');
   }
   out
}

#[cfg(test)]
mod tests {
   use super::*;

   fn from_lines(lines: &[&str]) -> String {
      format!("{}\n", lines.join("\n"))
   }

   #[test]
   fn test_equal_strings_pass() {
      let text = from_lines(&["cat", "dog"]);
      assert!(assert_equal_painted(&text, &text, None, Paint::Plain).is_ok());
      assert!(assert_equal_painted("", "", None, Paint::Plain).is_ok());
   }

   #[test]
   fn test_single_line_char_diff() {
      let err = assert_equal_painted("rat", "cat", None, Paint::Plain).unwrap_err();
      assert_eq!(
         err.message,
         "Expected values to be strictly equal:\n+ actual - expected\n\ncrat\n"
      );
      assert_eq!(err.actual, "rat");
      assert_eq!(err.expected, "cat");
      assert_eq!(err.operator, "===");
      assert!(err.generated_message);
   }

   #[test]
   fn test_single_line_char_diff_colored() {
      let err = assert_equal_painted("rat", "cat", None, Paint::Ansi).unwrap_err();
      let expected = format!(
         "{HEADER}\n{} {}\n\n{}{}at\n",
         Paint::Ansi.added("+ actual"),
         Paint::Ansi.removed("- expected"),
         Paint::Ansi.removed("c"),
         Paint::Ansi.added("r"),
      );
      assert_eq!(err.message, expected);
   }

   #[test]
   fn test_multiline_line_diff() {
      let actual = from_lines(&["cat", "dog", "fish"]);
      let expected = from_lines(&["cat", "parrot", "fish"]);
      let err = assert_equal_painted(&actual, &expected, None, Paint::Plain).unwrap_err();
      assert_eq!(
         err.message,
         from_lines(&[
            "Expected values to be strictly equal:",
            "+ actual - expected",
            "",
            "  cat",
            "- parrot",
            "+ dog",
            "  fish",
            "",
         ])
      );
      assert_eq!(err.actual, actual);
      assert_eq!(err.expected, expected);
   }

   #[test]
   fn test_multiline_line_diff_colored() {
      let actual = from_lines(&["cat", "dog", "fish"]);
      let expected = from_lines(&["cat", "parrot", "fish"]);
      let body = render_diff(&actual, &expected, Paint::Ansi);
      assert_eq!(
         body,
         format!(
            "  cat\n{}\n{}\n  fish\n",
            Paint::Ansi.removed("- parrot"),
            Paint::Ansi.added("+ dog")
         )
      );
   }

   #[test]
   fn test_one_sided_newline_uses_char_diff() {
      let body = render_diff("a\nb", "ab", Paint::Plain);
      assert!(!body.contains("+ "));
      assert!(!body.contains("- "));
      assert_eq!(body, "a\nb");
   }

   #[test]
   fn test_removed_blank_line_is_shown() {
      let body = render_diff("a\nb\n", "a\n\nb\n", Paint::Plain);
      assert_eq!(body, "  a\n- \n  b\n");
   }

   #[test]
   fn test_missing_trailing_line() {
      let body = render_diff("a\nb\n", "a\n", Paint::Plain);
      assert_eq!(body, "  a\n+ b\n");
   }

   #[test]
   fn test_missing_final_newline_in_actual() {
      let body = render_diff("a\nb", "a\nb\n", Paint::Plain);
      assert_eq!(body, "  a\n- b\n+ b\n");
   }

   #[test]
   fn test_extra_final_newline_in_actual() {
      let err = assert_equal_painted("a\nb\n", "a\nb", None, Paint::Plain).unwrap_err();
      assert!(err.message.ends_with("\n\n  a\n- b\n+ b\n\n"));
   }

   #[test]
   fn test_long_single_line_diff() {
      let expected = format!("{{\"data\":\"{}\"}}", "x".repeat(200_000));
      let actual = expected.replacen('x', "y", 1);
      let body = render_diff(&actual, &expected, Paint::Plain);
      assert_eq!(body.len(), expected.len() + 1);
      assert!(body.starts_with("{\"data\":\""));
      assert_eq!(body.matches('y').count(), 1);
   }

   #[test]
   fn test_location_is_printed_under_header() {
      let location = std::env::temp_dir().join("fixture").join("expected.txt");
      let err = assert_equal_painted("rat", "cat", Some(&location), Paint::Plain).unwrap_err();
      let mut lines = err.message.lines();
      assert_eq!(lines.next(), Some(HEADER));
      assert_eq!(lines.next(), Some(location.display().to_string().as_str()));
      assert_eq!(lines.next(), Some("+ actual - expected"));
   }

   #[test]
   fn test_error_display_is_message() {
      let err = assert_equal_painted("x", "y", None, Paint::Plain).unwrap_err();
      assert_eq!(err.to_string(), err.message);
   }
}
