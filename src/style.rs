//! Terminal styling utilities for diff rendering and console output.
//!
//! Respects `NO_COLOR` environment variable and terminal capabilities. Tests
//! and the CLI can force a mode with [`set_colors`].

use std::sync::{
   OnceLock,
   atomic::{AtomicU8, Ordering},
};

use owo_colors::OwoColorize;

/// Whether color output is supported (cached on first call).
static COLOR_DETECTED: OnceLock<bool> = OnceLock::new();

const AUTO: u8 = 0;
const FORCE_ON: u8 = 1;
const FORCE_OFF: u8 = 2;

static COLOR_OVERRIDE: AtomicU8 = AtomicU8::new(AUTO);

/// Force colors on or off for the whole process. `None` restores detection.
pub fn set_colors(enabled: Option<bool>) {
   let mode = match enabled {
      None => AUTO,
      Some(true) => FORCE_ON,
      Some(false) => FORCE_OFF,
   };
   COLOR_OVERRIDE.store(mode, Ordering::Relaxed);
}

/// Check if colors should be used.
pub fn colors_enabled() -> bool {
   match COLOR_OVERRIDE.load(Ordering::Relaxed) {
      FORCE_ON => return true,
      FORCE_OFF => return false,
      _ => {},
   }
   *COLOR_DETECTED.get_or_init(|| {
      // NO_COLOR takes precedence (https://no-color.org/)
      if std::env::var("NO_COLOR").is_ok() {
         return false;
      }
      supports_color::on(supports_color::Stream::Stdout).is_some_and(|level| level.has_basic)
   })
}

/// How text gets painted. Resolved once per rendering so a single message
/// never mixes modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
   Plain,
   Ansi,
}

impl Paint {
   /// The mode matching the current terminal settings.
   pub fn detect() -> Self {
      if colors_enabled() { Self::Ansi } else { Self::Plain }
   }

   /// Added content: actual values (green).
   pub fn added(self, s: &str) -> String {
      match self {
         Self::Ansi => s.green().to_string(),
         Self::Plain => s.to_string(),
      }
   }

   /// Removed content: expected values (red).
   pub fn removed(self, s: &str) -> String {
      match self {
         Self::Ansi => s.red().to_string(),
         Self::Plain => s.to_string(),
      }
   }

   /// Muted content: path prefixes and other context (gray).
   pub fn muted(self, s: &str) -> String {
      match self {
         Self::Ansi => s.bright_black().to_string(),
         Self::Plain => s.to_string(),
      }
   }
}

// === Color Palette ===

/// Success: passing fixtures (green + bold).
pub fn success(s: &str) -> String {
   if colors_enabled() {
      s.green().bold().to_string()
   } else {
      s.to_string()
   }
}

/// Warning: written baselines, non-fatal notes (yellow).
pub fn warning(s: &str) -> String {
   if colors_enabled() {
      s.yellow().to_string()
   } else {
      s.to_string()
   }
}

/// Error: failing fixtures (red + bold).
pub fn error(s: &str) -> String {
   if colors_enabled() {
      s.red().bold().to_string()
   } else {
      s.to_string()
   }
}

/// Dim: less important details, file paths (dimmed).
pub fn dim(s: &str) -> String {
   if colors_enabled() {
      s.dimmed().to_string()
   } else {
      s.to_string()
   }
}

/// Bold: headers, fixture names.
pub fn bold(s: &str) -> String {
   if colors_enabled() {
      s.bold().to_string()
   } else {
      s.to_string()
   }
}

/// Print an info line to stderr.
pub fn print_info(msg: &str) {
   if colors_enabled() {
      eprintln!("{} {msg}", icons::INFO.cyan());
   } else {
      eprintln!("{} {msg}", icons::INFO);
   }
}

// === Status Icons ===

pub mod icons {
   pub const SUCCESS: &str = "\u{2713}";
   pub const WARNING: &str = "\u{26A0}";
   pub const ERROR: &str = "\u{2717}";
   pub const INFO: &str = "\u{2139}";
   pub const ARROW: &str = "\u{2192}";
   pub const BULLET: &str = "\u{2022}";
   pub const SAVE: &str = "\u{1F4BE}";
}
