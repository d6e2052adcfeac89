//! External program invocation shared by the formatter and script options
//! loader.

use std::process::Stdio;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::{io::AsyncWriteExt, process::Command};

#[derive(Debug, Error)]
pub enum CommandError {
   #[error("Failed to run {program}: {source}")]
   Spawn {
      program: String,
      #[source]
      source:  std::io::Error,
   },

   #[error("{program} exited with {status}: {stderr}")]
   Failed { program: String, status: std::process::ExitStatus, stderr: String },
}

/// A program plus argument template. Arguments may contain `{name}`
/// placeholders which are substituted per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCommand {
   pub command: String,
   #[serde(default)]
   pub args:    Vec<String>,
}

impl ExternalCommand {
   pub fn new(command: impl Into<String>) -> Self {
      Self { command: command.into(), args: Vec::new() }
   }

   pub fn arg(mut self, arg: impl Into<String>) -> Self {
      self.args.push(arg.into());
      self
   }

   pub fn args<I, S>(mut self, args: I) -> Self
   where
      I: IntoIterator<Item = S>,
      S: Into<String>,
   {
      self.args.extend(args.into_iter().map(Into::into));
      self
   }

   /// Arguments with every `{key}` replaced by its value.
   pub fn expand_args(&self, vars: &[(&str, &str)]) -> Vec<String> {
      self
         .args
         .iter()
         .map(|arg| {
            vars.iter().fold(arg.clone(), |acc, (key, value)| {
               acc.replace(&format!("{{{key}}}"), value)
            })
         })
         .collect()
   }

   /// Run the command, feeding `stdin` if given, and return its stdout.
   pub async fn run(
      &self,
      vars: &[(&str, &str)],
      stdin: Option<&str>,
   ) -> Result<String, CommandError> {
      let spawn_err =
         |source| CommandError::Spawn { program: self.command.clone(), source };

      let mut child = Command::new(&self.command)
         .args(self.expand_args(vars))
         .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
         .stdout(Stdio::piped())
         .stderr(Stdio::piped())
         .spawn()
         .map_err(spawn_err)?;

      // Feed stdin while draining stdout so neither pipe fills up. The pipe is
      // dropped when the write finishes, which closes it.
      let pipe = child.stdin.take();
      let write = async move {
         if let Some(input) = stdin
            && let Some(mut pipe) = pipe
         {
            pipe.write_all(input.as_bytes()).await?;
         }
         Ok::<_, std::io::Error>(())
      };
      let (written, output) = tokio::join!(write, child.wait_with_output());
      let output = output.map_err(spawn_err)?;
      if !output.status.success() {
         return Err(CommandError::Failed {
            program: self.command.clone(),
            status:  output.status,
            stderr:  String::from_utf8_lossy(&output.stderr).trim().to_string(),
         });
      }
      written.map_err(spawn_err)?;

      Ok(String::from_utf8_lossy(&output.stdout).into_owned())
   }
}
