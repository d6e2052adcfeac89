use std::process::ExitCode;

use clap::Parser;
use snapshot_fixtures::{
   cli::{self, Args},
   style,
};

#[tokio::main]
async fn main() -> ExitCode {
   let args = Args::parse();

   match cli::run(args).await {
      Ok(code) => code,
      Err(err) => {
         eprintln!("{} {err}", style::error(style::icons::ERROR));
         ExitCode::FAILURE
      },
   }
}
