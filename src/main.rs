mod commands;
mod core;
mod deploy;
mod module;
mod release;
mod ui;

use clap::{Parser, Subcommand};
use crate::core::error::{print_error, ShipError};
use crate::module::Granularity;
use std::path::PathBuf;

/// Package modular source trees into versioned deployment bundles
#[derive(Parser)]
#[command(name = "modship")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct ShipCli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Deploy every module into a versioned bundle tree
  Deploy {
    /// Target directory for the deployment bundles
    target: Option<PathBuf>,
    /// Output deployment report in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Detect changed modules, bump versions, commit and tag
  Release {
    /// The source tag to check changes from
    #[arg(short = 's', long = "source", default_value = "current")]
    source: String,
    /// Test run only. Do not commit changes
    #[arg(short = 't', long = "test")]
    test: bool,
    /// The version update type
    #[arg(short = 'u', long = "update", value_enum, default_value_t = Granularity::Micro)]
    update: Granularity,
    /// Output release plan in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = ShipCli::parse();

  let result = match cli.command {
    Commands::Deploy { target, json } => commands::run_deploy(target, json),
    Commands::Release {
      source,
      test,
      update,
      json,
    } => commands::run_release(source, update, test, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ShipError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
