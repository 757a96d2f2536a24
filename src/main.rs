/*
 *  main.rs
 *
 *  cmdbar - command driven status strip
 *  (c) 2020-26 Stuart Hunter
 *
 *  Entry point - command line, logging and signal handling
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::thread;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use env_logger::Env;
use log::{debug, info, warn};
use tokio::signal::unix::{signal, SignalKind};

use cmdbar::config::{self, BarConfig, Overrides};
use cmdbar::constants::DEFAULT_CONFIG_PATH;
use cmdbar::display::{DisplaySurface, SurfaceSpec};
use cmdbar::{RefreshLoop, RenderContext, ShellExecutor, Shutdown};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

fn cli() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(Arg::new("path")
        .short('p')
        .long("path")
        .help("Config file")
        .default_value(DEFAULT_CONFIG_PATH)
        .required(false))
        .arg(Arg::new("exec")
        .short('e')
        .long("exec")
        .help("Command to run in every field")
        .required(false))
        .arg(Arg::new("font")
        .short('f')
        .long("font")
        .help("Font for every field (fixed, 6x10, 9x15B, ...)")
        .required(false))
        .arg(Arg::new("size")
        .short('s')
        .long("size")
        .help("Bar size as WIDTHxHEIGHT")
        .value_parser(config::parse_size)
        .required(false))
        .arg(Arg::new("delay")
        .short('d')
        .long("delay")
        .help("Seconds between refreshes")
        .value_parser(value_parser!(u32))
        .required(false))
        .arg(Arg::new("verbose")
        .action(ArgAction::SetTrue)
        .short('v')
        .long("verbose")
        .help("Enable debug log level")
        .required(false))
        .arg(Arg::new("dump-config")
        .action(ArgAction::SetTrue)
        .long("dump-config")
        .help("Print the resolved config and exit")
        .required(false))
        .after_help("Each field in the config's `text` list runs its command every \
            refresh and shows the first line of output.")
}

/// Waits for SIGINT, SIGTERM or SIGHUP.
async fn signal_handler() -> Result<(), Box<dyn std::error::Error>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

/// Turn the first signal into a shutdown request; a second one exits at
/// once, for when a field command hangs.
fn watch_signals(shutdown: Shutdown) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Unable to start signal runtime")?;

    thread::Builder::new()
        .name("signals".into())
        .spawn(move || {
            let outcome = runtime.block_on(async {
                signal_handler().await?;
                shutdown.trigger();
                signal_handler().await
            });
            match outcome {
                Ok(()) => {
                    warn!("Second signal, exiting without waiting for the current refresh");
                    std::process::exit(1);
                }
                Err(e) => warn!("Signal handling unavailable: {}", e),
            }
        })
        .context("Unable to spawn signal thread")?;
    Ok(())
}

fn drive<S: DisplaySurface>(surface: S, bar: BarConfig, shutdown: &Shutdown) -> Result<()> {
    let ctx = RenderContext::new(surface, bar);
    let mut refresh = RefreshLoop::new(ctx, ShellExecutor::new());
    refresh.run(shutdown)?;
    Ok(())
}

#[cfg(feature = "window")]
fn run(bar: BarConfig, shutdown: Shutdown) -> Result<()> {
    use cmdbar::display::window;

    let spec = SurfaceSpec::from_config(&bar);
    window::run(spec, move |surface| match drive(surface, bar, &shutdown) {
        Ok(()) => 0,
        Err(e) => {
            log::error!("{:#}", e);
            1
        }
    })
    .context("Unable to open the bar window")
}

#[cfg(not(feature = "window"))]
fn run(bar: BarConfig, shutdown: Shutdown) -> Result<()> {
    use cmdbar::display::FrameSurface;

    info!("Built without the window feature, rendering off-screen only");
    let surface = FrameSurface::new(SurfaceSpec::from_config(&bar));
    drive(surface, bar, &shutdown)
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    let verbose = matches.get_flag("verbose");

    env_logger::Builder::from_env(Env::default().default_filter_or(if verbose {"debug"} else {"info"}))
        .format_timestamp_secs()
        .init();

    info!("{} v.{} built {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let path = matches
        .get_one::<String>("path")
        .map(|p| config::expand_home(p))
        .unwrap_or_else(config::default_config_path);
    let overrides = Overrides {
        command: matches.get_one::<String>("exec").cloned(),
        font: matches.get_one::<String>("font").cloned(),
        size: matches.get_one::<(i32, i32)>("size").copied(),
        delay: matches.get_one::<u32>("delay").copied(),
    };
    let bar = config::load_path(&path, &overrides);

    if matches.get_flag("dump-config") {
        print!("{}", bar.to_yaml()?);
        return Ok(());
    }
    if verbose {
        debug!("Resolved config:\n{}", bar.to_yaml()?);
    }

    let shutdown = Shutdown::new();
    watch_signals(shutdown.clone())?;

    run(bar, shutdown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn test_cli_parses_overrides() {
        let matches = cli()
            .try_get_matches_from(["cmdbar", "-p", "/tmp/bar.yaml", "-s", "1024x20", "-d", "0", "-e", "date", "-v"])
            .unwrap();
        assert_eq!(matches.get_one::<String>("path").unwrap(), "/tmp/bar.yaml");
        assert_eq!(matches.get_one::<(i32, i32)>("size"), Some(&(1024, 20)));
        assert_eq!(matches.get_one::<u32>("delay"), Some(&0));
        assert_eq!(matches.get_one::<String>("exec").unwrap(), "date");
        assert!(matches.get_flag("verbose"));
    }

    #[test]
    fn test_cli_rejects_bad_input() {
        assert!(cli().try_get_matches_from(["cmdbar", "-x"]).is_err());
        assert!(cli().try_get_matches_from(["cmdbar", "-s", "wide"]).is_err());
        assert!(cli().try_get_matches_from(["cmdbar", "-d", "-1"]).is_err());
    }

    #[test]
    fn test_cli_help_is_not_a_failure() {
        let err = cli().try_get_matches_from(["cmdbar", "-h"]).unwrap_err();
        assert_eq!(err.exit_code(), 0);
    }
}
