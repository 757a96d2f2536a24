/*
 *  lib.rs
 *
 *  cmdbar - command driven status strip
 *  (c) 2020-26 Stuart Hunter
 *
 *  Library root
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

//! A status strip of command driven text fields.
//!
//! Each field runs a shell command every tick and draws the first line of
//! its output, aligned within its box. [`config`] turns a settings file
//! into a [`config::BarConfig`], [`refresh::RefreshLoop`] redraws it
//! forever on any [`display::DisplaySurface`].

pub mod config;
pub mod constants;
pub mod display;
pub mod executor;
pub mod refresh;

pub use config::{BarConfig, ConfigError, Overrides};
pub use executor::{CommandExecutor, ExecError, ShellExecutor};
pub use refresh::{DrawCall, RefreshError, RefreshLoop, RenderContext, Shutdown};
