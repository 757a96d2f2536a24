/*
 *  display/traits.rs
 *
 *  cmdbar - command driven status strip
 *  (c) 2020-26 Stuart Hunter
 *
 *  Capability traits every bar surface implements
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

use embedded_graphics::pixelcolor::Rgb888;

use crate::config::BarConfig;
use crate::display::color;
use crate::display::error::DisplayError;
use crate::display::font::FontHandle;
use crate::display::layout::TextExtent;

/// Geometry and colors a surface is created with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSpec {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub foreground: Rgb888,
    pub background: Rgb888,
}

impl SurfaceSpec {
    /// Resolve the bar window settings, falling back to the default
    /// colors when a color string does not parse.
    pub fn from_config(config: &BarConfig) -> Self {
        Self {
            x: config.x,
            y: config.y,
            width: config.width.max(1) as u32,
            height: config.height.max(1) as u32,
            foreground: color::parse_or(&config.foreground, color::foreground()),
            background: color::parse_or(&config.background, color::background()),
        }
    }
}

/// Text measurement capability
pub trait TextMetrics {
    /// Measure `text` as it would be drawn with `font`
    fn measure(&self, font: FontHandle, text: &str) -> TextExtent {
        font.measure(text)
    }
}

/// Minimal surface abstraction - everything the refresh loop draws through
///
/// Opening the display, creating the window and marking it as an
/// undecorated dock happen in each surface's constructor; closing is `Drop`.
pub trait DisplaySurface: TextMetrics {
    /// Geometry and colors the surface was created with
    fn spec(&self) -> &SurfaceSpec;

    /// Block until the surface is first visible
    ///
    /// Surfaces without a window are ready as soon as they exist.
    fn wait_ready(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    /// Load a font by name
    fn load_font(&mut self, name: &str) -> Result<FontHandle, DisplayError> {
        FontHandle::lookup(name).ok_or_else(|| DisplayError::FontNotFound(name.to_string()))
    }

    /// Clear the whole bar to the background color
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw `text` with its baseline origin at (x, y)
    fn draw_text(&mut self, x: i32, y: i32, text: &str, font: FontHandle) -> Result<(), DisplayError>;

    /// Push everything drawn since the last clear to the screen
    fn sync(&mut self) -> Result<(), DisplayError>;
}
