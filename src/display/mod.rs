/*
 *  display/mod.rs
 *
 *  cmdbar - command driven status strip
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display module - surfaces, fonts and field placement
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod color;
pub mod font;

// Field model and placement
pub mod field;
pub mod layout;

// Surfaces
pub mod framebuffer;
pub mod mock;

// Desktop window (only with window feature)
#[cfg(feature = "window")]
pub mod window;

// Re-exports for convenience
pub use traits::{DisplaySurface, SurfaceSpec, TextMetrics};
pub use error::DisplayError;
pub use field::{Alignment, Field};
pub use font::FontHandle;
pub use framebuffer::{Canvas, FrameSurface};
pub use layout::{FieldBox, TextExtent};
