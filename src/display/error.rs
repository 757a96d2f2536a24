/*
 *  display/error.rs
 *
 *  cmdbar - command driven status strip
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error type for display surfaces
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

use std::fmt;
use std::error::Error;

/// Unified error type for all display surface operations
#[derive(Debug)]
pub enum DisplayError {
    /// Window or surface could not be created
    InitializationFailed(String),

    /// Requested font is not known to the surface
    FontNotFound(String),

    /// Color string could not be parsed
    InvalidColor(String),

    /// Drawing operation failed
    DrawingError(String),

    /// The surface went away (window closed, event loop gone)
    Closed,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::InitializationFailed(msg) =>
                write!(f, "Display initialization failed: {}", msg),
            DisplayError::FontNotFound(name) =>
                write!(f, "Unable to load font \"{}\"", name),
            DisplayError::InvalidColor(value) =>
                write!(f, "Invalid color \"{}\"", value),
            DisplayError::DrawingError(msg) =>
                write!(f, "Drawing error: {}", msg),
            DisplayError::Closed =>
                write!(f, "Display surface closed"),
        }
    }
}

impl Error for DisplayError {}

impl From<std::convert::Infallible> for DisplayError {
    fn from(err: std::convert::Infallible) -> Self {
        match err {}
    }
}
