/*
 *  display/field.rs
 *
 *  cmdbar - command driven status strip
 *  (c) 2020-26 Stuart Hunter
 *
 *  Field definition - one command driven text segment of the bar
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

use serde::Serialize;

use super::font::FontHandle;
use super::layout::FieldBox;
use crate::constants::{DEFAULT_COMMAND, DEFAULT_FONT};

/// Field alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    #[default]
    Middle,
    Right,
}

impl Alignment {
    /// Resolve a config string. Only exact "left" and "right" select those
    /// modes, anything else (including "center" or "Left") is Middle.
    pub fn from_config(value: &str) -> Self {
        match value {
            "left" => Alignment::Left,
            "right" => Alignment::Right,
            _ => Alignment::Middle,
        }
    }
}

/// Field definition
///
/// A field owns a horizontal box within the bar. Every tick the field's
/// command is run and the first line of its output is drawn inside the box
/// using the field's font and alignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    /// Shell command line whose first output line is the field text
    pub command: String,

    /// Font name requested from the display surface
    pub font: String,

    /// Box offset within the bar (top-left origin)
    pub x: i32,
    pub y: i32,

    /// Box width used for alignment
    pub width: i32,

    /// Text alignment within the box
    pub align: Alignment,

    /// Loaded once when the render context is built, never reloaded
    #[serde(skip)]
    pub font_handle: Option<FontHandle>,
}

impl Field {
    /// Create a field with default font and alignment at the bar origin
    pub fn new(command: impl Into<String>, width: i32) -> Self {
        Self {
            command: command.into(),
            font: DEFAULT_FONT.to_string(),
            x: 0,
            y: 0,
            width,
            align: Alignment::default(),
            font_handle: None,
        }
    }

    /// The synthesized field used when the config provides none
    pub fn clock(bar_width: i32) -> Self {
        Self::new(DEFAULT_COMMAND, bar_width)
    }

    /// Builder: set font name
    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// Builder: set alignment
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.align = alignment;
        self
    }

    /// Builder: set box origin
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Record the loaded font. The first handle sticks.
    pub fn attach_font(&mut self, handle: FontHandle) {
        if self.font_handle.is_none() {
            self.font_handle = Some(handle);
        }
    }

    /// Alignment box of this field; it spans the full bar height
    pub fn bounds(&self, bar_height: i32) -> FieldBox {
        FieldBox {
            x: self.x,
            y: self.y,
            width: self.width,
            height: bar_height,
        }
    }
}
