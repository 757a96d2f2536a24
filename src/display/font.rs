/*
 *  display/font.rs
 *
 *  cmdbar - command driven status strip
 *  (c) 2020-26 Stuart Hunter
 *
 *  Bitmap font registry and text metrics
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

use embedded_graphics::mono_font::{
    ascii::{
        FONT_10X20, FONT_4X6, FONT_5X7, FONT_5X8, FONT_6X10, FONT_6X12, FONT_6X13,
        FONT_6X13_BOLD, FONT_6X9, FONT_7X13, FONT_7X13_BOLD, FONT_7X14, FONT_7X14_BOLD,
        FONT_8X13, FONT_8X13_BOLD, FONT_9X15, FONT_9X15_BOLD, FONT_9X18, FONT_9X18_BOLD,
    },
    MonoFont,
};

use super::layout::TextExtent;

// X11 misc-fixed style names. "fixed" must stay first, it is the fallback.
const FONTS: &[(&str, &MonoFont<'static>)] = &[
    ("fixed", &FONT_6X13),
    ("4x6", &FONT_4X6),
    ("5x7", &FONT_5X7),
    ("5x8", &FONT_5X8),
    ("6x9", &FONT_6X9),
    ("6x10", &FONT_6X10),
    ("6x12", &FONT_6X12),
    ("6x13", &FONT_6X13),
    ("6x13b", &FONT_6X13_BOLD),
    ("6x13bold", &FONT_6X13_BOLD),
    ("7x13", &FONT_7X13),
    ("7x13b", &FONT_7X13_BOLD),
    ("7x13bold", &FONT_7X13_BOLD),
    ("7x14", &FONT_7X14),
    ("7x14b", &FONT_7X14_BOLD),
    ("7x14bold", &FONT_7X14_BOLD),
    ("8x13", &FONT_8X13),
    ("8x13b", &FONT_8X13_BOLD),
    ("8x13bold", &FONT_8X13_BOLD),
    ("9x15", &FONT_9X15),
    ("9x15b", &FONT_9X15_BOLD),
    ("9x15bold", &FONT_9X15_BOLD),
    ("9x18", &FONT_9X18),
    ("9x18b", &FONT_9X18_BOLD),
    ("9x18bold", &FONT_9X18_BOLD),
    ("10x20", &FONT_10X20),
];

/// Handle to a loaded font
///
/// Handles are cheap to copy and valid for the life of the process.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct FontHandle(usize);

impl FontHandle {
    /// Find a font by name, ignoring case
    pub fn lookup(name: &str) -> Option<Self> {
        let wanted = name.trim().to_ascii_lowercase();
        FONTS
            .iter()
            .position(|(font_name, _)| *font_name == wanted)
            .map(FontHandle)
    }

    /// The fallback font, always available
    pub fn fixed() -> Self {
        FontHandle(0)
    }

    pub fn name(&self) -> &'static str {
        FONTS[self.0].0
    }

    pub fn font(&self) -> &'static MonoFont<'static> {
        FONTS[self.0].1
    }

    /// Measure `text` as drawn in this font.
    ///
    /// Width is the advance of every character plus the spacing between
    /// them. The ascent includes the baseline row, so ascent + descent is
    /// the glyph cell height.
    pub fn measure(&self, text: &str) -> TextExtent {
        let font = self.font();
        let count = text.chars().count() as i32;
        let advance = font.character_size.width as i32;
        let spacing = font.character_spacing as i32;
        let width = if count == 0 {
            0
        } else {
            count * advance + (count - 1) * spacing
        };
        let ascent = font.baseline as i32 + 1;
        let descent = font.character_size.height as i32 - ascent;

        TextExtent { width, ascent, descent }
    }
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FontHandle({})", self.name())
    }
}

/// Names accepted by [`FontHandle::lookup`]
pub fn available() -> impl Iterator<Item = &'static str> {
    FONTS.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(FontHandle::lookup("9X15B"), FontHandle::lookup("9x15b"));
        assert!(FontHandle::lookup(" 6x10 ").is_some());
    }

    #[test]
    fn test_unknown_font() {
        assert!(FontHandle::lookup("-*-terminus-*-r-*-*-16-*-*-*-*-*-*-*").is_none());
        assert!(FontHandle::lookup("").is_none());
    }

    #[test]
    fn test_fixed_is_6x13() {
        let fixed = FontHandle::fixed();
        assert_eq!(fixed.name(), "fixed");
        assert_eq!(fixed.measure("abc"), FontHandle::lookup("6x13").unwrap().measure("abc"));
    }

    #[test]
    fn test_measure_width() {
        let handle = FontHandle::lookup("6x10").unwrap();
        let font = handle.font();
        let advance = font.character_size.width as i32;
        let spacing = font.character_spacing as i32;

        assert_eq!(handle.measure("").width, 0);
        assert_eq!(handle.measure("x").width, advance);
        assert_eq!(handle.measure("12:00").width, 5 * advance + 4 * spacing);
        // characters, not bytes
        assert_eq!(handle.measure("°C").width, 2 * advance + spacing);
    }

    #[test]
    fn test_ascent_plus_descent_is_cell_height() {
        for name in available() {
            let handle = FontHandle::lookup(name).unwrap();
            let extent = handle.measure("Ag");
            assert!(extent.ascent > 0, "{name}");
            assert!(extent.descent >= 0, "{name}");
            assert_eq!(
                extent.ascent + extent.descent,
                handle.font().character_size.height as i32,
                "{name}"
            );
        }
    }
}
