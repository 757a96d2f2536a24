/*
 *  display/color.rs
 *
 *  cmdbar - command driven status strip
 *  (c) 2020-26 Stuart Hunter
 *
 *  Color strings as accepted in the bar config
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

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use log::warn;

use super::error::DisplayError;

const NAMED: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 255, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("cyan", (0, 255, 255)),
    ("magenta", (255, 0, 255)),
    ("orange", (255, 165, 0)),
    ("gray", (190, 190, 190)),
    ("grey", (190, 190, 190)),
    ("darkgray", (169, 169, 169)),
    ("darkgrey", (169, 169, 169)),
    ("lightgray", (211, 211, 211)),
    ("lightgrey", (211, 211, 211)),
];

/// Parse a color string
///
/// Accepted forms: a color name (`white`, `darkgrey`, ...), `#rgb`,
/// `#rrggbb` and X11 style `rgb:r/g/b` with 1 to 4 hex digits per channel.
pub fn parse(value: &str) -> Result<Rgb888, DisplayError> {
    let value = value.trim();
    let invalid = || DisplayError::InvalidColor(value.to_string());

    if let Some(hex) = value.strip_prefix('#') {
        let digits = match hex.len() {
            _ if !hex.is_ascii() => return Err(invalid()),
            3 => 1,
            6 => 2,
            _ => return Err(invalid()),
        };
        let channel = |i: usize| scale(&hex[i * digits..(i + 1) * digits]).ok_or_else(invalid);
        return Ok(Rgb888::new(channel(0)?, channel(1)?, channel(2)?));
    }

    if let Some(triple) = value.strip_prefix("rgb:") {
        let channels: Vec<u8> = triple
            .split('/')
            .map(scale)
            .collect::<Option<_>>()
            .ok_or_else(invalid)?;
        return match channels.as_slice() {
            [r, g, b] => Ok(Rgb888::new(*r, *g, *b)),
            _ => Err(invalid()),
        };
    }

    let name = value.to_ascii_lowercase().replace(' ', "");
    NAMED
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, (r, g, b))| Rgb888::new(*r, *g, *b))
        .ok_or_else(invalid)
}

/// Parse a color, logging and substituting `fallback` when it is unusable
pub fn parse_or(value: &str, fallback: Rgb888) -> Rgb888 {
    parse(value).unwrap_or_else(|e| {
        warn!("{}, using default", e);
        fallback
    })
}

/// Default foreground
pub fn foreground() -> Rgb888 {
    Rgb888::WHITE
}

/// Default background
pub fn background() -> Rgb888 {
    Rgb888::BLACK
}

// Scale 1-4 hex digits to 0-255, "f" and "ffff" both being full intensity.
fn scale(digits: &str) -> Option<u8> {
    if digits.is_empty() || digits.len() > 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    let max = (1u32 << (4 * digits.len() as u32)) - 1;
    Some((value * 255 / max) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!(parse("white").unwrap(), Rgb888::WHITE);
        assert_eq!(parse("Black").unwrap(), Rgb888::BLACK);
        assert_eq!(parse("dark grey").unwrap(), Rgb888::new(169, 169, 169));
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(parse("#CCCCCC").unwrap(), Rgb888::new(0xcc, 0xcc, 0xcc));
        assert_eq!(parse("#f00").unwrap(), Rgb888::new(255, 0, 0));
        assert!(parse("#12345").is_err());
        assert!(parse("#gggggg").is_err());
    }

    #[test]
    fn test_x11_rgb_colors() {
        assert_eq!(parse("rgb:ff/80/00").unwrap(), Rgb888::new(255, 128, 0));
        assert_eq!(parse("rgb:f/0/ffff").unwrap(), Rgb888::new(255, 0, 255));
        assert!(parse("rgb:ff/80").is_err());
    }

    #[test]
    fn test_parse_or_falls_back() {
        assert_eq!(parse_or("no-such-colour", Rgb888::BLACK), Rgb888::BLACK);
        assert_eq!(parse_or("red", Rgb888::BLACK), Rgb888::RED);
    }
}
