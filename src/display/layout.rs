/*
 *  display/layout.rs
 *
 *  cmdbar - command driven status strip
 *  (c) 2020-26 Stuart Hunter
 *
 *  Text placement within a field box
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

use super::field::Alignment;

/// Box a field's text is aligned within
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,

    /// Height used for vertical centering (the bar height)
    pub height: i32,
}

/// Measured size of a string in a given font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextExtent {
    /// Advance width in pixels
    pub width: i32,

    /// Pixels above the baseline
    pub ascent: i32,

    /// Pixels below the baseline
    pub descent: i32,
}

/// Compute the baseline origin for text of `extent` inside `field`.
///
/// All divisions are `i32` division, truncating toward zero, so an
/// oversized odd overflow rounds toward the box origin: a 40px string in a
/// 21px box centers at `x + (21 - 40) / 2 = x - 9`. Text wider than its
/// box spills out of it. Sums saturate at the `i32` range, so coordinates
/// near the limits pin to the edge instead of wrapping.
pub fn position(field: FieldBox, extent: TextExtent, align: Alignment) -> (i32, i32) {
    let x = match align {
        Alignment::Left => field.x,
        Alignment::Middle => field.x.saturating_add(field.width.saturating_sub(extent.width) / 2),
        Alignment::Right => field.x.saturating_add(field.width).saturating_sub(extent.width),
    };
    let y = field
        .y
        .saturating_add(field.height / 2)
        .saturating_add(extent.ascent.saturating_sub(extent.descent) / 2);

    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(width: i32) -> FieldBox {
        FieldBox { x: 10, y: 0, width, height: 16 }
    }

    fn text(width: i32) -> TextExtent {
        TextExtent { width, ascent: 11, descent: 2 }
    }

    #[test]
    fn test_horizontal_modes() {
        assert_eq!(position(boxed(100), text(40), Alignment::Left).0, 10);
        assert_eq!(position(boxed(100), text(40), Alignment::Middle).0, 40);
        assert_eq!(position(boxed(100), text(40), Alignment::Right).0, 70);
    }

    #[test]
    fn test_vertical_centering() {
        // 0 + 16/2 + (11 - 2)/2 = 8 + 4
        assert_eq!(position(boxed(100), text(40), Alignment::Left).1, 12);

        let offset = FieldBox { x: 0, y: 3, width: 100, height: 17 };
        // 3 + 17/2 + (11 - 2)/2 = 3 + 8 + 4
        assert_eq!(position(offset, text(40), Alignment::Middle).1, 15);
    }

    #[test]
    fn test_oversized_text_is_not_clamped() {
        assert_eq!(position(boxed(20), text(40), Alignment::Middle).0, 0);
        assert_eq!(position(boxed(20), text(40), Alignment::Right).0, -10);
        assert_eq!(position(boxed(20), text(40), Alignment::Left).0, 10);
    }

    #[test]
    fn test_odd_overflow_truncates_toward_zero() {
        // (21 - 40) / 2 == -9, not -10
        assert_eq!(position(boxed(21), text(40), Alignment::Middle).0, 1);
        let wide = FieldBox { x: 0, y: 0, width: 1, height: 16 };
        assert_eq!(position(wide, text(4), Alignment::Middle).0, -1);
    }

    #[test]
    fn test_descent_larger_than_ascent() {
        let odd = TextExtent { width: 0, ascent: 1, descent: 4 };
        // 0 + 8 + (-3)/2 = 8 - 1
        assert_eq!(position(boxed(10), odd, Alignment::Left).1, 7);
    }

    #[test]
    fn test_unrecognized_align_matches_middle() {
        let center = Alignment::from_config("center");
        assert_eq!(
            position(boxed(100), text(40), center),
            position(boxed(100), text(40), Alignment::from_config("middle"))
        );
    }

    #[test]
    fn test_extreme_coordinates_saturate() {
        let far = FieldBox { x: 2_147_483_000, y: i32::MAX, width: 800, height: 16 };
        assert_eq!(position(far, text(40), Alignment::Right), (i32::MAX - 40, i32::MAX));
        assert_eq!(position(far, text(40), Alignment::Middle).0, 2_147_483_380);

        let near = FieldBox { x: i32::MIN, y: i32::MIN, width: i32::MIN, height: 16 };
        assert_eq!(position(near, text(40), Alignment::Middle).0, i32::MIN);
        assert_eq!(position(near, text(40), Alignment::Right).0, i32::MIN);
        assert_eq!(position(near, text(40), Alignment::Left), (i32::MIN, i32::MIN + 12));
    }

    #[test]
    fn test_position_is_pure() {
        let a = position(boxed(333), text(57), Alignment::Middle);
        let b = position(boxed(333), text(57), Alignment::Middle);
        assert_eq!(a, b);
    }
}
