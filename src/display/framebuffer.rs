/*
 *  display/framebuffer.rs
 *
 *  cmdbar - command driven status strip
 *  (c) 2020-26 Stuart Hunter
 *
 *  In-memory RGB framebuffer surface
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

use core::convert::Infallible;

use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use log::trace;

use crate::display::error::DisplayError;
use crate::display::font::FontHandle;
use crate::display::traits::{DisplaySurface, SurfaceSpec, TextMetrics};

/// A runtime-sized RGB pixel buffer for embedded-graphics.
#[derive(Debug, Clone)]
pub struct Canvas {
    buf: Vec<Rgb888>,
    w: usize,
    h: usize,
}

impl Canvas {
    pub fn new(width: u32, height: u32, fill: Rgb888) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![fill; w * h], w, h }
    }

    pub fn width(&self) -> usize { self.w }
    pub fn height(&self) -> usize { self.h }

    pub fn fill(&mut self, color: Rgb888) {
        self.buf.fill(color);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb888> {
        if x < self.w && y < self.h {
            Some(self.buf[y * self.w + x])
        } else {
            None
        }
    }

    /// Number of pixels of exactly `color`
    pub fn count(&self, color: Rgb888) -> usize {
        self.buf.iter().filter(|c| **c == color).count()
    }

    /// Copy into an RGBA8 buffer (4 bytes per pixel), as windows expect.
    /// Copies as many pixels as fit.
    pub fn write_rgba(&self, out: &mut [u8]) {
        for (dst, c) in out.chunks_exact_mut(4).zip(self.buf.iter()) {
            dst.copy_from_slice(&[c.r(), c.g(), c.b(), 0xff]);
        }
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        // pixels outside the bar are dropped, fields are never clipped individually
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

/// Receives every finished frame on `sync`
pub type FrameSink = Box<dyn FnMut(&Canvas) -> Result<(), DisplayError> + Send>;

/// Surface that renders the bar into memory
///
/// Used directly when running headless, and as the back buffer of the
/// window surface, which installs a sink to receive each frame.
pub struct FrameSurface {
    spec: SurfaceSpec,
    canvas: Canvas,
    frames: u64,
    sink: Option<FrameSink>,
}

impl FrameSurface {
    pub fn new(spec: SurfaceSpec) -> Self {
        Self {
            canvas: Canvas::new(spec.width, spec.height, spec.background),
            spec,
            frames: 0,
            sink: None,
        }
    }

    /// Builder: publish frames to `sink`
    pub fn with_sink(mut self, sink: FrameSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Frames synced so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl TextMetrics for FrameSurface {}

impl DisplaySurface for FrameSurface {
    fn spec(&self) -> &SurfaceSpec {
        &self.spec
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.canvas.fill(self.spec.background);
        Ok(())
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, font: FontHandle) -> Result<(), DisplayError> {
        let style = MonoTextStyle::new(font.font(), self.spec.foreground);
        Text::with_baseline(text, Point::new(x, y), style, Baseline::Alphabetic)
            .draw(&mut self.canvas)?;
        Ok(())
    }

    fn sync(&mut self) -> Result<(), DisplayError> {
        self.frames += 1;
        trace!("frame {} ready", self.frames);
        if let Some(sink) = self.sink.as_mut() {
            sink(&self.canvas)?;
        }
        Ok(())
    }
}
