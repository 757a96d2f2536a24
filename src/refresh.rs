/*
 *  refresh.rs
 *
 *  cmdbar - command driven status strip
 *  (c) 2020-26 Stuart Hunter
 *
 *  The refresh loop: run, measure, place and draw every field, then sleep
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

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};
use thiserror::Error;

use crate::config::BarConfig;
use crate::constants::DEFAULT_FONT;
use crate::display::error::DisplayError;
use crate::display::font::FontHandle;
use crate::display::layout;
use crate::display::traits::DisplaySurface;
use crate::executor::{CommandExecutor, ExecError};

/// Error type for the refresh loop. Both kinds end the program.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Exec(#[from] ExecError),
    #[error("{0}")]
    Display(#[from] DisplayError),
}

/// Cancellation token checked by the loop at every tick boundary
///
/// Cloned handles share the same flag. Triggering also wakes a loop that
/// is sleeping between ticks.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        let (flag, cvar) = &*self.inner;
        *flag.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        *self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleep for `timeout` or until triggered. Returns true if triggered.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (flag, cvar) = &*self.inner;
        let guard = flag.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = cvar
            .wait_timeout_while(guard, timeout, |triggered| !*triggered)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

/// One text drawn during a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub x: i32,
    pub y: i32,
    pub text: String,
}

/// Everything a tick draws with: the surface and the resolved bar,
/// each field carrying its loaded font.
pub struct RenderContext<S> {
    surface: S,
    config: BarConfig,
}

impl<S: DisplaySurface> RenderContext<S> {
    /// Load every field's font once. A font that fails to load is
    /// reported and replaced by the default font.
    pub fn new(mut surface: S, mut config: BarConfig) -> Self {
        for field in config.fields.iter_mut() {
            let handle = match surface.load_font(&field.font) {
                Ok(handle) => handle,
                Err(e) => {
                    warn!("{}, using default font", e);
                    surface.load_font(DEFAULT_FONT).unwrap_or_else(|_| FontHandle::fixed())
                }
            };
            debug!("field `{}` uses font {:?}", field.command, handle);
            field.attach_font(handle);
        }

        Self { surface, config }
    }

    pub fn config(&self) -> &BarConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

/// Drives command execution, measurement, placement and drawing
pub struct RefreshLoop<S, E> {
    ctx: RenderContext<S>,
    executor: E,
    ticks: u64,
}

impl<S: DisplaySurface, E: CommandExecutor> RefreshLoop<S, E> {
    pub fn new(ctx: RenderContext<S>, executor: E) -> Self {
        Self { ctx, executor, ticks: 0 }
    }

    pub fn context(&self) -> &RenderContext<S> {
        &self.ctx
    }

    /// Ticks completed so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Draw one full frame.
    ///
    /// Fields run strictly in order; each command finishes and is drawn
    /// before the next one starts.
    pub fn tick(&mut self) -> Result<Vec<DrawCall>, RefreshError> {
        let started = Instant::now();
        let bar_height = self.ctx.config.height;
        let surface = &mut self.ctx.surface;

        surface.clear()?;

        let mut drawn = Vec::with_capacity(self.ctx.config.fields.len());
        for field in &self.ctx.config.fields {
            let text = self.executor.run(&field.command)?;
            let font = field.font_handle.unwrap_or_default();
            let extent = surface.measure(font, &text);
            let (x, y) = layout::position(field.bounds(bar_height), extent, field.align);

            surface.draw_text(x, y, &text, font)?;
            drawn.push(DrawCall { x, y, text });
        }

        surface.sync()?;
        self.ticks += 1;
        trace!("tick {} drew {} fields in {:?}", self.ticks, drawn.len(), started.elapsed());

        Ok(drawn)
    }

    /// Tick until `shutdown` is triggered.
    ///
    /// Waits for the surface to become visible first. The token is checked
    /// before each tick, and the sleep between ticks ends early when it is
    /// triggered. Returns the number of ticks drawn.
    pub fn run(&mut self, shutdown: &Shutdown) -> Result<u64, RefreshError> {
        self.ctx.surface.wait_ready()?;
        info!(
            "Bar ready, refreshing {} field(s) every {}s",
            self.ctx.config.fields.len(),
            self.ctx.config.delay
        );

        let delay = Duration::from_secs(self.ctx.config.delay as u64);
        while !shutdown.is_triggered() {
            let drawn = self.tick()?;
            if log::log_enabled!(log::Level::Trace) {
                for call in &drawn {
                    trace!("  ({}, {}) {:?}", call.x, call.y, call.text);
                }
            }
            if !delay.is_zero() && shutdown.wait_timeout(delay) {
                break;
            }
        }

        info!("Refresh loop stopped after {} tick(s)", self.ticks);
        Ok(self.ticks)
    }
}
