/*
 *  display/mock.rs
 *
 *  cmdbar - command driven status strip
 *  (c) 2020-26 Stuart Hunter
 *
 *  Recording surface for testing without a display
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

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::display::error::DisplayError;
use crate::display::font::FontHandle;
use crate::display::traits::{DisplaySurface, SurfaceSpec, TextMetrics};
use crate::refresh::Shutdown;

/// One request made of the surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Clear,
    Draw { x: i32, y: i32, text: String, font: &'static str },
    Sync,
}

/// Internal state for the mock surface (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct MockSurfaceState {
    /// Every call in order
    pub calls: Vec<SurfaceCall>,

    /// Font names requested through load_font, in order
    pub fonts_requested: Vec<String>,

    /// Number of times wait_ready() was called
    pub ready_waits: usize,

    /// Number of times sync() was called
    pub sync_count: u64,

    /// Simulate failures (for error testing)
    pub simulate_draw_failure: bool,
}

/// Mock display surface
///
/// Records every operation and can stop a refresh loop after a given
/// number of frames, so the loop can be driven to completion in tests.
#[derive(Debug, Clone)]
pub struct MockSurface {
    spec: SurfaceSpec,
    state: Arc<Mutex<MockSurfaceState>>,
    stop: Option<(u64, Shutdown)>,
}

impl MockSurface {
    pub fn new(spec: SurfaceSpec) -> Self {
        Self {
            spec,
            state: Arc::new(Mutex::new(MockSurfaceState::default())),
            stop: None,
        }
    }

    /// Builder: trigger `shutdown` once `frames` frames have been synced
    pub fn stop_after(mut self, frames: u64, shutdown: Shutdown) -> Self {
        self.stop = Some((frames, shutdown));
        self
    }

    /// Shared state handle, stays valid after the surface is moved
    pub fn state(&self) -> Arc<Mutex<MockSurfaceState>> {
        self.state.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockSurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MockSurfaceState {
    /// Draw calls grouped by frame, one entry per sync
    pub fn frames(&self) -> Vec<Vec<SurfaceCall>> {
        let mut frames = Vec::new();
        let mut current = Vec::new();
        for call in &self.calls {
            match call {
                SurfaceCall::Sync => frames.push(std::mem::take(&mut current)),
                SurfaceCall::Draw { .. } => current.push(call.clone()),
                SurfaceCall::Clear => current.clear(),
            }
        }
        frames
    }
}

impl TextMetrics for MockSurface {}

impl DisplaySurface for MockSurface {
    fn spec(&self) -> &SurfaceSpec {
        &self.spec
    }

    fn wait_ready(&mut self) -> Result<(), DisplayError> {
        self.lock().ready_waits += 1;
        Ok(())
    }

    fn load_font(&mut self, name: &str) -> Result<FontHandle, DisplayError> {
        self.lock().fonts_requested.push(name.to_string());
        FontHandle::lookup(name).ok_or_else(|| DisplayError::FontNotFound(name.to_string()))
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.lock().calls.push(SurfaceCall::Clear);
        Ok(())
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, font: FontHandle) -> Result<(), DisplayError> {
        let mut state = self.lock();
        if state.simulate_draw_failure {
            return Err(DisplayError::DrawingError("Simulated draw failure".into()));
        }
        state.calls.push(SurfaceCall::Draw { x, y, text: text.to_string(), font: font.name() });
        Ok(())
    }

    fn sync(&mut self) -> Result<(), DisplayError> {
        let synced = {
            let mut state = self.lock();
            state.calls.push(SurfaceCall::Sync);
            state.sync_count += 1;
            state.sync_count
        };
        if let Some((frames, shutdown)) = &self.stop {
            if synced >= *frames {
                shutdown.trigger();
            }
        }
        Ok(())
    }
}
