/*
 *  display/window.rs
 *
 *  cmdbar - command driven status strip
 *  (c) 2020-26 Stuart Hunter
 *
 *  Desktop window surface: an undecorated dock window showing the bar
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

use std::sync::mpsc::{self, Receiver};
use std::thread;

use log::{debug, error, info};
use pixels::{Pixels, SurfaceTexture};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{Event, StartCause, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoopBuilder};
use winit::window::WindowBuilder;
#[cfg(target_os = "linux")]
use winit::platform::x11::{WindowBuilderExtX11, XWindowType};

use crate::display::error::DisplayError;
use crate::display::font::FontHandle;
use crate::display::framebuffer::{Canvas, FrameSurface};
use crate::display::traits::{DisplaySurface, SurfaceSpec, TextMetrics};

/// Messages from the refresh thread to the window
#[derive(Debug)]
pub enum BarEvent {
    /// A finished frame, RGBA8
    Frame(Vec<u8>),
    /// The refresh loop ended with this exit code
    Exit(i32),
}

/// Surface handed to the refresh thread
///
/// Frames are rendered into memory and sent to the window on `sync`.
pub struct WindowSurface {
    frame: FrameSurface,
    ready: Receiver<()>,
    visible: bool,
}

impl TextMetrics for WindowSurface {}

impl DisplaySurface for WindowSurface {
    fn spec(&self) -> &SurfaceSpec {
        self.frame.spec()
    }

    fn wait_ready(&mut self) -> Result<(), DisplayError> {
        if !self.visible {
            self.ready.recv().map_err(|_| DisplayError::Closed)?;
            self.visible = true;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.frame.clear()
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, font: FontHandle) -> Result<(), DisplayError> {
        self.frame.draw_text(x, y, text, font)
    }

    fn sync(&mut self) -> Result<(), DisplayError> {
        self.frame.sync()
    }
}

/// Open the bar window and run `worker` against it on its own thread.
///
/// The window event loop owns the calling thread and does not return;
/// the process exits with the code `worker` returns, or 0 when the
/// window is closed.
pub fn run<F>(spec: SurfaceSpec, worker: F) -> Result<(), DisplayError>
where
    F: FnOnce(WindowSurface) -> i32 + Send + 'static,
{
    let init = |e: &dyn std::fmt::Display| DisplayError::InitializationFailed(e.to_string());

    let event_loop = EventLoopBuilder::<BarEvent>::with_user_event().build();

    let builder = WindowBuilder::new()
        .with_title(env!("CARGO_PKG_NAME"))
        .with_inner_size(PhysicalSize::new(spec.width, spec.height))
        .with_position(PhysicalPosition::new(spec.x, spec.y))
        .with_resizable(false)
        .with_decorations(false);
    #[cfg(target_os = "linux")]
    let builder = builder.with_x11_window_type(vec![XWindowType::Dock]);
    let window = builder.build(&event_loop).map_err(|e| init(&e))?;

    let size = window.inner_size();
    let texture = SurfaceTexture::new(size.width, size.height, &window);
    let mut pixels = Pixels::new(spec.width, spec.height, texture).map_err(|e| init(&e))?;
    Canvas::new(spec.width, spec.height, spec.background).write_rgba(pixels.frame_mut());

    let (ready_tx, ready_rx) = mpsc::channel();
    let frame_proxy = event_loop.create_proxy();
    let exit_proxy = event_loop.create_proxy();

    let sink = Box::new(move |canvas: &Canvas| {
        let mut rgba = vec![0u8; canvas.width() * canvas.height() * 4];
        canvas.write_rgba(&mut rgba);
        frame_proxy.send_event(BarEvent::Frame(rgba)).map_err(|_| DisplayError::Closed)
    });
    let surface = WindowSurface {
        frame: FrameSurface::new(spec).with_sink(sink),
        ready: ready_rx,
        visible: false,
    };

    thread::Builder::new()
        .name("refresh".into())
        .spawn(move || {
            let code = worker(surface);
            if exit_proxy.send_event(BarEvent::Exit(code)).is_err() {
                debug!("window already gone");
            }
        })
        .map_err(|e| init(&e))?;

    info!("Bar window {}x{}+{}+{}", spec.width, spec.height, spec.x, spec.y);
    let mut ready_tx = Some(ready_tx);
    window.request_redraw();

    event_loop.run(move |event, _, control_flow| match event {
        Event::NewEvents(StartCause::Init) => *control_flow = ControlFlow::Wait,
        Event::UserEvent(BarEvent::Frame(rgba)) => {
            let frame = pixels.frame_mut();
            let len = frame.len().min(rgba.len());
            frame[..len].copy_from_slice(&rgba[..len]);
            window.request_redraw();
        }
        Event::UserEvent(BarEvent::Exit(code)) => *control_flow = ControlFlow::ExitWithCode(code),
        Event::RedrawRequested(_) => {
            if let Err(e) = pixels.render() {
                error!("Rendering the bar failed: {}", e);
                *control_flow = ControlFlow::ExitWithCode(1);
                return;
            }
            // first exposure opens the gate for the refresh thread
            if let Some(tx) = ready_tx.take() {
                debug!("bar window exposed");
                let _ = tx.send(());
            }
        }
        Event::WindowEvent { event: WindowEvent::CloseRequested, .. } => {
            *control_flow = ControlFlow::ExitWithCode(0);
        }
        _ => {}
    })
}
