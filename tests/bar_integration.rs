/*
 *  tests/bar_integration.rs
 *
 *  Integration tests - config file through to drawn frames
 *
 *  cmdbar - command driven status strip
 *  (c) 2020-26 Stuart Hunter
 */

use std::collections::HashMap;
use std::io::{self, Write};

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

use cmdbar::config::{self, ConfigSource, Overrides, YamlSource};
use cmdbar::display::mock::{MockSurface, SurfaceCall};
use cmdbar::display::{Alignment, DisplaySurface, FontHandle, FrameSurface, SurfaceSpec};
use cmdbar::{CommandExecutor, ExecError, RefreshError, RefreshLoop, RenderContext, Shutdown};

const TWO_FIELDS: &str = r#"
x: 0
y: 0
width: 800
height: 16
foreground: white
background: black
delay: 0
text:
  - command: clock
    font: 6x13
    x: 0
    width: 400
    align: left
  - command: battery
    font: 9x15
    x: 400
    width: 400
    align: right
"#;

/// Executor answering from a table; unknown commands fail to spawn
#[derive(Default)]
struct Scripted {
    outputs: HashMap<String, String>,
    runs: usize,
}

impl Scripted {
    fn with(mut self, command: &str, output: &str) -> Self {
        self.outputs.insert(command.into(), output.into());
        self
    }
}

impl CommandExecutor for Scripted {
    fn run(&mut self, command: &str) -> Result<String, ExecError> {
        self.runs += 1;
        self.outputs.get(command).cloned().ok_or_else(|| ExecError::Spawn {
            command: command.into(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such command"),
        })
    }
}

fn load(yaml: &str) -> cmdbar::BarConfig {
    config::load(&YamlSource::parse(yaml).unwrap())
}

#[test]
fn test_config_file_resolves_two_fields() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(TWO_FIELDS.as_bytes()).unwrap();

    let bar = config::load_path(file.path(), &Overrides::default());

    assert_eq!((bar.width, bar.height, bar.delay), (800, 16, 0));
    assert_eq!(bar.fields.len(), 2);
    assert_eq!(bar.fields[0].command, "clock");
    assert_eq!(bar.fields[0].align, Alignment::Left);
    assert_eq!(bar.fields[1].command, "battery");
    assert_eq!((bar.fields[1].x, bar.fields[1].width), (400, 400));
    assert_eq!(bar.fields[1].align, Alignment::Right);
}

#[test]
fn test_missing_config_file_shows_clock() {
    let dir = tempfile::tempdir().unwrap();
    let bar = config::load_path(&dir.path().join("absent.yaml"), &Overrides::default());

    assert_eq!(bar, cmdbar::BarConfig::default());
    assert_eq!(bar.fields.len(), 1);
    assert_eq!(bar.fields[0].width, bar.width);
}

#[test]
fn test_source_is_queried_by_key() {
    let source = YamlSource::parse(TWO_FIELDS).unwrap();
    assert!(source.is_record());
    assert!(matches!(source.get_int("width"), config::Setting::Value(800)));
    assert!(matches!(source.get_int("nope"), config::Setting::Missing));
}

#[test]
fn test_loop_draws_frames_until_shutdown() {
    let bar = load(TWO_FIELDS);
    let shutdown = Shutdown::new();
    let surface = MockSurface::new(SurfaceSpec::from_config(&bar)).stop_after(3, shutdown.clone());
    let state = surface.state();
    let exec = Scripted::default().with("clock", "Mon 01 Jan 12:00:00").with("battery", "87%");

    let mut refresh = RefreshLoop::new(RenderContext::new(surface, bar), exec);
    let ticks = refresh.run(&shutdown).unwrap();

    assert_eq!(ticks, 3);
    let state = state.lock().unwrap();
    assert_eq!(state.ready_waits, 1);
    assert_eq!(state.fonts_requested, vec!["6x13", "9x15"]);

    let frames = state.frames();
    assert_eq!(frames.len(), 3);
    let battery_width = FontHandle::lookup("9x15").unwrap().measure("87%").width;
    for frame in &frames {
        match frame.as_slice() {
            [
                SurfaceCall::Draw { x: x0, text: t0, font: f0, .. },
                SurfaceCall::Draw { x: x1, text: t1, font: f1, .. },
            ] => {
                assert_eq!((*x0, t0.as_str(), *f0), (0, "Mon 01 Jan 12:00:00", "6x13"));
                assert_eq!((*x1, t1.as_str(), *f1), (800 - battery_width, "87%", "9x15"));
                // left field stays inside its box, right field inside the other
                let clock_width = FontHandle::lookup("6x13").unwrap().measure(t0).width;
                assert!(x0 + clock_width <= 400);
                assert!(*x1 >= 400);
            }
            other => panic!("unexpected frame {:?}", other),
        }
    }
}

#[test]
fn test_spawn_failure_ends_the_loop() {
    let bar = load(TWO_FIELDS);
    let shutdown = Shutdown::new();
    let surface = MockSurface::new(SurfaceSpec::from_config(&bar));
    let state = surface.state();
    let exec = Scripted::default().with("clock", "12:00");

    let mut refresh = RefreshLoop::new(RenderContext::new(surface, bar), exec);
    let err = refresh.run(&shutdown).unwrap_err();

    assert!(matches!(err, RefreshError::Exec(_)));
    assert!(err.to_string().contains("battery"));
    assert_eq!(state.lock().unwrap().sync_count, 0);
}

#[test]
fn test_overrides_apply_to_every_field() {
    let source = YamlSource::parse(TWO_FIELDS).unwrap();
    let overrides = Overrides {
        command: Some("uptime".into()),
        font: Some("5x8".into()),
        size: Some((1024, 20)),
        delay: Some(5),
    };
    let bar = config::load_with(&source, &overrides);

    assert_eq!((bar.width, bar.height, bar.delay), (1024, 20, 5));
    assert!(bar.fields.iter().all(|f| f.command == "uptime" && f.font == "5x8"));
}

#[test]
fn test_frame_surface_renders_text() {
    let bar = load(TWO_FIELDS);
    let shutdown = Shutdown::new();
    let exec = Scripted::default().with("clock", "12:00").with("battery", "87%");
    let surface = FrameSurface::new(SurfaceSpec::from_config(&bar));

    let mut refresh = RefreshLoop::new(RenderContext::new(surface, bar), exec);
    refresh.tick().unwrap();
    refresh.tick().unwrap();
    shutdown.trigger();
    assert_eq!(refresh.run(&shutdown).unwrap(), 2);

    let surface = refresh.context().surface();
    assert_eq!(surface.frames(), 2);
    assert_eq!(surface.spec().background, Rgb888::BLACK);
    let lit = surface.canvas().count(Rgb888::WHITE);
    assert!(lit > 0);
    assert!(lit < 800 * 16);
}

#[test]
fn test_window_is_a_default_feature() {
    let manifest = std::fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml")).unwrap();
    let default = manifest
        .lines()
        .skip_while(|line| line.trim() != "[features]")
        .find(|line| line.trim_start().starts_with("default"))
        .unwrap();
    assert!(default.contains("\"window\""), "{}", default);
}
