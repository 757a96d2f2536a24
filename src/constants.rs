//! This module contains the documented defaults used by the config loader and the display.

/// Default bar origin, top-left of the screen.
pub const DEFAULT_X: i32 = 0;
pub const DEFAULT_Y: i32 = 0;
/// The default width of the bar window in pixels.
pub const DEFAULT_WIDTH: i32 = 800;
/// The default height of the bar window in pixels.
pub const DEFAULT_HEIGHT: i32 = 16;

/// Seconds slept between two ticks. 0 redraws back to back.
pub const DEFAULT_DELAY: u32 = 1;

pub const DEFAULT_FOREGROUND: &str = "white";
pub const DEFAULT_BACKGROUND: &str = "black";

/// Font requested when a field names none, or when its font fails to load.
pub const DEFAULT_FONT: &str = "fixed";

/// Command run by the synthesized field when the config supplies none.
pub const DEFAULT_COMMAND: &str = "date +'%a %d %b %H:%M:%S'";

/// Key of the field list in the config file.
pub const FIELDS_KEY: &str = "text";

/// Longest line, in bytes, kept from a command's output. The rest is dropped.
pub const MAX_LINE_LEN: usize = 1024;

/// Shell used to run field commands.
pub const SHELL: &str = "/bin/sh";

/// Config file read when no `-p` is given. `~` is the user's home.
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/cmdbar/config.yaml";
