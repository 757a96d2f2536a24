/*
 *  config.rs
 *
 *  cmdbar - command driven status strip
 *  (c) 2020-26 Stuart Hunter
 *
 *  Bar configuration: file source, per-key defaults and command line overrides
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

use std::fs;
use std::path::{Path, PathBuf};

use dirs_next::home_dir;
use log::{debug, info, warn};
use serde::Serialize;
use serde_yaml::Value;
use thiserror::Error;

use crate::constants::{
    DEFAULT_BACKGROUND, DEFAULT_COMMAND, DEFAULT_CONFIG_PATH, DEFAULT_DELAY, DEFAULT_FONT,
    DEFAULT_FOREGROUND, DEFAULT_HEIGHT, DEFAULT_WIDTH, DEFAULT_X, DEFAULT_Y, FIELDS_KEY,
};
use crate::display::field::{Alignment, Field};

/// Error type for reading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Config file {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Config file {}: top level must be a mapping of settings", .path.display())]
    NotAMapping { path: PathBuf },
    #[error("Unable to write config: {0}")]
    Emit(#[source] serde_yaml::Error),
}

impl ConfigError {
    /// 1-based line of a syntax error, when known
    pub fn line(&self) -> Option<usize> {
        match self {
            ConfigError::Yaml { source, .. } => source.location().map(|l| l.line()),
            _ => None,
        }
    }
}

/// Result of looking one key up
#[derive(Debug, Clone, PartialEq)]
pub enum Setting<T> {
    /// Key absent (or null)
    Missing,
    /// Key present but unusable, with the reason
    Invalid(String),
    Value(T),
}

/// Typed key lookups over a structured settings source
pub trait ConfigSource: Sized {
    /// Whether this node holds keyed settings at all
    fn is_record(&self) -> bool;

    fn get_str(&self, key: &str) -> Setting<String>;

    fn get_int(&self, key: &str) -> Setting<i32>;

    /// A nested list of records
    fn get_list(&self, key: &str) -> Setting<Vec<Self>>;
}

/// Config source backed by a YAML document
#[derive(Debug, Clone, Default)]
pub struct YamlSource {
    value: Value,
}

impl YamlSource {
    /// A source with no settings; every lookup is missing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        let value: Value = serde_yaml::from_str(text)?;
        Ok(Self { value })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let source = Self::parse(&text)
            .map_err(|source| ConfigError::Yaml { path: path.to_path_buf(), source })?;

        // an empty file is a valid config with nothing set
        if source.value.is_null() || source.is_record() {
            Ok(source)
        } else {
            Err(ConfigError::NotAMapping { path: path.to_path_buf() })
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

impl ConfigSource for YamlSource {
    fn is_record(&self) -> bool {
        self.value.is_mapping()
    }

    fn get_str(&self, key: &str) -> Setting<String> {
        match self.value.get(key) {
            None | Some(Value::Null) => Setting::Missing,
            Some(Value::String(s)) => Setting::Value(s.clone()),
            Some(other) => Setting::Invalid(format!("expected a string, found {}", kind(other))),
        }
    }

    fn get_int(&self, key: &str) -> Setting<i32> {
        match self.value.get(key) {
            None | Some(Value::Null) => Setting::Missing,
            Some(Value::Number(n)) => match n.as_i64().map(i32::try_from) {
                Some(Ok(v)) => Setting::Value(v),
                Some(Err(_)) => Setting::Invalid(format!("{} is out of range", n)),
                None => Setting::Invalid(format!("expected an integer, found {}", n)),
            },
            Some(Value::String(s)) => match s.trim().parse::<i32>() {
                Ok(v) => Setting::Value(v),
                Err(_) => Setting::Invalid(format!("expected an integer, found \"{}\"", s)),
            },
            Some(other) => Setting::Invalid(format!("expected an integer, found {}", kind(other))),
        }
    }

    fn get_list(&self, key: &str) -> Setting<Vec<Self>> {
        match self.value.get(key) {
            None | Some(Value::Null) => Setting::Missing,
            Some(Value::Sequence(items)) => Setting::Value(
                items.iter().map(|value| YamlSource { value: value.clone() }).collect(),
            ),
            Some(other) => Setting::Invalid(format!("expected a list, found {}", kind(other))),
        }
    }
}

/// Whole-bar settings plus the ordered fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarConfig {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub foreground: String,
    pub background: String,

    /// Seconds between ticks
    pub delay: u32,

    /// Draw order; never empty
    #[serde(rename = "text")]
    pub fields: Vec<Field>,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            x: DEFAULT_X,
            y: DEFAULT_Y,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            foreground: DEFAULT_FOREGROUND.to_string(),
            background: DEFAULT_BACKGROUND.to_string(),
            delay: DEFAULT_DELAY,
            fields: vec![Field::clock(DEFAULT_WIDTH)],
        }
    }
}

impl BarConfig {
    /// YAML rendering of the resolved settings
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(ConfigError::Emit)
    }
}

/// Command line settings layered over the file. All fields are Options
/// so only what was given takes effect.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Command for every field
    pub command: Option<String>,
    /// Font for every field
    pub font: Option<String>,
    /// Bar width and height
    pub size: Option<(i32, i32)>,
    pub delay: Option<u32>,
}

impl Overrides {
    fn apply_to_fields(&self, fields: &mut [Field]) {
        for field in fields.iter_mut() {
            if let Some(command) = self.command.as_ref().filter(|c| !c.is_empty()) {
                field.command = command.clone();
            }
            if let Some(font) = self.font.as_ref().filter(|f| !f.is_empty()) {
                field.font = font.clone();
            }
        }
    }
}

// Each resolver handles one key; a bad value never affects its neighbours.

fn resolve_int<S: ConfigSource>(source: &S, scope: &str, key: &str, default: i32) -> i32 {
    match source.get_int(key) {
        Setting::Value(v) => v,
        Setting::Missing => {
            debug!("{}{} not set, using {}", scope, key, default);
            default
        }
        Setting::Invalid(why) => {
            warn!("{}{}: {}, using default {}", scope, key, why, default);
            default
        }
    }
}

fn resolve_positive<S: ConfigSource>(source: &S, scope: &str, key: &str, default: i32) -> i32 {
    let value = resolve_int(source, scope, key, default);
    if value <= 0 {
        warn!("{}{} must be positive, got {}, using {}", scope, key, value, default);
        default
    } else {
        value
    }
}

fn resolve_str<S: ConfigSource>(source: &S, scope: &str, key: &str, default: &str) -> String {
    match source.get_str(key) {
        Setting::Value(v) if !v.trim().is_empty() => v,
        Setting::Value(_) => {
            warn!("{}{} is empty, using \"{}\"", scope, key, default);
            default.to_string()
        }
        Setting::Missing => {
            debug!("{}{} not set, using \"{}\"", scope, key, default);
            default.to_string()
        }
        Setting::Invalid(why) => {
            warn!("{}{}: {}, using \"{}\"", scope, key, why, default);
            default.to_string()
        }
    }
}

fn resolve_align<S: ConfigSource>(source: &S, scope: &str) -> Alignment {
    match source.get_str("align") {
        Setting::Value(v) => {
            let align = Alignment::from_config(&v);
            if align == Alignment::Middle && v != "middle" {
                debug!("{}align \"{}\" not recognised, using middle", scope, v);
            }
            align
        }
        Setting::Missing => Alignment::default(),
        Setting::Invalid(why) => {
            warn!("{}align: {}, using middle", scope, why);
            Alignment::default()
        }
    }
}

fn resolve_delay<S: ConfigSource>(source: &S) -> u32 {
    let delay = resolve_int(source, "", "delay", DEFAULT_DELAY as i32);
    u32::try_from(delay).unwrap_or_else(|_| {
        warn!("delay must not be negative, got {}, using {}", delay, DEFAULT_DELAY);
        DEFAULT_DELAY
    })
}

fn resolve_field<S: ConfigSource>(record: &S, index: usize, bar_width: i32) -> Field {
    let scope = format!("{}[{}].", FIELDS_KEY, index);
    Field {
        command: resolve_str(record, &scope, "command", DEFAULT_COMMAND),
        font: resolve_str(record, &scope, "font", DEFAULT_FONT),
        x: resolve_int(record, &scope, "x", 0),
        y: resolve_int(record, &scope, "y", 0),
        width: resolve_positive(record, &scope, "width", bar_width),
        align: resolve_align(record, &scope),
        font_handle: None,
    }
}

fn resolve_fields<S: ConfigSource>(source: &S, bar_width: i32) -> Vec<Field> {
    let records = match source.get_list(FIELDS_KEY) {
        Setting::Value(records) => records,
        Setting::Missing => {
            info!("No `{}` fields configured, showing the clock", FIELDS_KEY);
            return vec![Field::clock(bar_width)];
        }
        Setting::Invalid(why) => {
            warn!("{}: {}, showing the clock", FIELDS_KEY, why);
            return vec![Field::clock(bar_width)];
        }
    };

    let fields: Vec<Field> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            if record.is_record() {
                Some(resolve_field(record, index, bar_width))
            } else {
                warn!("{}[{}] is not a mapping of settings, skipped", FIELDS_KEY, index);
                None
            }
        })
        .collect();

    if fields.is_empty() {
        warn!("`{}` has no usable fields, showing the clock", FIELDS_KEY);
        return vec![Field::clock(bar_width)];
    }
    fields
}

/// Build the bar settings from `source`, defaulting each missing or
/// invalid setting on its own.
pub fn load<S: ConfigSource>(source: &S) -> BarConfig {
    load_with(source, &Overrides::default())
}

/// As [`load`], with command line overrides taking precedence over the source
pub fn load_with<S: ConfigSource>(source: &S, overrides: &Overrides) -> BarConfig {
    let (width, height) = match overrides.size {
        Some(size) => size,
        None => (
            resolve_positive(source, "", "width", DEFAULT_WIDTH),
            resolve_positive(source, "", "height", DEFAULT_HEIGHT),
        ),
    };
    let delay = match overrides.delay {
        Some(delay) => delay,
        None => resolve_delay(source),
    };

    let mut fields = resolve_fields(source, width);
    overrides.apply_to_fields(&mut fields);

    BarConfig {
        x: resolve_int(source, "", "x", DEFAULT_X),
        y: resolve_int(source, "", "y", DEFAULT_Y),
        width,
        height,
        foreground: resolve_str(source, "", "foreground", DEFAULT_FOREGROUND),
        background: resolve_str(source, "", "background", DEFAULT_BACKGROUND),
        delay,
        fields,
    }
}

/// Read the config file at `path`. Never fails: an unreadable or
/// malformed file is reported and the built-in defaults are used.
pub fn load_path(path: &Path, overrides: &Overrides) -> BarConfig {
    match YamlSource::from_file(path) {
        Ok(source) => {
            info!("Loaded config from {}", path.display());
            load_with(&source, overrides)
        }
        Err(e) => {
            warn!("{}", e);
            warn!("Using built-in defaults");
            load_with(&YamlSource::empty(), overrides)
        }
    }
}

/// Expand a leading `~` to the user's home directory
pub fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(path),
    };
    match home_dir() {
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// Path used when none is given on the command line
pub fn default_config_path() -> PathBuf {
    expand_home(DEFAULT_CONFIG_PATH)
}

/// Parse a `WIDTHxHEIGHT` size, both positive
pub fn parse_size(value: &str) -> Result<(i32, i32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got \"{}\"", value))?;
    let dim = |s: &str| match s.trim().parse::<i32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(format!("\"{}\" is not a positive size", s)),
    };
    Ok((dim(w)?, dim(h)?))
}
