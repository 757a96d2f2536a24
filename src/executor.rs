/*
 *  executor.rs
 *
 *  cmdbar - command driven status strip
 *  (c) 2020-26 Stuart Hunter
 *
 *  Runs field commands and captures the first line of output
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

use std::io::{self, BufRead, BufReader, Read};
use std::process::{Command, Stdio};

use log::debug;
use thiserror::Error;

use crate::constants::{MAX_LINE_LEN, SHELL};

/// Error type for command execution.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Failed to run command: {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Runs a command line and returns the first line it prints
pub trait CommandExecutor {
    fn run(&mut self, command: &str) -> Result<String, ExecError>;
}

/// Executor running each command through the system shell
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    shell: String,
    max_line: usize,
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self {
            shell: SHELL.to_string(),
            max_line: MAX_LINE_LEN,
        }
    }
}

impl ShellExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: use another shell binary (invoked as `<shell> -c <command>`)
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Builder: cap on the returned line, in bytes
    pub fn with_max_line(mut self, max_line: usize) -> Self {
        self.max_line = max_line;
        self
    }
}

impl CommandExecutor for ShellExecutor {
    fn run(&mut self, command: &str) -> Result<String, ExecError> {
        let spawn_error = |source| ExecError::Spawn { command: command.to_string(), source };

        let mut child = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(spawn_error)?;

        // a read error after a successful spawn just ends the line early
        let line = match child.stdout.take() {
            Some(stdout) => read_first_line(stdout, self.max_line).unwrap_or_else(|e| {
                debug!("reading output of `{}` failed: {}", command, e);
                String::new()
            }),
            None => String::new(),
        };

        // stdout is closed by now; anything further the child writes gets EPIPE
        match child.wait() {
            Ok(status) if !status.success() => debug!("`{}` exited with {}", command, status),
            Ok(_) => {}
            Err(e) => debug!("waiting for `{}` failed: {}", command, e),
        }

        Ok(line)
    }
}

/// Read up to the first newline, keeping at most `max_len` bytes.
///
/// The newline (and a preceding carriage return) is stripped. A line
/// longer than `max_len` is cut silently, backing off to the last whole
/// UTF-8 character; other invalid UTF-8 is replaced.
pub fn read_first_line<R: Read>(reader: R, max_len: usize) -> io::Result<String> {
    let mut buf = Vec::new();
    BufReader::new(reader)
        .take(max_len as u64 + 1)
        .read_until(b'\n', &mut buf)?;

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }

    if buf.len() > max_len {
        buf.truncate(max_len);
        let keep = complete_prefix_len(&buf);
        buf.truncate(keep);
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

// Length of `buf` without a multi-byte character cut short at its end.
// Only the tail is inspected; invalid bytes earlier on are left for the
// lossy conversion.
fn complete_prefix_len(buf: &[u8]) -> usize {
    let tail = buf.len().saturating_sub(3);
    for start in (tail..buf.len()).rev() {
        let byte = buf[start];
        if byte & 0b1100_0000 == 0b1000_0000 {
            continue;
        }
        let needed = match byte {
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            _ => return buf.len(),
        };
        return if buf.len() - start < needed { start } else { buf.len() };
    }
    buf.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line_only() {
        let line = read_first_line(&b"first\nsecond\nthird\n"[..], 64).unwrap();
        assert_eq!(line, "first");
    }

    #[test]
    fn test_no_trailing_newline() {
        assert_eq!(read_first_line(&b"42%"[..], 64).unwrap(), "42%");
        assert_eq!(read_first_line(&b""[..], 64).unwrap(), "");
        assert_eq!(read_first_line(&b"\n"[..], 64).unwrap(), "");
    }

    #[test]
    fn test_crlf_stripped() {
        assert_eq!(read_first_line(&b"dos\r\nline"[..], 64).unwrap(), "dos");
    }

    #[test]
    fn test_long_line_truncated() {
        let long = vec![b'x'; 5000];
        let line = read_first_line(&long[..], 1024).unwrap();
        assert_eq!(line.len(), 1024);

        // exactly at the cap, newline included, nothing is cut
        let mut exact = vec![b'y'; 8];
        exact.push(b'\n');
        assert_eq!(read_first_line(&exact[..], 8).unwrap(), "yyyyyyyy");
    }

    #[test]
    fn test_truncation_respects_char_boundary() {
        // "aé" is 3 bytes; a 2 byte cap would split the é
        let line = read_first_line("aéb".as_bytes(), 2).unwrap();
        assert_eq!(line, "a");
    }

    #[test]
    fn test_split_char_trimmed_after_invalid_byte() {
        // the 0xff is replaced, the é cut by the cap is dropped
        let line = read_first_line(&[0xff, b'a', 0xc3, 0xa9, b'b'][..], 3).unwrap();
        assert_eq!(line, "\u{fffd}a");

        let emoji = read_first_line("ab\u{1f600}".as_bytes(), 5).unwrap();
        assert_eq!(emoji, "ab");
        let whole = read_first_line("ab\u{1f600}c".as_bytes(), 6).unwrap();
        assert_eq!(whole, "ab\u{1f600}");
    }

    #[test]
    fn test_invalid_utf8_replaced() {
        let line = read_first_line(&[b'o', 0xff, b'k'][..], 64).unwrap();
        assert_eq!(line, "o\u{fffd}k");
    }

    #[test]
    fn test_shell_executor_runs_command() {
        let mut exec = ShellExecutor::new();
        assert_eq!(exec.run("printf 'one\\ntwo\\n'").unwrap(), "one");
        assert_eq!(exec.run("echo   spaced   out").unwrap(), "spaced out");
    }

    #[test]
    fn test_shell_executor_empty_output() {
        let mut exec = ShellExecutor::new();
        assert_eq!(exec.run("true").unwrap(), "");
        assert_eq!(exec.run("exit 3").unwrap(), "");
    }

    #[test]
    fn test_shell_executor_endless_output() {
        let mut exec = ShellExecutor::new().with_max_line(16);
        assert_eq!(exec.run("yes").unwrap(), "y");
        assert_eq!(exec.run("yes abcdefghijklmnopqrstuvwxyz | tr -d '\\n'").unwrap(), "abcdefghijklmnop");
    }

    #[test]
    fn test_spawn_failure() {
        let mut exec = ShellExecutor::new().with_shell("/nonexistent/shell");
        let err = exec.run("date").unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
        assert!(err.to_string().contains("date"));
    }
}
