//! Bounded, observable subprocess execution
//!
//! Every external tool invocation goes through [`run`]: explicit working
//! directory, an optional scrubbed environment, per-stream file redirection,
//! and per-line callbacks that can abort the run while the process is still
//! alive. The call blocks until the process terminates or a callback signals
//! a fatal condition.

use crate::error::AdapterError;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::time::Duration;

/// Per-line observer. Returning an error kills the child and aborts the run.
pub type LineCallback<'a> = &'a (dyn Fn(&str) -> Result<(), AdapterError> + Send + Sync);

/// Execution options for one subprocess run.
#[derive(Default)]
pub struct RunOptions<'a> {
    /// Working directory for the child
    pub cwd: Option<&'a Path>,

    /// Redirect raw stdout bytes to this file
    pub stdout_file: Option<&'a Path>,

    /// Redirect raw stderr bytes to this file
    pub stderr_file: Option<&'a Path>,

    /// Observe each stdout line as it arrives
    pub on_stdout_line: Option<LineCallback<'a>>,

    /// Observe each stderr line as it arrives
    pub on_stderr_line: Option<LineCallback<'a>>,

    /// Explicit child environment. `Some` clears the parent environment so
    /// variables leak in neither direction.
    pub env: Option<&'a BTreeMap<String, String>>,
}

/// Run `args` to completion and return its exit status.
///
/// A stream without a file sink or callback is discarded. Spawn failures
/// surface as [`AdapterError::Io`]; a callback error kills the child and is
/// returned as-is, even if the process had not yet exited.
pub fn run(args: &[String], opts: &RunOptions) -> Result<ExitStatus, AdapterError> {
    let (program, rest) = args
        .split_first()
        .ok_or_else(|| AdapterError::ToolExecution("empty command line".to_string()))?;

    let mut cmd = Command::new(program);
    cmd.args(rest).stdin(Stdio::null());
    if let Some(cwd) = opts.cwd {
        cmd.current_dir(cwd);
    }
    if let Some(env) = opts.env {
        cmd.env_clear();
        cmd.envs(env);
    }

    let capture_stdout = opts.stdout_file.is_some() || opts.on_stdout_line.is_some();
    let capture_stderr = opts.stderr_file.is_some() || opts.on_stderr_line.is_some();
    cmd.stdout(if capture_stdout {
        Stdio::piped()
    } else {
        Stdio::null()
    });
    cmd.stderr(if capture_stderr {
        Stdio::piped()
    } else {
        Stdio::null()
    });

    let mut child = cmd.spawn()?;
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (fatal_tx, fatal_rx) = mpsc::channel::<AdapterError>();

    std::thread::scope(|scope| {
        if let Some(stream) = stdout {
            let tx = fatal_tx.clone();
            let file = opts.stdout_file;
            let callback = opts.on_stdout_line;
            scope.spawn(move || drain_stream(stream, file, callback, tx));
        }
        if let Some(stream) = stderr {
            let tx = fatal_tx.clone();
            let file = opts.stderr_file;
            let callback = opts.on_stderr_line;
            scope.spawn(move || drain_stream(stream, file, callback, tx));
        }
        drop(fatal_tx);

        loop {
            if let Ok(fatal) = fatal_rx.try_recv() {
                let _ = child.kill();
                let _ = child.wait();
                return Err(fatal);
            }
            match child.try_wait()? {
                Some(status) => {
                    // The pipes may still hold a tail; recv unblocks once
                    // both drain threads are done, and a fatal line in the
                    // tail still aborts the logical operation.
                    return match fatal_rx.recv() {
                        Ok(fatal) => Err(fatal),
                        Err(mpsc::RecvError) => Ok(status),
                    };
                }
                None => std::thread::sleep(Duration::from_millis(25)),
            }
        }
    })
}

fn drain_stream<R: Read>(
    stream: R,
    file: Option<&Path>,
    callback: Option<LineCallback>,
    fatal: mpsc::Sender<AdapterError>,
) {
    let mut sink = match file.map(File::create) {
        Some(Ok(f)) => Some(f),
        Some(Err(e)) => {
            let _ = fatal.send(AdapterError::Io(e));
            return;
        }
        None => None,
    };

    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        // Raw bytes go to the sink untouched; the tool may emit a legacy
        // codepage that is transcoded later, not here.
        if let Some(f) = sink.as_mut() {
            if let Err(e) = f.write_all(&buf) {
                let _ = fatal.send(AdapterError::Io(e));
                return;
            }
        }

        if let Some(cb) = callback {
            let text = String::from_utf8_lossy(&buf);
            let line = text.trim_end_matches(['\n', '\r']);
            if let Err(e) = cb(line) {
                let _ = fatal.send(e);
                return;
            }
        }
    }
}
