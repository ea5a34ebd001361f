//! Orchestration module for container execution
//!
//! Describes container jobs ([`ContainerSpec`]) and runs them through a
//! [`ContainerRuntime`]. The shipped backend drives an OCI CLI engine
//! (podman by default) as a child process.

mod download;
mod handle;
mod podman;
mod runtime;
pub mod spec;

#[cfg(test)]
pub(crate) mod testing;

pub use handle::{with_engine, with_verbose, with_workdir, Runtime, RuntimeOptions};
pub use podman::PodmanRuntime;
pub use runtime::{ContainerRuntime, ExecOutput};
pub use spec::{apply_customizers, ContainerSpec, Customizer};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader};
use tracing::debug;

/// Max number of output lines to include in execution error messages.
const ERROR_TAIL_LINES: usize = 50;

/// Extract the useful tail of a failed execution's output.
///
/// Combines stdout and stderr, then keeps the last `ERROR_TAIL_LINES` lines
/// so errors stay actionable without being overwhelming.
pub(crate) fn error_output(stdout: &str, stderr: &str) -> String {
    let lines: Vec<&str> = stdout.lines().chain(stderr.lines()).collect();
    let total = lines.len();
    let tail = if total > ERROR_TAIL_LINES {
        &lines[total - ERROR_TAIL_LINES..]
    } else {
        &lines[..]
    };
    tail.join("\n")
}

/// Collect stdout and stderr of a child process concurrently.
///
/// Every stderr line is also passed to `on_stderr` as it arrives, which is
/// how verbose runs surface engine progress before the container exits.
/// Bytes that are not UTF-8 are replaced, never dropped, and both pipes are
/// drained to EOF so the child cannot block on a full pipe.
pub(crate) async fn stream_child_output<O, E>(
    stdout: O,
    stderr: E,
    on_stderr: &(dyn Fn(&str) + Send + Sync),
) -> (String, String)
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let mut stdout_reader = BufReader::new(stdout);
    let mut stderr_reader = BufReader::new(stderr);
    let mut stdout_buf = Vec::new();
    let mut stderr_buf = Vec::new();

    let mut out = String::new();
    let mut err = String::new();
    let mut stdout_done = false;
    let mut stderr_done = false;

    while !stdout_done || !stderr_done {
        tokio::select! {
            line = read_line_lossy(&mut stdout_reader, &mut stdout_buf), if !stdout_done => {
                match line {
                    Some(line) => {
                        out.push_str(&line);
                        out.push('\n');
                    }
                    None => stdout_done = true,
                }
            }
            line = read_line_lossy(&mut stderr_reader, &mut stderr_buf), if !stderr_done => {
                match line {
                    Some(line) => {
                        on_stderr(&line);
                        err.push_str(&line);
                        err.push('\n');
                    }
                    None => stderr_done = true,
                }
            }
        }
    }

    (out, err)
}

/// Read one line without its terminator, or `None` at EOF or on an I/O error
///
/// `buf` keeps bytes from a read interrupted by `select!` and is cleared only
/// once a full line has been returned.
async fn read_line_lossy<R>(reader: &mut R, buf: &mut Vec<u8>) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    match reader.read_until(b'\n', buf).await {
        Ok(0) if buf.is_empty() => None,
        Ok(_) => {
            let line = decode_line(buf);
            buf.clear();
            Some(line)
        }
        Err(e) => {
            debug!("Stopped reading container output: {}", e);
            None
        }
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
