//! Child-process invocation for the external window tools.
//!
//! Every query and every mutation in this crate is one blocking subprocess
//! call: spawn, wait for exit, capture stdout.  There is no pooling and no
//! timeout handling beyond what the child itself provides.

use log::debug;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Error from invoking an external tool.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The process could not be started (binary missing, not executable).
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but exited with a nonzero status.
    #[error("{program} failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    /// The process wrote something that is not UTF-8 to stdout.
    #[error("{program} produced non-utf8 output")]
    Output { program: String },
}

/// Run `program` with `args`, blocking until it exits, and return its
/// stdout as a string.
pub fn run(program: &Path, args: &[&str]) -> Result<String, ExecError> {
    debug!("running {} {}", program.display(), args.join(" "));

    let name = program.display().to_string();
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| ExecError::Spawn {
            program: name.clone(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(ExecError::Failed {
            program: name,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    String::from_utf8(output.stdout).map_err(|_| ExecError::Output { program: name })
}
