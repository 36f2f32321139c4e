//! Best-effort copy to the system clipboard through the platform's own utility.

use crate::core::error::{Result, WorkbenchError};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

const NO_ARGS: &[&str] = &[];
const XCLIP_ARGS: &[&str] = &["-selection", "clipboard"];

/// Program and arguments that read clipboard text from stdin on this platform.
fn clipboard_program() -> (&'static str, &'static [&'static str]) {
    match std::env::consts::OS {
        "macos" => ("pbcopy", NO_ARGS),
        "windows" => ("clip", NO_ARGS),
        _ if std::env::var_os("WAYLAND_DISPLAY").is_some() => ("wl-copy", NO_ARGS),
        _ => ("xclip", XCLIP_ARGS),
    }
}

pub async fn copy_to_clipboard(text: &str) -> Result<()> {
    let (program, args) = clipboard_program();
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| WorkbenchError::clipboard(format!("{program}: {e}")))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .await
            .map_err(|e| WorkbenchError::clipboard(format!("{program}: {e}")))?;
        // Closing stdin signals end of input.
        drop(stdin);
    }

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| WorkbenchError::clipboard(format!("{program}: {e}")))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(WorkbenchError::clipboard(format!(
            "{program} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    log::debug!("copied {} byte(s) with {program}", text.len());
    Ok(())
}
