// Helper functions shared by the extractor and the muxer

use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;

use tokio::io::AsyncReadExt;
use tokio::process::Command as TokioCommand;
use tokio::time::{timeout, Duration as TokioDuration};

use super::config::NetworkConfig;

/// Run a command without a shell, collecting stdout and stderr.
///
/// With `timeout_secs` set the child is killed once the deadline passes;
/// `None` waits for as long as the child runs.
pub async fn run_output<I, S>(
    program: &Path,
    args: I,
    timeout_secs: Option<u64>,
) -> Result<std::process::Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let name = program.display();

    let mut child = TokioCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| format!("Failed to start {}: {}", name, e))?;

    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| format!("Failed to capture stdout from {}", name))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| format!("Failed to capture stderr from {}", name))?;

    // Drain both pipes while waiting, or a chatty child blocks on a full pipe
    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stdout_pipe
            .read_to_end(&mut buf)
            .await
            .map_err(|e| format!("Failed to read stdout: {}", e))?;
        Ok::<Vec<u8>, String>(buf)
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stderr_pipe
            .read_to_end(&mut buf)
            .await
            .map_err(|e| format!("Failed to read stderr: {}", e))?;
        Ok::<Vec<u8>, String>(buf)
    });

    let waited = match timeout_secs {
        Some(secs) => match timeout(TokioDuration::from_secs(secs), child.wait()).await {
            Ok(status) => status,
            Err(_) => {
                let _ = child.kill().await;
                stdout_task.abort();
                stderr_task.abort();
                return Err(format!("{} timed out after {}s", name, secs));
            }
        },
        None => child.wait().await,
    };

    let status = waited.map_err(|e| format!("Failed to wait for {}: {}", name, e))?;
    let stdout = stdout_task
        .await
        .map_err(|e| format!("stdout task failed: {}", e))??;
    let stderr = stderr_task
        .await
        .map_err(|e| format!("stderr task failed: {}", e))??;

    Ok(std::process::Output {
        status,
        stdout,
        stderr,
    })
}

/// Build proxy arguments for yt-dlp
pub fn get_proxy_args(config: &NetworkConfig) -> Vec<String> {
    let mut args = Vec::new();

    if let Some(proxy) = &config.proxy {
        args.push("--proxy".to_string());
        args.push(proxy.clone());
    }

    args
}

/// Build timeout arguments for yt-dlp
pub fn get_timeout_args(config: &NetworkConfig) -> Vec<String> {
    let mut args = Vec::new();

    if let Some(timeout) = config.timeout {
        args.push("--socket-timeout".to_string());
        args.push(timeout.to_string());
    }

    args
}
