//! Opens the system's default browser at the launcher URL

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::task::JoinHandle;

/// Open `url` after `delay` on a background task, so the server can bind
/// its port without waiting on the browser
pub fn spawn_delayed_open(url: String, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        tracing::info!("Opening browser at {}", url);
        if let Err(e) = open(&url).await {
            tracing::warn!("Could not open browser: {}. Visit {} manually.", e, url);
        }
    })
}

pub async fn open(url: &str) -> std::io::Result<()> {
    let (program, args) = launcher_command(url);
    let status = Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await?;

    if !status.success() {
        return Err(std::io::Error::other(format!("{} exited with {}", program, status)));
    }
    Ok(())
}

#[cfg(target_os = "windows")]
fn launcher_command(url: &str) -> (&'static str, Vec<String>) {
    // The empty string is the window title `start` expects first
    ("cmd", vec!["/C".into(), "start".into(), String::new(), url.into()])
}

#[cfg(target_os = "macos")]
fn launcher_command(url: &str) -> (&'static str, Vec<String>) {
    ("open", vec![url.into()])
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn launcher_command(url: &str) -> (&'static str, Vec<String>) {
    ("xdg-open", vec![url.into()])
}
