//! Desktop notifications: osascript on macOS, notify-send elsewhere.
//! Best effort; failures are only logged.
use crate::process::spawn_detached;
use std::process::{Command, Stdio};
use tracing::debug;

pub const SESSION_COMPLETE_TITLE: &str = "Session complete";
pub const SESSION_COMPLETE_BODY: &str = "Reset or start the next block.";

/// Tell the user the focus session hit zero
pub fn notify_session_complete() {
    notify(SESSION_COMPLETE_TITLE, SESSION_COMPLETE_BODY);
}

fn notify(title: &str, body: &str) {
    #[cfg(target_os = "macos")]
    let (program, mut command) = {
        let script = format!(
            r#"display notification "{}" with title "{}""#,
            escape_applescript(body),
            escape_applescript(title)
        );
        let mut command = Command::new("osascript");
        command.arg("-e").arg(script);
        ("osascript", command)
    };

    #[cfg(not(target_os = "macos"))]
    let (program, mut command) = {
        let mut command = Command::new("notify-send");
        command.arg(title).arg(body);
        ("notify-send", command)
    };

    command.stdout(Stdio::null()).stderr(Stdio::null());
    if let Err(e) = spawn_detached(&mut command, program) {
        debug!(error = %e, program, "desktop notification unavailable");
    }
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn escape_applescript(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
