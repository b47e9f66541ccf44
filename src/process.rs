//! Child processes the UI starts but does not wait on: speech, desktop
//! notifications and the voice recognizer.
use std::io;
use std::process::{Child, Command};
use std::thread;
use tracing::debug;

/// Spawn `command` and reap it on a short-lived thread once it exits
pub fn spawn_detached(command: &mut Command, name: &'static str) -> io::Result<u32> {
    let mut child = command.spawn()?;
    let pid = child.id();
    let reaper = thread::Builder::new()
        .name(format!("reap-{}", name))
        .spawn(move || match child.wait() {
            Ok(status) => debug!(name, pid, %status, "child exited"),
            Err(e) => debug!(name, pid, error = %e, "waiting on child failed"),
        });
    if let Err(e) = reaper {
        debug!(name, pid, error = %e, "could not start reaper thread");
    }
    Ok(pid)
}

/// Put the child in its own process group so the whole tree can be killed
pub fn own_process_group(command: &mut Command) -> &mut Command {
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }
    command
}

/// Kill `child` and everything in its process group, then reap it
pub fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        use std::process::Stdio;
        let group = format!("-{}", child.id());
        let killed = Command::new("kill")
            .args(["-KILL", "--", &group])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if let Err(e) = killed {
            debug!(error = %e, "kill of process group failed");
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}
