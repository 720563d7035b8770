use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Ask the OS to open `path` with its default application.
///
/// Fire and forget: the viewer is not waited on and a failed launch is only
/// logged.
pub fn open_file(path: &Path) {
    let mut command = viewer_command(path);
    match command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(_child) => debug!("Opened {}", path.display()),
        Err(e) => debug!("Could not open {}: {}", path.display(), e),
    }
}

fn viewer_command(path: &Path) -> Command {
    if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(path);
        command
    } else if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]).arg(path);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(path);
        command
    }
}
