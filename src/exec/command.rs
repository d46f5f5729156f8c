// src/exec/command.rs

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::errors::RunError;
use crate::exec::{CapturedOutput, RunOutcome};

/// Build a shell command appropriate for the platform.
pub fn shell_command(cmd_line: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd_line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd_line);
        c
    }
}

/// Run `cmd_line` through the shell in `cwd`, capturing stdout and stderr.
///
/// Resolves once the child exits, or as soon as `cancel_rx` receives `()`.
/// On cancellation the child and everything it started are killed and
/// [`RunOutcome::Cancelled`] is returned. A dropped cancel sender does not
/// count as a cancellation.
///
/// On unix the shell leads its own process group, so cancelling also reaches
/// grandchildren such as `make` recipes. Elsewhere only the shell itself is
/// killed (via `kill_on_drop`).
pub async fn run_command(
    cmd_line: &str,
    cwd: &Path,
    mut cancel_rx: oneshot::Receiver<()>,
) -> RunOutcome {
    let mut cmd = shell_command(cmd_line);
    cmd.current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    cmd.process_group(0);

    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(source) => {
            return RunOutcome::Failed(RunError::Spawn {
                cmd: cmd_line.to_string(),
                source,
            });
        }
    };

    let pid = child.id();
    debug!(cmd = %cmd_line, pid = ?pid, "spawned command");

    tokio::select! {
        res = child.wait_with_output() => match res {
            Ok(output) => {
                let captured = CapturedOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                };
                info!(
                    cmd = %cmd_line,
                    exit_code = ?output.status.code(),
                    success = output.status.success(),
                    "command exited"
                );
                if output.status.success() {
                    RunOutcome::Succeeded(captured)
                } else {
                    RunOutcome::Failed(RunError::Exit {
                        cmd: cmd_line.to_string(),
                        status: output.status,
                        stderr: captured.stderr,
                    })
                }
            }
            Err(source) => RunOutcome::Failed(RunError::Wait {
                cmd: cmd_line.to_string(),
                source,
            }),
        },

        Ok(()) = &mut cancel_rx => {
            info!(cmd = %cmd_line, "cancellation requested; killing command");
            if let Some(pid) = pid {
                kill_process_group(pid);
            }
            RunOutcome::Cancelled
        }
    }
}

#[cfg(unix)]
fn kill_process_group(pgid: u32) {
    let Ok(pgid) = libc::pid_t::try_from(pgid) else {
        return;
    };
    // SAFETY: killpg only sends a signal; the group was created by our spawn.
    if unsafe { libc::killpg(pgid, libc::SIGKILL) } != 0 {
        debug!(
            pgid,
            error = %std::io::Error::last_os_error(),
            "process group already gone"
        );
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pgid: u32) {}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn no_cancel() -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        std::mem::forget(tx);
        rx
    }

    #[tokio::test]
    async fn captures_stdout_of_successful_command() {
        let outcome = run_command("printf 'OK\\n'", Path::new("."), no_cancel()).await;
        match outcome {
            RunOutcome::Succeeded(out) => {
                assert_eq!(out.stdout, "OK\n");
                assert_eq!(out.stderr, "");
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn dropped_cancel_sender_does_not_cancel() {
        let (tx, rx) = oneshot::channel::<()>();
        drop(tx);
        let outcome = run_command("sleep 0.2; echo done", Path::new("."), rx).await;
        assert!(matches!(outcome, RunOutcome::Succeeded(ref o) if o.stdout == "done\n"));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn cancel_kills_grandchildren_too() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("sleeper.pid");
        let cmd = format!("sleep 30 & echo $! > {}; wait", pid_file.display());

        let (tx, rx) = oneshot::channel();
        let run = tokio::spawn(async move { run_command(&cmd, Path::new("."), rx).await });

        let pid = vguard_test_utils::with_timeout(async {
            loop {
                if let Ok(s) = std::fs::read_to_string(&pid_file) {
                    if let Ok(pid) = s.trim().parse::<u32>() {
                        break pid;
                    }
                }
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            }
        })
        .await;

        tx.send(()).unwrap();
        let outcome = vguard_test_utils::with_timeout(run).await.unwrap();
        assert!(matches!(outcome, RunOutcome::Cancelled));

        // Gone, or a zombie waiting for its new parent to reap it.
        let stat = format!("/proc/{pid}/stat");
        vguard_test_utils::wait_until(|| match std::fs::read_to_string(&stat) {
            Ok(s) => s.contains(") Z "),
            Err(_) => true,
        })
        .await;
    }

    #[tokio::test]
    async fn runs_in_the_given_directory() {
        let dir = std::env::temp_dir().canonicalize().unwrap();
        let outcome = run_command("pwd", &dir, no_cancel()).await;
        match outcome {
            RunOutcome::Succeeded(out) => {
                let reported = std::path::PathBuf::from(out.stdout.trim_end());
                assert_eq!(reported.canonicalize().unwrap(), dir);
            }
            other => panic!("expected success, got {other:?}"),
        }
    }
}
