//! The session controller: spawns the interceptor, owns the single reader
//! task, and coordinates pause/resume with a UI task.

use std::process::Stdio;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{watch, Notify};

use proconq_tracer::{control::ControlLine, syscall, AutoskipFilter, Direction, Syscall};

use crate::CtlError;

/// How to start the interceptor: attach to a running pid, or launch a fresh command.
#[derive(Debug, Clone)]
pub enum TracerTarget {
    Pid(u32),
    Command(String),
}

#[derive(Default)]
struct PendingOverrides {
    args: [Option<String>; 6],
    ret: Option<String>,
}

/// The reader task's current state, published to whatever task is watching
/// for pause edges.
#[derive(Debug, Clone, PartialEq)]
pub enum PauseState {
    /// The helper is running freely; no event is parked.
    Running,
    /// A non-autoskipped `SKIP` is parked awaiting [`TracerSession::resume`].
    Paused(Syscall),
    /// The helper wrote to stderr and the session is over; no further events will arrive.
    Finished,
}

/// A running interceptor session.
///
/// Only the internal reader task ever writes to the helper's stdin; callers
/// drive it through [`Self::resume`], [`Self::set_arg`], [`Self::set_ret`],
/// [`Self::add_filter`] and [`Self::remove_filter`].
pub struct TracerSession {
    child: Child,
    resume: Arc<Notify>,
    paused: watch::Receiver<PauseState>,
    filter: Arc<Mutex<AutoskipFilter>>,
    overrides: Arc<Mutex<PendingOverrides>>,
}

impl TracerSession {
    /// Spawn the interceptor helper against `target` and start its reader task.
    pub fn start(interceptor_path: &str, target: TracerTarget) -> Result<Self, CtlError> {
        let mut command = Command::new(interceptor_path);
        match &target {
            TracerTarget::Pid(pid) => command.arg("-p").arg(pid.to_string()),
            TracerTarget::Command(cmd) => command.arg("-e").arg(cmd),
        };
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(CtlError::Spawn)?;

        let stdin = child.stdin.take().expect("stdin was piped");
        let stdout = child.stdout.take().expect("stdout was piped");
        let stderr = child.stderr.take().expect("stderr was piped");

        let resume = Arc::new(Notify::new());
        let (paused_tx, paused_rx) = watch::channel(PauseState::Running);
        let filter = Arc::new(Mutex::new(AutoskipFilter::new()));
        let overrides = Arc::new(Mutex::new(PendingOverrides::default()));

        spawn_reader(stdin, stdout, stderr, resume.clone(), paused_tx, filter.clone(), overrides.clone());

        Ok(Self { child, resume, paused: paused_rx, filter, overrides })
    }

    /// Resume a paused event (replies `0` was already sent; this releases the
    /// park point the reader is waiting at).
    pub fn resume(&self) {
        self.resume.notify_one();
    }

    /// Stage a replacement for argument `pos`, to be used the next time a
    /// `SETARG<pos>` control line arrives.
    pub fn set_arg(&self, pos: u8, value: impl Into<String>) {
        if let Some(slot) = self.overrides.lock().unwrap().args.get_mut(pos as usize) {
            *slot = Some(value.into());
        }
    }

    /// Stage a replacement return value for the next `SETRET`.
    pub fn set_ret(&self, value: impl Into<String>) {
        self.overrides.lock().unwrap().ret = Some(value.into());
    }

    pub fn add_filter(&self, name: impl Into<String>) {
        self.filter.lock().unwrap().add(name);
    }

    pub fn remove_filter(&self, name: &str) {
        self.filter.lock().unwrap().remove(name);
    }

    /// A watch receiver tracking [`PauseState`] edges: `Paused` when a syscall
    /// is parked, `Running` once it resumes, `Finished` when the helper dies.
    pub fn paused(&self) -> watch::Receiver<PauseState> {
        self.paused.clone()
    }

    /// Terminate the helper and close its pipes.
    pub async fn shutdown(mut self) -> std::io::Result<()> {
        self.child.kill().await
    }
}

#[allow(clippy::too_many_arguments)]
fn spawn_reader(
    mut stdin: tokio::process::ChildStdin,
    stdout: tokio::process::ChildStdout,
    stderr: tokio::process::ChildStderr,
    resume: Arc<Notify>,
    paused_tx: watch::Sender<PauseState>,
    filter: Arc<Mutex<AutoskipFilter>>,
    overrides: Arc<Mutex<PendingOverrides>>,
) {
    tokio::spawn(async move {
        let mut stdout = BufReader::new(stdout).lines();
        let mut stderr = BufReader::new(stderr).lines();
        let mut header: Option<String> = None;
        let mut body: Vec<String> = Vec::new();
        // The syscall currently parked at a SKIP pause, if any. SETARG/SETRET
        // read their "current value" off this rather than off the wire.
        let mut current: Option<Syscall> = None;

        loop {
            tokio::select! {
                biased;
                err = stderr.next_line() => {
                    if let Ok(Some(line)) = err {
                        log::error!("[tracer::reader] interceptor stderr: {line}");
                        let _ = paused_tx.send(PauseState::Finished);
                        break;
                    }
                }
                line = stdout.next_line() => {
                    let Ok(Some(line)) = line else { break };

                    if let Some(control) = ControlLine::parse(&line) {
                        let Some(head) = header.take() else {
                            body.clear();
                            continue;
                        };
                        match control {
                            ControlLine::Skip => {
                                let parsed = match syscall::extract_syscall(&head) {
                                    Ok((Direction::Entry, ..)) => syscall::extract_entry(&head, &body),
                                    Ok((Direction::Exit, ..)) => syscall::extract_exit(
                                        &head,
                                        body.first().map(String::as_str).unwrap_or(""),
                                    ),
                                    Err(e) => Err(e),
                                };
                                body.clear();
                                current = None;
                                *overrides.lock().unwrap() = PendingOverrides::default();
                                let Ok(sc) = parsed else { continue };

                                if filter.lock().unwrap().contains(&sc.name) {
                                    if write_reply(&mut stdin, "1").await.is_err() {
                                        break;
                                    }
                                    continue;
                                }

                                if write_reply(&mut stdin, "0").await.is_err() {
                                    break;
                                }
                                current = Some(sc.clone());
                                let _ = paused_tx.send(PauseState::Paused(sc));
                                resume.notified().await;
                                current = None;
                                let _ = paused_tx.send(PauseState::Running);
                            }
                            ControlLine::SetArg(pos) => {
                                body.clear();
                                let original = current
                                    .as_ref()
                                    .and_then(|sc| sc.args.get(pos as usize))
                                    .and_then(|arg| arg.as_ref())
                                    .map(|arg| arg.value.clone())
                                    .unwrap_or_default();
                                let reply = overrides
                                    .lock()
                                    .unwrap()
                                    .args
                                    .get(pos as usize)
                                    .cloned()
                                    .flatten()
                                    .unwrap_or(original);
                                if write_reply(&mut stdin, &reply).await.is_err() {
                                    break;
                                }
                            }
                            ControlLine::SetRet => {
                                body.clear();
                                let original = current.as_ref().and_then(|sc| sc.ret.clone()).unwrap_or_default();
                                let reply = overrides.lock().unwrap().ret.clone().unwrap_or(original);
                                if write_reply(&mut stdin, &reply).await.is_err() {
                                    break;
                                }
                            }
                        }
                    } else if header.is_none() {
                        header = Some(line);
                    } else {
                        body.push(line);
                    }
                }
            }
        }
        log::info!("[tracer::reader] reader task exiting");
    });
}

async fn write_reply(stdin: &mut tokio::process::ChildStdin, reply: &str) -> std::io::Result<()> {
    stdin.write_all(reply.as_bytes()).await?;
    stdin.write_all(b"\n").await
}
