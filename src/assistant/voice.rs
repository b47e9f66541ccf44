use crate::process::{kill_tree, own_process_group, spawn_detached};
use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoiceError {
    #[error("already listening")]
    Busy,
    #[error("voice input is not available; set voice_command in the config to enable it")]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    #[error("no speech synthesizer found")]
    Unsupported,
    #[error("speech failed: {0}")]
    Failed(String),
}

/// Identifies one recognition session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceSession(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,
    Listening(VoiceSession),
}

/// Single-owner handle on the speech recognizer.
///
/// At most one session is live. `start` hands out the session, and the
/// session ends on its result, on an error, or on `stop`. Anything reported
/// for a session that is no longer live is dropped.
#[derive(Debug)]
pub struct VoiceInput {
    available: bool,
    state: VoiceState,
    issued: u64,
}

impl VoiceInput {
    pub fn new(available: bool) -> Self {
        Self {
            available,
            state: VoiceState::Idle,
            issued: 0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        matches!(self.state, VoiceState::Listening(_))
    }

    pub fn start(&mut self) -> Result<VoiceSession, VoiceError> {
        if !self.available {
            return Err(VoiceError::Unsupported);
        }
        if self.is_listening() {
            return Err(VoiceError::Busy);
        }

        self.issued += 1;
        let session = VoiceSession(self.issued);
        self.state = VoiceState::Listening(session);
        debug!(session = self.issued, "voice session started");
        Ok(session)
    }

    /// End the live session, if any
    pub fn stop(&mut self) {
        if let VoiceState::Listening(VoiceSession(id)) = self.state {
            debug!(session = id, "voice session stopped");
        }
        self.state = VoiceState::Idle;
    }

    /// Report how `session` ended. Returns the transcript when it belongs to
    /// the live session and recognition succeeded.
    pub fn finish(&mut self, session: VoiceSession, result: Result<String, String>) -> Option<String> {
        if self.state != VoiceState::Listening(session) {
            debug!(session = session.0, "ignoring result for finished voice session");
            return None;
        }
        self.state = VoiceState::Idle;

        match result {
            Ok(transcript) => {
                let transcript = transcript.trim().to_string();
                (!transcript.is_empty()).then_some(transcript)
            }
            Err(e) => {
                warn!(error = %e, "voice recognition failed");
                None
            }
        }
    }
}

/// Something that turns one utterance into text
pub trait Recognizer: Send {
    /// Start listening; the transcript is the process's stdout
    fn spawn(&self) -> io::Result<RecognizerProcess>;
}

/// Runs a user-configured shell command and takes its stdout as the transcript
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    command: String,
}

impl CommandRecognizer {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
        }
    }
}

impl Recognizer for CommandRecognizer {
    fn spawn(&self) -> io::Result<RecognizerProcess> {
        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        let child = own_process_group(&mut command).spawn()?;
        RecognizerProcess::new(child)
    }
}

/// A live recognizer process. Dropping it kills the whole process tree.
#[derive(Debug)]
pub struct RecognizerProcess {
    child: Child,
    output: Receiver<String>,
    status: Option<ExitStatus>,
    done: bool,
}

impl RecognizerProcess {
    fn new(mut child: Child) -> io::Result<Self> {
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "recognizer stdout not captured"))?;
        let (tx, output) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("flowdesk-voice".to_string())
            .spawn(move || {
                let mut transcript = String::new();
                let _ = stdout.read_to_string(&mut transcript);
                let _ = tx.send(transcript);
            });
        if let Err(e) = spawned {
            kill_tree(&mut child);
            return Err(e);
        }

        Ok(Self {
            child,
            output,
            status: None,
            done: false,
        })
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// The result once the process has exited and its output is read.
    /// Never blocks; the child is reaped here.
    pub fn try_finish(&mut self) -> Option<Result<String, String>> {
        if self.done {
            return None;
        }
        if self.status.is_none() {
            match self.child.try_wait() {
                Ok(Some(status)) => self.status = Some(status),
                Ok(None) => return None,
                Err(e) => {
                    self.kill();
                    return Some(Err(e.to_string()));
                }
            }
        }

        let transcript = match self.output.try_recv() {
            Ok(transcript) => transcript,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => String::new(),
        };
        self.done = true;
        let result = match self.status {
            Some(status) if status.success() => Ok(transcript.trim().to_string()),
            Some(status) => Err(format!("recognizer exited with {}", status)),
            None => Err("recognizer status unknown".to_string()),
        };
        Some(result)
    }

    /// Stop listening now
    pub fn kill(&mut self) {
        if !self.done {
            kill_tree(&mut self.child);
            self.done = true;
        }
    }
}

impl Drop for RecognizerProcess {
    fn drop(&mut self) {
        self.kill();
    }
}

/// Owns the recognizer and the one process it may have running.
///
/// Starting a session kills whatever was still listening, so there is never
/// more than one recognizer alive.
pub struct VoiceRunner {
    recognizer: Option<Box<dyn Recognizer>>,
    live: Option<(VoiceSession, RecognizerProcess)>,
}

impl VoiceRunner {
    pub fn new(recognizer: Option<Box<dyn Recognizer>>) -> Self {
        Self {
            recognizer,
            live: None,
        }
    }

    pub fn live_pid(&self) -> Option<u32> {
        self.live.as_ref().map(|(_, process)| process.id())
    }

    pub fn start(&mut self, session: VoiceSession) -> Result<(), String> {
        self.stop();
        let Some(recognizer) = &self.recognizer else {
            return Err(VoiceError::Unsupported.to_string());
        };
        let process = recognizer.spawn().map_err(|e| e.to_string())?;
        debug!(session = session.0, pid = process.id(), "recognizer started");
        self.live = Some((session, process));
        Ok(())
    }

    /// Kill the live recognizer, if any
    pub fn stop(&mut self) {
        if let Some((session, mut process)) = self.live.take() {
            debug!(session = session.0, pid = process.id(), "recognizer stopped");
            process.kill();
        }
    }

    /// The finished session and its result, once the recognizer exits
    pub fn poll(&mut self) -> Option<(VoiceSession, Result<String, String>)> {
        let (session, process) = self.live.as_mut()?;
        let session = *session;
        let result = process.try_finish()?;
        self.live = None;
        Some((session, result))
    }
}

pub trait Speaker {
    fn speak(&self, text: &str) -> Result<(), SpeechError>;
}

/// Speaks through the platform's command-line synthesizer
#[derive(Debug, Clone)]
pub struct SystemSpeaker {
    program: &'static str,
}

impl Default for SystemSpeaker {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemSpeaker {
    pub fn new() -> Self {
        #[cfg(target_os = "macos")]
        let program = "say";
        #[cfg(not(target_os = "macos"))]
        let program = "espeak";

        Self { program }
    }
}

impl Speaker for SystemSpeaker {
    fn speak(&self, text: &str) -> Result<(), SpeechError> {
        let cleaned = clean_for_speech(text);
        if cleaned.trim().is_empty() {
            return Ok(());
        }

        let mut command = Command::new(self.program);
        command
            .arg(&cleaned)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        match spawn_detached(&mut command, self.program) {
            Ok(pid) => {
                info!(program = self.program, pid, chars = cleaned.len(), "speaking reply");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(SpeechError::Unsupported),
            Err(e) => Err(SpeechError::Failed(e.to_string())),
        }
    }
}

/// Strip markdown markers and turn line breaks into sentence breaks
pub fn clean_for_speech(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '#' | '*' | '_' | '`'))
        .collect::<String>()
        .replace('\n', ". ")
}
