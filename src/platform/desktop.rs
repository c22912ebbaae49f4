// desktop.rs - command-line synthesizer and an always-granted permission gate

use super::{Permission, PermissionGate, QueueMode, Synthesizer};
use crate::config::Locale;
use crate::dispatch::{CallbackSender, PlatformCallback};
use crate::error::BridgeError;
use crate::platform::InitStatus;
use log::{debug, info, warn};
use std::env;
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;

/// Desktop operating systems have no runtime microphone prompt.
#[derive(Debug, Default)]
pub struct DesktopPermissions;

impl PermissionGate for DesktopPermissions {
    fn is_granted(&self, _permission: Permission) -> bool {
        true
    }

    fn request(&mut self, permission: Permission, request_code: u32) {
        debug!("Ignoring {:?} request {} on desktop", permission, request_code);
    }
}

/// The system speech program a `CommandSynthesizer` drives. Text is fed on stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechProgram {
    /// Linux: espeak-ng
    Espeak,
    /// macOS: say
    Say,
    /// Windows: System.Speech through PowerShell
    PowerShell,
    /// Any program that reads the text on stdin, e.g. a wrapper script.
    Custom { program: PathBuf, args: Vec<String> },
}

impl SpeechProgram {
    pub fn for_current_os() -> Option<Self> {
        if cfg!(target_os = "linux") {
            Some(SpeechProgram::Espeak)
        } else if cfg!(target_os = "macos") {
            Some(SpeechProgram::Say)
        } else if cfg!(target_os = "windows") {
            Some(SpeechProgram::PowerShell)
        } else {
            None
        }
    }

    pub fn binary(&self) -> &OsStr {
        match self {
            SpeechProgram::Espeak => OsStr::new("espeak-ng"),
            SpeechProgram::Say => OsStr::new("say"),
            SpeechProgram::PowerShell => OsStr::new("powershell"),
            SpeechProgram::Custom { program, .. } => program.as_os_str(),
        }
    }

    pub fn command(&self, locale: Option<&Locale>) -> Command {
        let mut command = Command::new(self.binary());
        match self {
            SpeechProgram::Espeak => {
                command.arg("--stdin");
                if let Some(locale) = locale {
                    command.args(["-v", &locale.as_str().to_lowercase()]);
                }
            }
            SpeechProgram::Say => {}
            SpeechProgram::Custom { args, .. } => {
                command.args(args);
            }
            SpeechProgram::PowerShell => {
                let mut script = String::from(
                    "Add-Type -AssemblyName System.Speech; \
                     $synth = New-Object System.Speech.Synthesis.SpeechSynthesizer; ",
                );
                if let Some(locale) = locale {
                    script.push_str(&format!(
                        "try {{ $synth.SelectVoiceByHints(\
                         [System.Speech.Synthesis.VoiceGender]::NotSet, \
                         [System.Speech.Synthesis.VoiceAge]::NotSet, 0, \
                         [System.Globalization.CultureInfo]::new('{}')) }} catch {{ }}; ",
                        locale.as_str().replace('\'', "")
                    ));
                }
                script.push_str("$synth.Speak([Console]::In.ReadToEnd());");
                command.args(["-NoProfile", "-Command", &script]);
            }
        }
        command
    }

    /// Whether the binary can be found on `PATH` (or exists, for a custom path).
    pub fn is_installed(&self) -> bool {
        if let SpeechProgram::Custom { program, .. } = self {
            return is_file(program);
        }
        let Some(paths) = env::var_os("PATH") else {
            return false;
        };
        env::split_paths(&paths).any(|dir| {
            let candidate = dir.join(self.binary());
            is_file(&candidate) || is_file(&candidate.with_extension("exe"))
        })
    }
}

fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}

/// Speaks by spawning the system speech program once per utterance.
/// Flushing kills the utterance in flight.
pub struct CommandSynthesizer {
    program: Option<SpeechProgram>,
    locale: Option<Locale>,
    current: Option<Child>,
}

impl CommandSynthesizer {
    pub fn new(callbacks: &CallbackSender) -> Self {
        let program = SpeechProgram::for_current_os().filter(|p| p.is_installed());
        Self::with_program(program, callbacks)
    }

    /// Reports readiness through `callbacks` right away.
    pub fn with_program(program: Option<SpeechProgram>, callbacks: &CallbackSender) -> Self {
        let status = match &program {
            Some(program) => {
                info!("Speech synthesis via {}", program.binary().to_string_lossy());
                InitStatus::Success
            }
            None => {
                warn!("No speech synthesis program available");
                InitStatus::Error
            }
        };
        callbacks.deliver(PlatformCallback::SynthesizerInit(status));

        Self {
            program,
            locale: None,
            current: None,
        }
    }

    pub fn is_speaking(&mut self) -> bool {
        match self.current.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    fn cancel_current(&mut self) {
        if let Some(mut child) = self.current.take() {
            if let Ok(None) = child.try_wait() {
                debug!("Flushing utterance in progress");
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }
}

impl Synthesizer for CommandSynthesizer {
    fn speak(&mut self, text: &str, mode: QueueMode, utterance_id: &str) -> Result<(), BridgeError> {
        let program = self
            .program
            .clone()
            .ok_or(BridgeError::Unsupported("speech synthesis"))?;

        match mode {
            QueueMode::Flush => self.cancel_current(),
            QueueMode::Add if self.is_speaking() => {
                return Err(BridgeError::Unsupported("queued utterances"));
            }
            QueueMode::Add => self.cancel_current(),
        }

        let mut child = program
            .command(self.locale.as_ref())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            let text = text.to_string();
            thread::spawn(move || {
                if let Err(e) = stdin.write_all(text.as_bytes()) {
                    debug!("Speech program closed stdin early: {}", e);
                }
            });
        }

        debug!("Speaking utterance {}", utterance_id);
        self.current = Some(child);
        Ok(())
    }

    fn set_language(&mut self, locale: &Locale) -> Result<(), BridgeError> {
        match self.program {
            Some(SpeechProgram::Say) => Err(BridgeError::Unsupported("language selection for say")),
            Some(_) => {
                self.locale = Some(locale.clone());
                Ok(())
            }
            None => Err(BridgeError::Unsupported("speech synthesis")),
        }
    }

    fn shutdown(&mut self) {
        self.cancel_current();
    }
}

impl Drop for CommandSynthesizer {
    fn drop(&mut self) {
        self.cancel_current();
    }
}
