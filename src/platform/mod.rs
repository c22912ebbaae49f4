// platform/mod.rs - OS services the adapter drives, and the host it reports to

use crate::config::{LanguageModel, Locale};
use crate::error::BridgeError;
use std::fmt;

pub mod desktop;
pub mod session;
#[cfg(windows)]
pub mod sapi;

/// Request code attached to microphone permission requests.
pub const REQUEST_RECORD_AUDIO: u32 = 1001;

/// Reusable descriptor passed to every listen call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionRequest {
    pub language_model: LanguageModel,
    pub locale: Locale,
}

/// Numeric recognition error code, forwarded to the host verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode(pub i32);

impl ErrorCode {
    pub const NETWORK_TIMEOUT: ErrorCode = ErrorCode(1);
    pub const NETWORK: ErrorCode = ErrorCode(2);
    pub const AUDIO: ErrorCode = ErrorCode(3);
    pub const SERVER: ErrorCode = ErrorCode(4);
    pub const CLIENT: ErrorCode = ErrorCode(5);
    pub const SPEECH_TIMEOUT: ErrorCode = ErrorCode(6);
    pub const NO_MATCH: ErrorCode = ErrorCode(7);
    pub const RECOGNIZER_BUSY: ErrorCode = ErrorCode(8);
    pub const INSUFFICIENT_PERMISSIONS: ErrorCode = ErrorCode(9);
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueMode {
    /// Drop whatever is being spoken and start this utterance.
    Flush,
    /// Speak after the current utterance finishes.
    Add,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    RecordAudio,
}

/// Speech-to-text service. Results and errors arrive later as callbacks.
#[cfg_attr(test, mockall::automock)]
pub trait Recognizer: Send {
    fn start_listening(&mut self, request: &RecognitionRequest) -> Result<(), BridgeError>;
    fn stop_listening(&mut self) -> Result<(), BridgeError>;
    fn destroy(&mut self);
}

/// Text-to-speech service. Readiness arrives later as an init callback.
#[cfg_attr(test, mockall::automock)]
pub trait Synthesizer: Send {
    fn speak(&mut self, text: &str, mode: QueueMode, utterance_id: &str) -> Result<(), BridgeError>;
    fn set_language(&mut self, locale: &Locale) -> Result<(), BridgeError>;
    fn shutdown(&mut self);
}

/// Runtime permission system.
#[cfg_attr(test, mockall::automock)]
pub trait PermissionGate: Send {
    fn is_granted(&self, permission: Permission) -> bool;
    /// Fire-and-forget; the outcome is never reported back to the adapter.
    fn request(&mut self, permission: Permission, request_code: u32);
}

/// Whether the host currently has a foreground surface to attach to.
#[cfg_attr(test, mockall::automock)]
pub trait HostContext: Send {
    fn has_foreground(&self) -> bool;
}

/// Outbound signal channel to the host.
#[cfg_attr(test, mockall::automock)]
pub trait EventSink: Send {
    fn emit(&self, signal: &str, payload: &str);
}

/// Everything the adapter needs from the outside world.
pub struct PlatformServices {
    pub recognizer: Option<Box<dyn Recognizer>>,
    pub synthesizer: Option<Box<dyn Synthesizer>>,
    pub permissions: Box<dyn PermissionGate>,
    pub host: Box<dyn HostContext>,
    pub sink: Box<dyn EventSink>,
}

/// Native backends for the current OS, wired to report through `callbacks`.
pub fn native_services(
    config: &crate::config::BridgeConfig,
    callbacks: &crate::dispatch::CallbackSender,
    host: Box<dyn HostContext>,
    sink: Box<dyn EventSink>,
) -> PlatformServices {
    PlatformServices {
        recognizer: native_recognizer(config, callbacks),
        synthesizer: Some(Box::new(desktop::CommandSynthesizer::new(callbacks))),
        permissions: Box::new(desktop::DesktopPermissions),
        host,
        sink,
    }
}

#[cfg(windows)]
fn native_recognizer(
    config: &crate::config::BridgeConfig,
    callbacks: &crate::dispatch::CallbackSender,
) -> Option<Box<dyn Recognizer>> {
    match sapi::sapi_recognizer(config.phrases.clone(), config.listen_timeout(), callbacks.clone()) {
        Ok(recognizer) => Some(Box::new(recognizer)),
        Err(e) => {
            log::warn!("Speech recognition unavailable: {}", e);
            None
        }
    }
}

#[cfg(not(windows))]
fn native_recognizer(
    _config: &crate::config::BridgeConfig,
    _callbacks: &crate::dispatch::CallbackSender,
) -> Option<Box<dyn Recognizer>> {
    log::warn!("No native speech recognizer on this platform");
    None
}
