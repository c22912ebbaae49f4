// lib.rs - crate root and plugin surface

//! speech-bridge: native speech recognition and synthesis for a host's scripting layer.
//!
//! Three commands go in (`startListening`, `stopListening`, `speak`) and one
//! signal comes out, `onSpeechEvent`, whose payload is a JSON string:
//!
//! ```json
//! {"type":"listening","active":true}
//! {"type":"transcription","text":"open the door"}
//! {"type":"error","message":"7"}
//! ```
//!
//! With the default `tauri` feature the crate is a Tauri plugin; register it
//! with `.plugin(speech_bridge::init())`.

pub mod adapter;
pub mod bridge;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod listener;
pub mod platform;
#[cfg(feature = "tauri")]
mod plugin;

pub use adapter::SpeechAdapter;
pub use bridge::SpeechBridge;
pub use config::{BridgeConfig, LanguageModel, Locale};
pub use dispatch::{CallbackSender, PlatformCallback};
pub use error::BridgeError;
pub use event::SpeechEvent;
pub use listener::{RecognitionListener, SpeechCommands, SynthesisListener};
#[cfg(feature = "tauri")]
pub use plugin::init;

/// Plugin identifier; must match the `links` key in Cargo.toml.
pub const PLUGIN_NAME: &str = "speech-bridge";
/// Commands the frontend invokes as `plugin:speech-bridge|<command>`.
/// build.rs generates one permission per entry.
pub const PLUGIN_COMMANDS: [&str; 3] = ["start_listening", "stop_listening", "speak"];
