// plugin.rs - Tauri plugin exposing the speech commands and onSpeechEvent
use crate::bridge::SpeechBridge;
use crate::config::BridgeConfig;
use crate::platform::{EventSink, HostContext};
use crate::{PLUGIN_COMMANDS, PLUGIN_NAME};
use tauri::plugin::{Builder, TauriPlugin};
use tauri::{AppHandle, Emitter, Manager, Runtime, State};

struct TauriSink<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> EventSink for TauriSink<R> {
    fn emit(&self, signal: &str, payload: &str) {
        if let Err(e) = self.app.emit(signal, payload) {
            log::warn!("Failed to emit {}: {:?}", signal, e);
        }
    }
}

/// A visible webview window counts as the foreground context.
struct TauriHost<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> HostContext for TauriHost<R> {
    fn has_foreground(&self) -> bool {
        self.app
            .webview_windows()
            .values()
            .any(|window| window.is_visible().unwrap_or(false))
    }
}

#[tauri::command]
fn start_listening(bridge: State<'_, SpeechBridge>) -> Result<(), String> {
    bridge.start_listening().map_err(|e| e.to_string())
}

#[tauri::command]
fn stop_listening(bridge: State<'_, SpeechBridge>) -> Result<(), String> {
    bridge.stop_listening().map_err(|e| e.to_string())
}

#[tauri::command]
fn speak(bridge: State<'_, SpeechBridge>, text: String) -> Result<(), String> {
    bridge.speak(&text).map_err(|e| e.to_string())
}

/// Registers the plugin. Configuration comes from `plugins.speech-bridge`;
/// a missing section means defaults.
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<BridgeConfig>> {
    Builder::<R, Option<BridgeConfig>>::new(PLUGIN_NAME)
        .invoke_handler(tauri::generate_handler![start_listening, stop_listening, speak])
        .setup(|app, api| {
            let config = api.config().clone().unwrap_or_default();
            let bridge = SpeechBridge::start_native(
                &config,
                Box::new(TauriHost { app: app.clone() }),
                Box::new(TauriSink { app: app.clone() }),
            )?;
            app.manage(bridge);
            log::info!(
                "{} plugin initialized (commands: {}, signal: {})",
                PLUGIN_NAME,
                PLUGIN_COMMANDS.join(", "),
                config.signal
            );
            Ok(())
        })
        .on_drop(|app| {
            if let Some(bridge) = app.try_state::<SpeechBridge>() {
                bridge.shutdown();
            }
        })
        .build()
}
