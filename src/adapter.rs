// adapter.rs - three commands in, one JSON signal out

use crate::config::BridgeConfig;
use crate::event::SpeechEvent;
use crate::listener::{RecognitionListener, SpeechCommands, SynthesisListener};
use crate::platform::{
    ErrorCode, EventSink, HostContext, InitStatus, Permission, PermissionGate, PlatformServices,
    QueueMode, RecognitionRequest, Recognizer, Synthesizer, REQUEST_RECORD_AUDIO,
};
use log::{debug, info, warn};

/// Owns the recognizer and synthesizer handles for its whole lifetime.
pub struct SpeechAdapter {
    recognizer: Option<Box<dyn Recognizer>>,
    synthesizer: Option<Box<dyn Synthesizer>>,
    request: RecognitionRequest,
    permissions: Box<dyn PermissionGate>,
    host: Box<dyn HostContext>,
    sink: Box<dyn EventSink>,
    signal: String,
    utterance_id: String,
}

impl SpeechAdapter {
    pub fn new(services: PlatformServices, config: &BridgeConfig) -> Self {
        let request = RecognitionRequest {
            language_model: config.language_model,
            locale: config.locale(),
        };

        let mut adapter = Self {
            recognizer: services.recognizer,
            synthesizer: services.synthesizer,
            request,
            permissions: services.permissions,
            host: services.host,
            sink: services.sink,
            signal: config.signal.clone(),
            utterance_id: config.utterance_id.clone(),
        };

        if config.request_permission_on_init {
            adapter.request_permission();
        }

        info!(
            "Speech adapter ready (locale {}, recognizer: {}, synthesizer: {})",
            adapter.request.locale,
            adapter.recognizer.is_some(),
            adapter.synthesizer.is_some()
        );
        adapter
    }

    /// Releases both platform handles. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(mut recognizer) = self.recognizer.take() {
            recognizer.destroy();
        }
        if let Some(mut synthesizer) = self.synthesizer.take() {
            synthesizer.shutdown();
        }
        info!("Speech adapter shut down");
    }

    fn request_permission(&mut self) {
        if !self.host.has_foreground() {
            return;
        }
        if !self.permissions.is_granted(Permission::RecordAudio) {
            debug!("Requesting microphone permission");
            self.permissions
                .request(Permission::RecordAudio, REQUEST_RECORD_AUDIO);
        }
    }

    fn emit(&self, event: SpeechEvent) {
        self.sink.emit(&self.signal, &event.to_payload());
    }
}

impl SpeechCommands for SpeechAdapter {
    fn start_listening(&mut self) {
        if !self.host.has_foreground() {
            debug!("No foreground context, ignoring start_listening");
            return;
        }
        self.request_permission();

        match self.recognizer.as_mut() {
            Some(recognizer) => {
                if let Err(e) = recognizer.start_listening(&self.request) {
                    warn!("Recognizer failed to start: {}", e);
                }
            }
            None => warn!("No recognizer available on this platform"),
        }

        self.emit(SpeechEvent::listening(true));
    }

    fn stop_listening(&mut self) {
        if let Some(recognizer) = self.recognizer.as_mut() {
            if let Err(e) = recognizer.stop_listening() {
                warn!("Recognizer failed to stop: {}", e);
            }
        }
        self.emit(SpeechEvent::listening(false));
    }

    fn speak(&mut self, text: &str) {
        if let Some(synthesizer) = self.synthesizer.as_mut() {
            if let Err(e) = synthesizer.speak(text, QueueMode::Flush, &self.utterance_id) {
                warn!("Synthesizer failed to speak: {}", e);
            }
        }
    }
}

impl RecognitionListener for SpeechAdapter {
    fn on_results(&mut self, results: Option<&[String]>) {
        if let Some(best) = results.and_then(|r| r.first()) {
            self.emit(SpeechEvent::transcription(best.as_str()));
        }
    }

    fn on_error(&mut self, code: ErrorCode) {
        self.emit(SpeechEvent::error(code.to_string()));
    }
}

impl SynthesisListener for SpeechAdapter {
    fn on_init(&mut self, status: InitStatus) {
        if status != InitStatus::Success {
            debug!("Synthesizer init failed");
            return;
        }
        if let Some(synthesizer) = self.synthesizer.as_mut() {
            if let Err(e) = synthesizer.set_language(&self.request.locale) {
                debug!("Synthesizer rejected locale {}: {}", self.request.locale, e);
            }
        }
    }
}

impl Drop for SpeechAdapter {
    fn drop(&mut self) {
        if self.recognizer.is_some() || self.synthesizer.is_some() {
            self.shutdown();
        }
    }
}
