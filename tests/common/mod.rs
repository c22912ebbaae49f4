// common/mod.rs - fakes standing in for the OS services and the host
#![allow(dead_code)]
use speech_bridge::platform::{
    EventSink, HostContext, Permission, PermissionGate, PlatformServices, QueueMode,
    RecognitionRequest, Recognizer, Synthesizer,
};
use speech_bridge::{BridgeError, CallbackSender, Locale, PlatformCallback};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct RecordingSink {
    pub events: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingSink {
    pub fn payloads(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    pub fn signals(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(signal, _)| signal.clone())
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, signal: &str, payload: &str) {
        self.events
            .lock()
            .unwrap()
            .push((signal.to_string(), payload.to_string()));
    }
}

pub struct FakeHost(pub bool);

impl HostContext for FakeHost {
    fn has_foreground(&self) -> bool {
        self.0
    }
}

#[derive(Clone, Default)]
pub struct FakePermissions {
    pub granted: bool,
    pub requests: Arc<Mutex<Vec<u32>>>,
}

impl PermissionGate for FakePermissions {
    fn is_granted(&self, _permission: Permission) -> bool {
        self.granted
    }

    fn request(&mut self, _permission: Permission, request_code: u32) {
        self.requests.lock().unwrap().push(request_code);
    }
}

/// Replays a scripted outcome through the callback channel on every listen,
/// the way a real recognizer reports from its own thread.
#[derive(Clone, Default)]
pub struct FakeRecognizer {
    pub script: Arc<Mutex<Vec<PlatformCallback>>>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub requests: Arc<Mutex<Vec<RecognitionRequest>>>,
    pub callbacks: Arc<Mutex<Option<CallbackSender>>>,
}

impl FakeRecognizer {
    pub fn wired(callbacks: &CallbackSender, script: Vec<PlatformCallback>) -> Self {
        let recognizer = Self::default();
        *recognizer.script.lock().unwrap() = script;
        *recognizer.callbacks.lock().unwrap() = Some(callbacks.clone());
        recognizer
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Recognizer for FakeRecognizer {
    fn start_listening(&mut self, request: &RecognitionRequest) -> Result<(), BridgeError> {
        self.calls.lock().unwrap().push("start".to_string());
        self.requests.lock().unwrap().push(request.clone());
        if let Some(callbacks) = self.callbacks.lock().unwrap().as_ref() {
            for callback in self.script.lock().unwrap().iter().cloned() {
                callbacks.deliver(callback);
            }
        }
        Ok(())
    }

    fn stop_listening(&mut self) -> Result<(), BridgeError> {
        self.calls.lock().unwrap().push("stop".to_string());
        Ok(())
    }

    fn destroy(&mut self) {
        self.calls.lock().unwrap().push("destroy".to_string());
        self.callbacks.lock().unwrap().take();
    }
}

/// Models an audio output: flush drops whatever was still queued.
#[derive(Clone, Default)]
pub struct FakeSynthesizer {
    pub calls: Arc<Mutex<Vec<(String, QueueMode, String)>>>,
    pub audible: Arc<Mutex<Vec<String>>>,
    pub languages: Arc<Mutex<Vec<String>>>,
    pub shut_down: Arc<Mutex<bool>>,
}

impl Synthesizer for FakeSynthesizer {
    fn speak(&mut self, text: &str, mode: QueueMode, utterance_id: &str) -> Result<(), BridgeError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), mode, utterance_id.to_string()));
        let mut audible = self.audible.lock().unwrap();
        if mode == QueueMode::Flush {
            audible.clear();
        }
        audible.push(text.to_string());
        Ok(())
    }

    fn set_language(&mut self, locale: &Locale) -> Result<(), BridgeError> {
        self.languages.lock().unwrap().push(locale.to_string());
        Ok(())
    }

    fn shutdown(&mut self) {
        *self.shut_down.lock().unwrap() = true;
    }
}

pub fn services(
    recognizer: Option<FakeRecognizer>,
    synthesizer: Option<FakeSynthesizer>,
    permissions: FakePermissions,
    foreground: bool,
    sink: &RecordingSink,
) -> PlatformServices {
    PlatformServices {
        recognizer: recognizer.map(|r| Box::new(r) as Box<dyn Recognizer>),
        synthesizer: synthesizer.map(|s| Box::new(s) as Box<dyn Synthesizer>),
        permissions: Box::new(permissions),
        host: Box::new(FakeHost(foreground)),
        sink: Box::new(sink.clone()),
    }
}
