// listener.rs - callback surfaces the platform layer invokes
use crate::platform::{ErrorCode, InitStatus};

/// Recognition lifecycle. Only results and errors are required; the rest
/// default to doing nothing.
pub trait RecognitionListener {
    fn on_ready_for_speech(&mut self) {}
    fn on_beginning_of_speech(&mut self) {}
    fn on_rms_changed(&mut self, _rms_db: f32) {}
    fn on_buffer_received(&mut self, _buffer: &[u8]) {}
    fn on_end_of_speech(&mut self) {}
    fn on_partial_results(&mut self, _partial: &[String]) {}
    fn on_event(&mut self, _event_type: i32) {}

    /// Final hypotheses, best first. `None` when the platform delivered no list.
    fn on_results(&mut self, results: Option<&[String]>);
    fn on_error(&mut self, code: ErrorCode);
}

pub trait SynthesisListener {
    fn on_init(&mut self, status: InitStatus);
}

/// The three commands the host scripting layer can call.
pub trait SpeechCommands {
    fn start_listening(&mut self);
    fn stop_listening(&mut self);
    fn speak(&mut self, text: &str);
}
