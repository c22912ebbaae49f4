// dispatch.rs - marshals platform callbacks onto a single thread
use crate::listener::{RecognitionListener, SynthesisListener};
use crate::platform::{ErrorCode, InitStatus};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// A callback raised by a platform backend, waiting to be handled.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCallback {
    ReadyForSpeech,
    BeginningOfSpeech,
    RmsChanged(f32),
    BufferReceived(Vec<u8>),
    EndOfSpeech,
    PartialResults(Vec<String>),
    Event(i32),
    Results(Option<Vec<String>>),
    Error(ErrorCode),
    SynthesizerInit(InitStatus),
}

impl PlatformCallback {
    pub fn dispatch<L>(self, listener: &mut L)
    where
        L: RecognitionListener + SynthesisListener + ?Sized,
    {
        match self {
            PlatformCallback::ReadyForSpeech => listener.on_ready_for_speech(),
            PlatformCallback::BeginningOfSpeech => listener.on_beginning_of_speech(),
            PlatformCallback::RmsChanged(rms_db) => listener.on_rms_changed(rms_db),
            PlatformCallback::BufferReceived(buffer) => listener.on_buffer_received(&buffer),
            PlatformCallback::EndOfSpeech => listener.on_end_of_speech(),
            PlatformCallback::PartialResults(partial) => listener.on_partial_results(&partial),
            PlatformCallback::Event(event_type) => listener.on_event(event_type),
            PlatformCallback::Results(results) => listener.on_results(results.as_deref()),
            PlatformCallback::Error(code) => listener.on_error(code),
            PlatformCallback::SynthesizerInit(status) => listener.on_init(status),
        }
    }
}

/// Handed to platform backends so they can report from their own threads.
#[derive(Debug, Clone)]
pub struct CallbackSender {
    sender: Sender<PlatformCallback>,
}

impl CallbackSender {
    pub fn deliver(&self, callback: PlatformCallback) {
        if let Err(e) = self.sender.send(callback) {
            log::debug!("Dropping platform callback, dispatcher gone: {:?}", e.into_inner());
        }
    }
}

pub fn callback_channel() -> (CallbackSender, Receiver<PlatformCallback>) {
    let (sender, receiver) = unbounded();
    (CallbackSender { sender }, receiver)
}

/// Handles every callback already queued, without waiting. For hosts that
/// drive their own main loop. Returns how many were handled.
pub fn pump_pending<L>(listener: &mut L, receiver: &Receiver<PlatformCallback>) -> usize
where
    L: RecognitionListener + SynthesisListener + ?Sized,
{
    let mut handled = 0;
    for callback in receiver.try_iter() {
        callback.dispatch(listener);
        handled += 1;
    }
    handled
}

/// Runs callbacks on a dedicated thread, one at a time under the listener's
/// lock. The thread exits once every `CallbackSender` has been dropped.
pub fn spawn_dispatcher<L>(
    listener: Arc<Mutex<L>>,
    receiver: Receiver<PlatformCallback>,
) -> JoinHandle<()>
where
    L: RecognitionListener + SynthesisListener + Send + 'static,
{
    thread::spawn(move || {
        log::debug!("Speech callback dispatcher started");
        for callback in receiver.iter() {
            match listener.lock() {
                Ok(mut guard) => callback.dispatch(&mut *guard),
                Err(_) => {
                    log::warn!("Speech adapter lock poisoned, stopping dispatcher");
                    break;
                }
            }
        }
        log::debug!("Speech callback dispatcher stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<String>,
    }

    impl RecognitionListener for Recorder {
        fn on_end_of_speech(&mut self) {
            self.seen.push("end".to_string());
        }

        fn on_results(&mut self, results: Option<&[String]>) {
            self.seen.push(format!("results:{:?}", results));
        }

        fn on_error(&mut self, code: ErrorCode) {
            self.seen.push(format!("error:{}", code));
        }
    }

    impl SynthesisListener for Recorder {
        fn on_init(&mut self, status: InitStatus) {
            self.seen.push(format!("init:{:?}", status));
        }
    }

    #[test]
    fn pump_handles_in_order() {
        let (sender, receiver) = callback_channel();
        sender.deliver(PlatformCallback::EndOfSpeech);
        sender.deliver(PlatformCallback::Results(Some(vec!["hi".to_string()])));
        sender.deliver(PlatformCallback::Error(ErrorCode::NO_MATCH));
        sender.deliver(PlatformCallback::SynthesizerInit(InitStatus::Success));

        let mut recorder = Recorder::default();
        assert_eq!(pump_pending(&mut recorder, &receiver), 4);
        assert_eq!(
            recorder.seen,
            vec![
                "end".to_string(),
                r#"results:Some(["hi"])"#.to_string(),
                "error:7".to_string(),
                "init:Success".to_string(),
            ]
        );
        assert_eq!(pump_pending(&mut recorder, &receiver), 0);
    }

    #[test]
    fn inert_callbacks_reach_default_handlers() {
        let (sender, receiver) = callback_channel();
        sender.deliver(PlatformCallback::ReadyForSpeech);
        sender.deliver(PlatformCallback::RmsChanged(-2.0));
        sender.deliver(PlatformCallback::BufferReceived(vec![0, 1]));
        sender.deliver(PlatformCallback::PartialResults(vec!["op".to_string()]));

        let mut recorder = Recorder::default();
        assert_eq!(pump_pending(&mut recorder, &receiver), 4);
        assert!(recorder.seen.is_empty());
    }

    #[test]
    fn dispatcher_exits_when_senders_drop() {
        let (sender, receiver) = callback_channel();
        let recorder = Arc::new(Mutex::new(Recorder::default()));
        let handle = spawn_dispatcher(Arc::clone(&recorder), receiver);

        sender.deliver(PlatformCallback::Error(ErrorCode::AUDIO));
        drop(sender);
        handle.join().unwrap();

        assert_eq!(recorder.lock().unwrap().seen, vec!["error:3".to_string()]);
    }

    #[test]
    fn deliver_after_receiver_dropped_is_silent() {
        let (sender, receiver) = callback_channel();
        drop(receiver);
        sender.deliver(PlatformCallback::EndOfSpeech);
    }
}
