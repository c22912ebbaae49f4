// session.rs - one-phrase listen sessions on worker threads
use super::{ErrorCode, RecognitionRequest, Recognizer};
use crate::dispatch::{CallbackSender, PlatformCallback};
use crate::error::BridgeError;
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A recognition engine that can run one session on the calling thread.
pub trait PhraseEngine: Send + Sync + 'static {
    /// Sets up whatever the engine needs on this thread, then hands a poll
    /// function to `session.drive`.
    fn listen(&self, phrases: &[String], session: &ListenSession) -> PlatformCallback;
}

/// Per-session view handed to the engine: its own cancel token, deadline and
/// callback channel.
pub struct ListenSession {
    active: Arc<AtomicBool>,
    deadline: Instant,
    callbacks: CallbackSender,
}

impl ListenSession {
    /// Polls until a phrase, an engine error, the deadline, or cancellation.
    /// Timeout reports `SPEECH_TIMEOUT`, cancellation `NO_MATCH`.
    pub fn drive<P>(&self, mut poll: P) -> PlatformCallback
    where
        P: FnMut(Duration) -> Result<Option<String>, ErrorCode>,
    {
        self.callbacks.deliver(PlatformCallback::ReadyForSpeech);

        while self.active.load(Ordering::SeqCst) {
            if Instant::now() >= self.deadline {
                return PlatformCallback::Error(ErrorCode::SPEECH_TIMEOUT);
            }
            match poll(POLL_INTERVAL) {
                Ok(Some(text)) => {
                    debug!("Recognized: {}", text);
                    self.callbacks.deliver(PlatformCallback::EndOfSpeech);
                    return PlatformCallback::Results(Some(vec![text]));
                }
                Ok(None) => {}
                Err(code) => return PlatformCallback::Error(code),
            }
        }
        PlatformCallback::Error(ErrorCode::NO_MATCH)
    }
}

struct Running {
    active: Arc<AtomicBool>,
    worker: JoinHandle<()>,
}

/// Runs a `PhraseEngine` one session per listen call. Starting never waits on
/// an old session: a stopped session only loses its token and winds down on
/// its own.
pub struct SessionRecognizer<E: PhraseEngine> {
    engine: Arc<E>,
    phrases: Arc<Vec<String>>,
    timeout: Duration,
    callbacks: CallbackSender,
    current: Option<Running>,
}

impl<E: PhraseEngine> SessionRecognizer<E> {
    pub fn new(
        engine: E,
        phrases: Vec<String>,
        timeout: Duration,
        callbacks: CallbackSender,
    ) -> Result<Self, BridgeError> {
        if phrases.is_empty() {
            return Err(BridgeError::Config(
                "phrase recognizer needs at least one phrase".to_string(),
            ));
        }
        Ok(Self {
            engine: Arc::new(engine),
            phrases: Arc::new(phrases),
            timeout,
            callbacks,
            current: None,
        })
    }

    pub fn is_listening(&self) -> bool {
        self.current
            .as_ref()
            .map(|running| running.active.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    fn cancel(&self) {
        if let Some(running) = self.current.as_ref() {
            running.active.store(false, Ordering::SeqCst);
        }
    }
}

impl<E: PhraseEngine> Recognizer for SessionRecognizer<E> {
    fn start_listening(&mut self, request: &RecognitionRequest) -> Result<(), BridgeError> {
        if self.is_listening() {
            self.callbacks
                .deliver(PlatformCallback::Error(ErrorCode::RECOGNIZER_BUSY));
            return Ok(());
        }

        debug!("Listen session for {} ({:?})", request.locale, request.language_model);
        let active = Arc::new(AtomicBool::new(true));
        let session = ListenSession {
            active: Arc::clone(&active),
            deadline: Instant::now() + self.timeout,
            callbacks: self.callbacks.clone(),
        };
        let engine = Arc::clone(&self.engine);
        let phrases = Arc::clone(&self.phrases);

        let worker = thread::spawn(move || {
            let outcome = engine.listen(&phrases, &session);
            session.active.store(false, Ordering::SeqCst);
            session.callbacks.deliver(outcome);
        });

        // a previous, already cancelled session is detached, not joined
        self.current = Some(Running { active, worker });
        Ok(())
    }

    fn stop_listening(&mut self) -> Result<(), BridgeError> {
        self.cancel();
        Ok(())
    }

    fn destroy(&mut self) {
        self.cancel();
        if let Some(running) = self.current.take() {
            if running.worker.join().is_err() {
                warn!("Listen session panicked");
            }
        }
    }
}

impl<E: PhraseEngine> Drop for SessionRecognizer<E> {
    fn drop(&mut self) {
        self.destroy();
    }
}
