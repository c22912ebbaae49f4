// sapi.rs - Windows Speech Recognition backend using sapi_lite
use super::session::{ListenSession, PhraseEngine, SessionRecognizer};
use super::ErrorCode;
use crate::dispatch::{CallbackSender, PlatformCallback};
use crate::error::BridgeError;
use log::{info, warn};
use sapi_lite::stt::{Recognizer as SapiEngine, Rule, SyncContext};
use std::time::Duration;

pub type SapiRecognizer = SessionRecognizer<SapiPhraseEngine>;

pub fn sapi_recognizer(
    phrases: Vec<String>,
    timeout: Duration,
    callbacks: CallbackSender,
) -> Result<SapiRecognizer, BridgeError> {
    info!("SAPI recognizer with {} phrases", phrases.len());
    SessionRecognizer::new(SapiPhraseEngine, phrases, timeout, callbacks)
}

/// Each session initializes its own COM apartment on the worker thread.
pub struct SapiPhraseEngine;

impl PhraseEngine for SapiPhraseEngine {
    fn listen(&self, phrases: &[String], session: &ListenSession) -> PlatformCallback {
        if let Err(e) = sapi_lite::initialize() {
            warn!("Failed to initialize SAPI: {:?}", e);
            return PlatformCallback::Error(ErrorCode::CLIENT);
        }
        let outcome = run_session(phrases, session);
        sapi_lite::finalize();
        outcome
    }
}

fn run_session(phrases: &[String], session: &ListenSession) -> PlatformCallback {
    let engine = match SapiEngine::new() {
        Ok(engine) => engine,
        Err(e) => {
            warn!("Failed to create SAPI recognizer: {:?}", e);
            return PlatformCallback::Error(ErrorCode::AUDIO);
        }
    };
    let ctx = match SyncContext::new(&engine) {
        Ok(ctx) => ctx,
        Err(e) => {
            warn!("Failed to create recognition context: {:?}", e);
            return PlatformCallback::Error(ErrorCode::CLIENT);
        }
    };

    let rules: Vec<Rule> = phrases.iter().map(|p| Rule::text(p.as_str())).collect();
    let mut builder = ctx.grammar_builder();
    for rule in &rules {
        builder.add_rule(rule);
    }
    let grammar = match builder.build() {
        Ok(grammar) => grammar,
        Err(e) => {
            warn!("Failed to create grammar: {:?}", e);
            return PlatformCallback::Error(ErrorCode::CLIENT);
        }
    };
    if let Err(e) = grammar.set_enabled(true) {
        warn!("Failed to enable grammar: {:?}", e);
        return PlatformCallback::Error(ErrorCode::CLIENT);
    }

    session.drive(|wait| match ctx.recognize(wait) {
        Ok(phrase) => Ok(phrase.map(|p| p.text.to_string_lossy().into_owned())),
        Err(e) => {
            warn!("Recognition error: {:?}", e);
            Err(ErrorCode::CLIENT)
        }
    })
}
