// bridge.rs - a running adapter plus the thread that feeds it platform callbacks
use crate::adapter::SpeechAdapter;
use crate::config::BridgeConfig;
use crate::dispatch::{callback_channel, spawn_dispatcher, CallbackSender};
use crate::error::BridgeError;
use crate::listener::SpeechCommands;
use crate::platform::{native_services, EventSink, HostContext, PlatformServices};
use anyhow::{Context, Result};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;

/// Host-facing handle. Commands and callbacks both go through the same lock,
/// so the adapter only ever sees one call at a time.
pub struct SpeechBridge {
    adapter: Arc<Mutex<SpeechAdapter>>,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

impl SpeechBridge {
    /// Builds the platform services with a callback sender, then starts dispatching.
    pub fn start<F>(config: &BridgeConfig, build: F) -> Result<Self>
    where
        F: FnOnce(&CallbackSender) -> PlatformServices,
    {
        config.validate().context("invalid speech bridge config")?;

        let (callbacks, receiver) = callback_channel();
        let services = build(&callbacks);
        // backends keep their own clones; the dispatcher stops once they are gone
        drop(callbacks);

        let adapter = Arc::new(Mutex::new(SpeechAdapter::new(services, config)));
        let dispatcher = spawn_dispatcher(Arc::clone(&adapter), receiver);

        Ok(Self {
            adapter,
            dispatcher: Mutex::new(Some(dispatcher)),
        })
    }

    pub fn start_native(
        config: &BridgeConfig,
        host: Box<dyn HostContext>,
        sink: Box<dyn EventSink>,
    ) -> Result<Self> {
        Self::start(config, |callbacks| {
            native_services(config, callbacks, host, sink)
        })
    }

    pub fn start_listening(&self) -> Result<(), BridgeError> {
        self.adapter()?.start_listening();
        Ok(())
    }

    pub fn stop_listening(&self) -> Result<(), BridgeError> {
        self.adapter()?.stop_listening();
        Ok(())
    }

    pub fn speak(&self, text: &str) -> Result<(), BridgeError> {
        self.adapter()?.speak(text);
        Ok(())
    }

    /// Releases the platform handles and waits for pending callbacks to drain.
    pub fn shutdown(&self) {
        match self.adapter.lock() {
            Ok(mut adapter) => adapter.shutdown(),
            Err(_) => log::warn!("Speech adapter lock poisoned during shutdown"),
        }

        let handle = match self.dispatcher.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        if let Some(handle) = handle {
            if handle.join().is_err() {
                log::warn!("Speech callback dispatcher panicked");
            }
        }
    }

    fn adapter(&self) -> Result<MutexGuard<'_, SpeechAdapter>, BridgeError> {
        self.adapter
            .lock()
            .map_err(|_| BridgeError::Lock("speech adapter"))
    }
}

impl Drop for SpeechBridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}
