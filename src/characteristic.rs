use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::AttError;
use crate::host::{Notifier, PeerId};
use crate::{Counter, NotificationStreamer};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CharacteristicProperty {
    Read,
    Write,
    Notify,
}

/// Application logic behind one characteristic.
///
/// Handlers run inside the host's request handling and must not block.
/// Operations a handler does not override are rejected.
pub trait CharacteristicHandler: Send + Sync {
    fn read(&self, _peer: &PeerId) -> Result<Vec<u8>, AttError> {
        Err(AttError::RequestNotSupported)
    }

    fn write(&self, _peer: &PeerId, _value: &[u8]) -> Result<(), AttError> {
        Err(AttError::RequestNotSupported)
    }

    fn subscribe(&self, _peer: &PeerId, _notifier: Box<dyn Notifier>) -> Result<(), AttError> {
        Err(AttError::RequestNotSupported)
    }

    fn unsubscribe(&self, _peer: &PeerId) {}
}

#[derive(Clone)]
pub struct Characteristic {
    pub(crate) uuid: Uuid,
    pub(crate) properties: Vec<CharacteristicProperty>,
    pub(crate) handler: Arc<dyn CharacteristicHandler>,
}

impl Characteristic {
    pub fn new(
        uuid: Uuid,
        properties: Vec<CharacteristicProperty>,
        handler: impl CharacteristicHandler + 'static,
    ) -> Self {
        Self {
            uuid,
            properties,
            handler: Arc::new(handler),
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn properties(&self) -> &[CharacteristicProperty] {
        &self.properties
    }

    pub fn has_property(&self, property: CharacteristicProperty) -> bool {
        self.properties.contains(&property)
    }
}

impl fmt::Debug for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Characteristic")
            .field("uuid", &self.uuid)
            .field("properties", &self.properties)
            .finish()
    }
}

/// Answers `"test"`. Also resets the counter.
pub struct EchoHandler {
    counter: Counter,
}

impl EchoHandler {
    pub fn new(counter: Counter) -> Self {
        Self { counter }
    }
}

impl CharacteristicHandler for EchoHandler {
    fn read(&self, _peer: &PeerId) -> Result<Vec<u8>, AttError> {
        self.counter.reset();
        log::info!("Echo");
        Ok(b"test".to_vec())
    }
}

pub struct ResetHandler {
    counter: Counter,
}

impl ResetHandler {
    pub fn new(counter: Counter) -> Self {
        Self { counter }
    }
}

impl CharacteristicHandler for ResetHandler {
    fn write(&self, _peer: &PeerId, _value: &[u8]) -> Result<(), AttError> {
        self.counter.reset();
        log::info!("Reset counter");
        Ok(())
    }
}

pub struct IncrementHandler {
    counter: Counter,
}

impl IncrementHandler {
    pub fn new(counter: Counter) -> Self {
        Self { counter }
    }
}

impl CharacteristicHandler for IncrementHandler {
    fn write(&self, _peer: &PeerId, _value: &[u8]) -> Result<(), AttError> {
        let value = self.counter.increment();
        log::info!("Increment counter");
        log::trace!("Counter is now {}", value);
        Ok(())
    }
}

/// Reports the counter as a decimal string.
pub struct CounterHandler {
    counter: Counter,
}

impl CounterHandler {
    pub fn new(counter: Counter) -> Self {
        Self { counter }
    }
}

impl CharacteristicHandler for CounterHandler {
    fn read(&self, _peer: &PeerId) -> Result<Vec<u8>, AttError> {
        let value = self.counter.get();
        log::info!("Response counter: {}", value);
        Ok(value.to_string().into_bytes())
    }
}

pub struct StreamHandler {
    streamer: NotificationStreamer,
}

impl StreamHandler {
    pub fn new(streamer: NotificationStreamer) -> Self {
        Self { streamer }
    }
}

impl CharacteristicHandler for StreamHandler {
    fn subscribe(&self, peer: &PeerId, notifier: Box<dyn Notifier>) -> Result<(), AttError> {
        self.streamer.start(peer.clone(), notifier);
        Ok(())
    }

    fn unsubscribe(&self, peer: &PeerId) {
        self.streamer.stop(peer);
    }
}
