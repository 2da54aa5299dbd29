use std::time::Duration;

use uuid::Uuid;

use crate::characteristic::{
    Characteristic, CharacteristicProperty, CounterHandler, EchoHandler, IncrementHandler,
    ResetHandler, StreamHandler,
};
use crate::error::AttError;
use crate::host::{Notifier, PeerId};
use crate::{uuids, Counter, NotificationStreamer};

/// The test service: five characteristics sharing one counter.
///
/// Every instance owns its own counter, so building twice gives two
/// independent services.
#[derive(Debug)]
pub struct ServiceDefinition {
    uuid: Uuid,
    characteristics: Vec<Characteristic>,
    counter: Counter,
    streamer: NotificationStreamer,
}

impl ServiceDefinition {
    /// Build the service with notifications sent every `notify_interval`.
    pub fn new(notify_interval: Duration) -> Self {
        use CharacteristicProperty::*;

        let counter = Counter::new();
        let streamer = NotificationStreamer::new(notify_interval);

        let characteristics = vec![
            Characteristic::new(uuids::ECHO, vec![Read], EchoHandler::new(counter.clone())),
            Characteristic::new(uuids::RESET, vec![Write], ResetHandler::new(counter.clone())),
            Characteristic::new(
                uuids::INCREMENT,
                vec![Write],
                IncrementHandler::new(counter.clone()),
            ),
            Characteristic::new(uuids::COUNTER, vec![Read], CounterHandler::new(counter.clone())),
            Characteristic::new(uuids::STREAM, vec![Notify], StreamHandler::new(streamer.clone())),
        ];

        Self {
            uuid: uuids::SERVICE,
            characteristics,
            counter,
            streamer,
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn characteristics(&self) -> &[Characteristic] {
        &self.characteristics
    }

    pub fn characteristic(&self, uuid: Uuid) -> Option<&Characteristic> {
        self.characteristics.iter().find(|c| c.uuid == uuid)
    }

    pub fn counter(&self) -> &Counter {
        &self.counter
    }

    pub fn streamer(&self) -> &NotificationStreamer {
        &self.streamer
    }

    pub fn read(&self, peer: &PeerId, characteristic: Uuid) -> Result<Vec<u8>, AttError> {
        let characteristic = self.lookup(characteristic)?;
        if !characteristic.has_property(CharacteristicProperty::Read) {
            return Err(AttError::ReadNotPermitted);
        }
        characteristic.handler.read(peer)
    }

    pub fn write(
        &self,
        peer: &PeerId,
        characteristic: Uuid,
        value: &[u8],
    ) -> Result<(), AttError> {
        let characteristic = self.lookup(characteristic)?;
        if !characteristic.has_property(CharacteristicProperty::Write) {
            return Err(AttError::WriteNotPermitted);
        }
        characteristic.handler.write(peer, value)
    }

    /// Must be called from within a tokio runtime.
    pub fn subscribe(
        &self,
        peer: &PeerId,
        characteristic: Uuid,
        notifier: Box<dyn Notifier>,
    ) -> Result<(), AttError> {
        let characteristic = self.lookup(characteristic)?;
        if !characteristic.has_property(CharacteristicProperty::Notify) {
            return Err(AttError::RequestNotSupported);
        }
        characteristic.handler.subscribe(peer, notifier)
    }

    pub fn unsubscribe(&self, peer: &PeerId, characteristic: Uuid) {
        if let Some(characteristic) = self.characteristic(characteristic) {
            characteristic.handler.unsubscribe(peer);
        }
    }

    /// Drop every subscription held by `peer`.
    pub fn disconnect(&self, peer: &PeerId) {
        self.characteristics
            .iter()
            .filter(|c| c.has_property(CharacteristicProperty::Notify))
            .for_each(|c| c.handler.unsubscribe(peer));
    }

    /// Stop all notification sessions.
    pub fn shutdown(&self) {
        self.streamer.stop_all();
    }

    fn lookup(&self, uuid: Uuid) -> Result<&Characteristic, AttError> {
        self.characteristic(uuid).ok_or_else(|| {
            log::warn!("Request for unknown characteristic {}", uuid);
            AttError::InvalidHandle
        })
    }
}
