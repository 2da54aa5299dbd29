#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use kivy_ble_test::{
    AttError, BoxError, Host, HostConfig, HostEvent, Notifier, PeerId, ServiceDefinition,
};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum FakeError {
    #[error("no bluetooth adapter")]
    NoAdapter,
    #[error("advertising rejected")]
    AdvertisingRejected,
}

#[derive(Debug, Default)]
pub struct Recorded {
    pub config: Option<HostConfig>,
    pub services: Vec<(Uuid, Vec<Uuid>)>,
    pub advertisements: Vec<(String, Vec<Uuid>)>,
}

/// In-memory host: records registrations and lets the test inject events.
pub struct FakeHost {
    events: Option<mpsc::Receiver<HostEvent<RecordingNotifier>>>,
    recorded: Arc<Mutex<Recorded>>,
    fail_init: bool,
    fail_advertising: bool,
}

impl FakeHost {
    pub fn new() -> (Self, HostHandle) {
        let (sender, receiver) = mpsc::channel(16);
        let recorded = Arc::new(Mutex::new(Recorded::default()));

        let host = FakeHost {
            events: Some(receiver),
            recorded: recorded.clone(),
            fail_init: false,
            fail_advertising: false,
        };

        (host, HostHandle { sender, recorded })
    }

    pub fn without_adapter() -> Self {
        let (mut host, _) = Self::new();
        host.fail_init = true;
        host
    }

    pub fn rejecting_advertising(mut self) -> Self {
        self.fail_advertising = true;
        self
    }
}

impl Host for FakeHost {
    type Notifier = RecordingNotifier;
    type Error = FakeError;

    fn init(
        &mut self,
        config: &HostConfig,
    ) -> Result<mpsc::Receiver<HostEvent<RecordingNotifier>>, FakeError> {
        if self.fail_init {
            return Err(FakeError::NoAdapter);
        }
        self.recorded.lock().unwrap().config = Some(config.clone());
        self.events.take().ok_or(FakeError::NoAdapter)
    }

    fn add_service(&mut self, service: &ServiceDefinition) -> Result<(), FakeError> {
        let characteristics = service.characteristics().iter().map(|c| c.uuid()).collect();
        self.recorded
            .lock()
            .unwrap()
            .services
            .push((service.uuid(), characteristics));
        Ok(())
    }

    fn advertise_name_and_services(
        &mut self,
        local_name: &str,
        services: &[Uuid],
    ) -> Result<(), FakeError> {
        if self.fail_advertising {
            return Err(FakeError::AdvertisingRejected);
        }
        self.recorded
            .lock()
            .unwrap()
            .advertisements
            .push((local_name.to_string(), services.to_vec()));
        Ok(())
    }
}

/// Test side of the fake host, acting as the central.
#[derive(Clone)]
pub struct HostHandle {
    pub sender: mpsc::Sender<HostEvent<RecordingNotifier>>,
    pub recorded: Arc<Mutex<Recorded>>,
}

impl HostHandle {
    pub async fn send(&self, event: HostEvent<RecordingNotifier>) {
        self.sender.send(event).await.unwrap();
    }

    pub async fn read(&self, peer: &str, characteristic: Uuid) -> Result<Vec<u8>, AttError> {
        let (responder, response) = oneshot::channel();
        self.send(HostEvent::ReadRequest {
            peer: PeerId::from(peer),
            characteristic,
            responder,
        })
        .await;
        response.await.unwrap()
    }

    pub async fn read_string(&self, peer: &str, characteristic: Uuid) -> String {
        String::from_utf8(self.read(peer, characteristic).await.unwrap()).unwrap()
    }

    pub async fn write(&self, peer: &str, characteristic: Uuid, value: &[u8]) -> Result<(), AttError> {
        let (responder, response) = oneshot::channel();
        self.send(HostEvent::WriteRequest {
            peer: PeerId::from(peer),
            characteristic,
            value: value.to_vec(),
            responder,
        })
        .await;
        response.await.unwrap()
    }

    pub async fn subscribe(&self, peer: &str, characteristic: Uuid) -> RecordingNotifier {
        let notifier = RecordingNotifier::default();
        self.send(HostEvent::Subscribe {
            peer: PeerId::from(peer),
            characteristic,
            notifier: notifier.clone(),
        })
        .await;
        notifier
    }

    pub async fn unsubscribe(&self, peer: &str, characteristic: Uuid) {
        self.send(HostEvent::Unsubscribe {
            peer: PeerId::from(peer),
            characteristic,
        })
        .await;
    }

    pub fn recorded(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(Instant, Vec<u8>)>>>,
}

impl RecordingNotifier {
    pub fn values(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, value)| String::from_utf8(value.clone()).unwrap())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, value: &[u8]) -> Result<(), BoxError> {
        self.sent.lock().unwrap().push((Instant::now(), value.to_vec()));
        Ok(())
    }
}
