//! Contract with the BLE host stack that owns the radio, the attribute
//! database and the connections.

use std::fmt;

use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::error::{AttError, BoxError};
use crate::ServiceDefinition;

/// Opaque identity of a connected central, assigned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerId(String);

impl PeerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(id: &str) -> Self {
        PeerId(id.to_string())
    }
}

impl From<String> for PeerId {
    fn from(id: String) -> Self {
        PeerId(id)
    }
}

/// Adapter power state as reported by the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PowerState {
    Unknown,
    Resetting,
    Unsupported,
    Unauthorized,
    PoweredOff,
    PoweredOn,
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PowerState::Unknown => "Unknown",
            PowerState::Resetting => "Resetting",
            PowerState::Unsupported => "Unsupported",
            PowerState::Unauthorized => "Unauthorized",
            PowerState::PoweredOff => "PoweredOff",
            PowerState::PoweredOn => "PoweredOn",
        };
        f.write_str(name)
    }
}

/// Options handed to the host when it is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Maximum number of simultaneous central connections.
    max_connections: u16,
    /// HCI device index. `-1` picks the first available adapter.
    device_id: i32,
    /// Whether the host should verify controller features before use.
    check_features: bool,
    /// Advertising interval bounds, in units of 0.625 ms.
    advertising_interval_min: u16,
    advertising_interval_max: u16,
    /// Bitmask of advertising channels 37, 38 and 39.
    advertising_channel_map: u8,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            max_connections: 1,
            device_id: -1,
            check_features: false,
            advertising_interval_min: 0x04ff,
            advertising_interval_max: 0x04ff,
            advertising_channel_map: 0x07,
        }
    }
}

impl HostConfig {
    pub fn max_connections(mut self, max_connections: u16) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn device_id(mut self, device_id: i32, check_features: bool) -> Self {
        self.device_id = device_id;
        self.check_features = check_features;
        self
    }

    pub fn advertising_interval(mut self, min: u16, max: u16) -> Self {
        self.advertising_interval_min = min;
        self.advertising_interval_max = max;
        self
    }

    pub fn advertising_channel_map(mut self, channel_map: u8) -> Self {
        self.advertising_channel_map = channel_map;
        self
    }

    pub fn get_max_connections(&self) -> u16 {
        self.max_connections
    }

    pub fn get_device_id(&self) -> i32 {
        self.device_id
    }

    pub fn get_check_features(&self) -> bool {
        self.check_features
    }

    pub fn get_advertising_interval(&self) -> (u16, u16) {
        (self.advertising_interval_min, self.advertising_interval_max)
    }

    pub fn get_advertising_channel_map(&self) -> u8 {
        self.advertising_channel_map
    }
}

/// Handle for pushing notifications to one subscribed central.
pub trait Notifier: Send {
    fn notify(&mut self, value: &[u8]) -> Result<(), BoxError>;
}

/// Everything the host reports to the peripheral.
#[derive(Debug)]
pub enum HostEvent<N> {
    PowerStateChanged(PowerState),
    Connected {
        peer: PeerId,
    },
    Disconnected {
        peer: PeerId,
    },
    ReadRequest {
        peer: PeerId,
        characteristic: Uuid,
        responder: oneshot::Sender<Result<Vec<u8>, AttError>>,
    },
    WriteRequest {
        peer: PeerId,
        characteristic: Uuid,
        value: Vec<u8>,
        responder: oneshot::Sender<Result<(), AttError>>,
    },
    /// The central enabled notifications. `notifier` stays valid until the
    /// matching [`HostEvent::Unsubscribe`] or [`HostEvent::Disconnected`].
    Subscribe {
        peer: PeerId,
        characteristic: Uuid,
        notifier: N,
    },
    Unsubscribe {
        peer: PeerId,
        characteristic: Uuid,
    },
}

/// BLE host stack the peripheral runs on.
pub trait Host {
    type Notifier: Notifier + 'static;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Open the device. Events are delivered through the returned receiver
    /// until the host shuts down.
    fn init(
        &mut self,
        config: &HostConfig,
    ) -> Result<mpsc::Receiver<HostEvent<Self::Notifier>>, Self::Error>;

    fn add_service(&mut self, service: &ServiceDefinition) -> Result<(), Self::Error>;

    fn advertise_name_and_services(
        &mut self,
        local_name: &str,
        services: &[Uuid],
    ) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_host_config() {
        let config = HostConfig::default();
        assert_eq!(config.get_max_connections(), 1);
        assert_eq!(config.get_device_id(), -1);
        assert!(!config.get_check_features());
        assert_eq!(config.get_advertising_interval(), (0x04ff, 0x04ff));
        assert_eq!(config.get_advertising_channel_map(), 0x07);
    }

    #[test]
    fn host_config_builder() {
        let config = HostConfig::default()
            .max_connections(4)
            .device_id(1, true)
            .advertising_interval(0x0020, 0x0040)
            .advertising_channel_map(0x01);
        assert_eq!(config.get_max_connections(), 4);
        assert_eq!(config.get_device_id(), 1);
        assert!(config.get_check_features());
        assert_eq!(config.get_advertising_interval(), (0x0020, 0x0040));
        assert_eq!(config.get_advertising_channel_map(), 0x01);
    }

    #[test]
    fn power_state_names() {
        assert_eq!(PowerState::PoweredOn.to_string(), "PoweredOn");
        assert_eq!(PowerState::Unauthorized.to_string(), "Unauthorized");
    }

    #[test]
    fn peer_id_display() {
        let peer = PeerId::from("AA:BB:CC:DD:EE:FF");
        assert_eq!(peer.to_string(), "AA:BB:CC:DD:EE:FF");
        assert_eq!(peer, PeerId::from("AA:BB:CC:DD:EE:FF".to_string()));
    }
}
