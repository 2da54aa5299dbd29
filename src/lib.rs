//! BLE peripheral test service.
//!
//! Exposes a counter and a notification stream to a connecting central on top
//! of a BLE host stack implementing [`Host`]. Centrals can reset, increment and
//! read the counter, read a fixed echo string, and subscribe to a stream of
//! increasing values sent every 100 ms.
//!
//! ## Usage
//!
//! The service can be exercised directly, without a host:
//!
//! ```rust
//! use std::time::Duration;
//! use kivy_ble_test::{uuids, PeerId, ServiceDefinition};
//!
//! let service = ServiceDefinition::new(Duration::from_millis(100));
//! let central = PeerId::from("central");
//!
//! for _ in 0..3 {
//!     service.write(&central, uuids::INCREMENT, &[]).unwrap();
//! }
//! assert_eq!(service.read(&central, uuids::COUNTER).unwrap(), b"3");
//!
//! // Reading the echo characteristic also resets the counter.
//! assert_eq!(service.read(&central, uuids::ECHO).unwrap(), b"test");
//! assert_eq!(service.read(&central, uuids::COUNTER).unwrap(), b"0");
//! ```
//!
//! On a device, hand the host to a [`PeripheralController`] and run it until
//! shutdown:
//!
//! ```rust,ignore
//! let (trigger, tripwire) = stream_cancel::Tripwire::new();
//! let controller = PeripheralController::start(host, &HostConfig::default(), PeripheralConfig::default())?;
//! controller.run(tripwire).await?;
//! ```

#![warn(clippy::all, future_incompatible, nonstandard_style, rust_2018_idioms)]

pub use characteristic::{Characteristic, CharacteristicHandler, CharacteristicProperty};
pub use controller::{PeripheralConfig, PeripheralController, LOCAL_NAME, NOTIFY_INTERVAL};
pub use counter::Counter;
pub use error::{AttError, BoxError, Error, Result};
pub use host::{Host, HostConfig, HostEvent, Notifier, PeerId, PowerState};
pub use service::ServiceDefinition;
pub use streamer::NotificationStreamer;

mod controller;
mod counter;
mod error;
mod host;
mod service;
mod streamer;

pub mod characteristic;
pub mod uuids;
