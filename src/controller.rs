use std::error::Error as _;
use std::time::Duration;

use futures::StreamExt;
use stream_cancel::Tripwire;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::{AttError, Error, Result};
use crate::host::{Host, HostConfig, HostEvent, PeerId, PowerState};
use crate::ServiceDefinition;

/// Name put in the advertisement by default.
pub const LOCAL_NAME: &str = "KivyBLETest";

/// Default delay before each stream notification.
pub const NOTIFY_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct PeripheralConfig {
    /// Local name advertised next to the service UUID.
    local_name: String,
    /// Delay before each value of a notification session.
    notify_interval: Duration,
}

impl Default for PeripheralConfig {
    fn default() -> Self {
        Self {
            local_name: LOCAL_NAME.to_string(),
            notify_interval: NOTIFY_INTERVAL,
        }
    }
}

impl PeripheralConfig {
    pub fn local_name(mut self, local_name: impl Into<String>) -> Self {
        self.local_name = local_name.into();
        self
    }

    pub fn notify_interval(mut self, notify_interval: Duration) -> Self {
        self.notify_interval = notify_interval;
        self
    }

    pub fn get_local_name(&self) -> &str {
        &self.local_name
    }

    pub fn get_notify_interval(&self) -> Duration {
        self.notify_interval
    }
}

/// Drives the test service from host events.
///
/// The service is built on the first `PoweredOn` state. Later `PoweredOn`
/// states (e.g. after the adapter was reset) register and advertise that same
/// instance again, so the counter survives an adapter reset.
pub struct PeripheralController<H: Host> {
    context: PeripheralContext<H>,
    events: mpsc::Receiver<HostEvent<H::Notifier>>,
}

impl<H: Host> PeripheralController<H> {
    /// Open the host. Failing here is fatal: there is nothing to serve without a device.
    pub fn start(mut host: H, host_config: &HostConfig, config: PeripheralConfig) -> Result<Self> {
        log::trace!("Opening device with {:?}", host_config);

        let events = host.init(host_config).map_err(|e| {
            log::error!("Failed to open device, err: {}", e);
            Error::HostInit(Box::new(e))
        })?;

        Ok(Self {
            context: PeripheralContext {
                host,
                config,
                service: None,
            },
            events,
        })
    }

    /// The registered service, once the adapter has been powered on.
    pub fn service(&self) -> Option<&ServiceDefinition> {
        self.context.service.as_ref()
    }

    pub fn config(&self) -> &PeripheralConfig {
        &self.context.config
    }

    /// Handle host events until `shutdown` trips.
    ///
    /// Returns [`Error::EventChannelClosed`] if the host goes away first. All
    /// notification sessions are stopped either way.
    pub async fn run(self, shutdown: Tripwire) -> Result<()> {
        let Self {
            mut context,
            events,
        } = self;

        let mut events = ReceiverStream::new(events);
        tokio::pin!(shutdown);
        let mut shutdown_disabled = false;

        let result = loop {
            tokio::select! {
                biased;

                cancelled = &mut shutdown, if !shutdown_disabled => {
                    if cancelled {
                        log::info!("Peripheral was stopped.");
                        break Ok(());
                    }
                    // Trigger was disabled: keep running until the host goes away.
                    shutdown_disabled = true;
                }
                event = events.next() => match event {
                    Some(event) => context.on_event(event),
                    None => {
                        log::warn!("Host event channel closed.");
                        break Err(Error::EventChannelClosed);
                    }
                },
            }
        };

        context.stop();

        result
    }
}

struct PeripheralContext<H: Host> {
    host: H,
    config: PeripheralConfig,
    service: Option<ServiceDefinition>,
}

impl<H: Host> PeripheralContext<H> {
    fn on_event(&mut self, event: HostEvent<H::Notifier>) {
        match event {
            HostEvent::PowerStateChanged(state) => self.on_power_state_changed(state),
            HostEvent::Connected { peer } => {
                log::info!("Connect: {}", peer);
            }
            HostEvent::Disconnected { peer } => self.on_disconnected(peer),
            HostEvent::ReadRequest {
                peer,
                characteristic,
                responder,
            } => {
                let response = self
                    .registered()
                    .and_then(|service| service.read(&peer, characteristic));

                if responder.send(response).is_err() {
                    log::debug!("Read response for {} was not collected", peer);
                }
            }
            HostEvent::WriteRequest {
                peer,
                characteristic,
                value,
                responder,
            } => {
                let response = self
                    .registered()
                    .and_then(|service| service.write(&peer, characteristic, &value));

                if responder.send(response).is_err() {
                    log::debug!("Write response for {} was not collected", peer);
                }
            }
            HostEvent::Subscribe {
                peer,
                characteristic,
                notifier,
            } => {
                let result = self.registered().and_then(|service| {
                    service.subscribe(&peer, characteristic, Box::new(notifier))
                });

                if let Err(e) = result {
                    log::warn!(
                        "Rejected subscription from {} to {}: {:?}",
                        peer,
                        characteristic,
                        e
                    );
                }
            }
            HostEvent::Unsubscribe {
                peer,
                characteristic,
            } => {
                if let Some(service) = &self.service {
                    service.unsubscribe(&peer, characteristic);
                }
            }
        }
    }

    fn on_power_state_changed(&mut self, state: PowerState) {
        log::info!("State: {}", state);

        if state != PowerState::PoweredOn {
            return;
        }

        if let Err(e) = self.power_on() {
            match e.source() {
                Some(source) => log::error!("{}: {}", e, source),
                None => log::error!("{}", e),
            }
        }
    }

    fn power_on(&mut self) -> Result<()> {
        let notify_interval = self.config.notify_interval;
        let service = self.service.get_or_insert_with(|| {
            log::debug!("Building service");
            ServiceDefinition::new(notify_interval)
        });
        let uuid = service.uuid();

        self.host
            .add_service(service)
            .map_err(|e| Error::ServiceRegistration(uuid, Box::new(e)))?;
        log::info!("Registered service {}", uuid);

        self.host
            .advertise_name_and_services(&self.config.local_name, &[uuid])
            .map_err(|e| Error::Advertising(Box::new(e)))?;
        log::info!("Advertising {} as \"{}\"", uuid, self.config.local_name);

        Ok(())
    }

    fn on_disconnected(&mut self, peer: PeerId) {
        log::info!("Disconnect: {}", peer);

        if let Some(service) = &self.service {
            service.disconnect(&peer);
        }
    }

    fn registered(&self) -> std::result::Result<&ServiceDefinition, AttError> {
        self.service.as_ref().ok_or(AttError::InvalidHandle)
    }

    fn stop(&mut self) {
        if let Some(service) = &self.service {
            service.shutdown();
        }
    }
}
