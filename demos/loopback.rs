//! This example runs the peripheral against an in-process host and plays the
//! part of a central: it bumps the counter, reads it back and listens to the
//! notification stream for a while.

use kivy_ble_test::{
    uuids, BoxError, Error, Host, HostConfig, HostEvent, Notifier, PeerId, PeripheralConfig,
    PeripheralController, PowerState, ServiceDefinition,
};
use stream_cancel::Tripwire;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep, Duration};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
#[error("loopback host already opened")]
struct AlreadyOpened;

struct LoopbackHost {
    events: Option<mpsc::Receiver<HostEvent<PrintNotifier>>>,
}

impl Host for LoopbackHost {
    type Notifier = PrintNotifier;
    type Error = AlreadyOpened;

    fn init(
        &mut self,
        config: &HostConfig,
    ) -> Result<mpsc::Receiver<HostEvent<PrintNotifier>>, AlreadyOpened> {
        println!("Opening loopback host: {:?}", config);
        self.events.take().ok_or(AlreadyOpened)
    }

    fn add_service(&mut self, service: &ServiceDefinition) -> Result<(), AlreadyOpened> {
        println!("Service added: {}", service.uuid());
        for characteristic in service.characteristics() {
            println!(
                "  {} {:?}",
                characteristic.uuid(),
                characteristic.properties()
            );
        }
        Ok(())
    }

    fn advertise_name_and_services(
        &mut self,
        local_name: &str,
        services: &[Uuid],
    ) -> Result<(), AlreadyOpened> {
        println!("Advertising {:?} with {:?}", local_name, services);
        Ok(())
    }
}

struct PrintNotifier;

impl Notifier for PrintNotifier {
    fn notify(&mut self, value: &[u8]) -> Result<(), BoxError> {
        println!("Notification: {}", String::from_utf8_lossy(value));
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    pretty_env_logger::init();

    let (sender, receiver) = mpsc::channel(16);
    let host = LoopbackHost {
        events: Some(receiver),
    };

    let controller =
        PeripheralController::start(host, &HostConfig::default(), PeripheralConfig::default())?;

    let (trigger, tripwire) = Tripwire::new();
    let peripheral = tokio::spawn(controller.run(tripwire));

    let central = PeerId::from("00:11:22:33:44:55");
    let send = |event| {
        let sender = sender.clone();
        async move { sender.send(event).await.ok() }
    };

    send(HostEvent::PowerStateChanged(PowerState::PoweredOn)).await;
    send(HostEvent::Connected {
        peer: central.clone(),
    })
    .await;

    for _ in 0..3 {
        let (responder, response) = oneshot::channel();
        send(HostEvent::WriteRequest {
            peer: central.clone(),
            characteristic: uuids::INCREMENT,
            value: vec![],
            responder,
        })
        .await;
        println!("Increment: {:?}", response.await);
    }

    let (responder, response) = oneshot::channel();
    send(HostEvent::ReadRequest {
        peer: central.clone(),
        characteristic: uuids::COUNTER,
        responder,
    })
    .await;
    if let Ok(Ok(value)) = response.await {
        println!("Counter: {}", String::from_utf8_lossy(&value));
    }

    send(HostEvent::Subscribe {
        peer: central.clone(),
        characteristic: uuids::STREAM,
        notifier: PrintNotifier,
    })
    .await;

    sleep(Duration::from_millis(550)).await;

    send(HostEvent::Disconnected { peer: central }).await;

    trigger.cancel();

    peripheral.await.expect("peripheral task panicked")
}
