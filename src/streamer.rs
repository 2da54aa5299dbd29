use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::{stream, Stream, StreamExt};
use stream_cancel::{Trigger, Valved};

use crate::host::{Notifier, PeerId};

/// Runs one notification session per subscribed peer.
///
/// A session sends `1, 2, 3, ...` to its peer, sleeping for the configured
/// interval before each value. Sessions stop when [`NotificationStreamer::stop`]
/// drops their trigger; a stop that lands during the sleep ends the session
/// without another notification.
#[derive(Clone)]
pub struct NotificationStreamer {
    interval: Duration,
    sessions: Arc<Mutex<HashMap<PeerId, Trigger>>>,
}

impl NotificationStreamer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start streaming to `peer`. An existing session for the same peer is
    /// stopped first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, peer: PeerId, mut notifier: Box<dyn Notifier>) {
        let interval = self.interval;
        let values: Pin<Box<dyn Stream<Item = u64> + Send>> =
            Box::pin(stream::unfold(1u64, move |next| async move {
                tokio::time::sleep(interval).await;
                Some((next, next + 1))
            }));
        let (trigger, mut values) = Valved::new(values);

        if self.sessions().insert(peer.clone(), trigger).is_some() {
            log::debug!("Replaced notification session for {}", peer);
        }

        tokio::spawn(async move {
            log::info!("Notifications enabled for {}", peer);

            while let Some(value) = values.next().await {
                log::trace!("Notify {} <- {}", peer, value);

                if let Err(e) = notifier.notify(value.to_string().as_bytes()) {
                    log::debug!("Could not notify {}: {}", peer, e);
                }
            }

            log::info!("Notifications disabled for {}", peer);
        });
    }

    /// Stop the session for `peer`. Returns false if there was none.
    pub fn stop(&self, peer: &PeerId) -> bool {
        self.sessions().remove(peer).is_some()
    }

    pub fn stop_all(&self) {
        self.sessions().clear();
    }

    pub fn is_active(&self, peer: &PeerId) -> bool {
        self.sessions().contains_key(peer)
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions().len()
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<PeerId, Trigger>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for NotificationStreamer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationStreamer")
            .field("interval", &self.interval)
            .field("active_sessions", &self.active_sessions())
            .finish()
    }
}
