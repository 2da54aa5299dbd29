use thiserror::Error;
use uuid::Uuid;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The BLE host could not be opened. Nothing else can run without it.
    #[error("failed to open device")]
    HostInit(#[source] BoxError),

    #[error("failed to register service {0}")]
    ServiceRegistration(Uuid, #[source] BoxError),

    #[error("failed to start advertising")]
    Advertising(#[source] BoxError),

    /// The host dropped its event sender while the controller was still running.
    #[error("host event channel closed")]
    EventChannelClosed,
}

/// Attribute protocol error codes reported back to the central.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum AttError {
    InvalidHandle = 0x01,
    ReadNotPermitted = 0x02,
    WriteNotPermitted = 0x03,
    InvalidPdu = 0x04,
    InsufficientAuthentication = 0x05,
    RequestNotSupported = 0x06,
    InvalidOffset = 0x07,
    InsufficientAuthorization = 0x08,
    AttributeNotFound = 0x0A,
    AttributeTooLong = 0x0B,
    Unlikely = 0x0E,
    InsufficientResources = 0x11,
}

impl AttError {
    /// Status byte carried in the ATT error response.
    pub fn code(self) -> u8 {
        self as u8
    }
}
