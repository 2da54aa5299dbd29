//! Identifiers exposed to centrals.

use uuid::Uuid;

pub const SERVICE: Uuid = Uuid::from_u128(0x16fe0d00_c111_11e3_b8c8_0002a5d5c51b);

/// Read: returns `"test"` and resets the counter.
pub const ECHO: Uuid = Uuid::from_u128(0x16fe0d01_c111_11e3_b8c8_0002a5d5c51b);
/// Write: resets the counter.
pub const RESET: Uuid = Uuid::from_u128(0x16fe0d02_c111_11e3_b8c8_0002a5d5c51b);
/// Write: increments the counter.
pub const INCREMENT: Uuid = Uuid::from_u128(0x16fe0d03_c111_11e3_b8c8_0002a5d5c51b);
/// Read: the counter as a decimal string.
pub const COUNTER: Uuid = Uuid::from_u128(0x16fe0d04_c111_11e3_b8c8_0002a5d5c51b);
/// Notify: `1, 2, 3, ...` every notify interval.
pub const STREAM: Uuid = Uuid::from_u128(0x16fe0d05_c111_11e3_b8c8_0002a5d5c51b);
