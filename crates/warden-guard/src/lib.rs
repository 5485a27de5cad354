//! Warden Guard - process-wide execution guards for the dispatch path.
//!
//! Three independent, individually-locked components the dispatcher consults
//! on every command:
//!
//! - [`EmergencyStop`]: a generational cancellation signal, triggerable from
//!   any thread (including a global input-hook callback).
//! - [`RateLimiter`]: an advisory sliding one-second window counter.
//! - [`SafeZone`]: an optional global restriction binding input-injection
//!   commands to one window/region.
//!
//! None of these share a lock with each other or with the dispatcher —
//! unrelated operations never serialize on a global mutex.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod rate;
pub mod stop;
pub mod zone;

pub use rate::RateLimiter;
pub use stop::EmergencyStop;
pub use zone::{Region, SafeZone, SafeZoneConfig};
