//! Duplicate suppression for inbound chat events.
//!
//! Chat platforms redeliver webhook events when an acknowledgement is slow or
//! lost. [`IdempotencyCache`] admits each event key once and remembers it until
//! a periodic sweep evicts it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod clock;

pub use cache::{IdempotencyCache, IdempotencyCacheConfig, IdempotencyCacheConfigBuilder};
pub use clock::{Clock, ManualClock, SystemClock};
