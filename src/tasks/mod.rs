//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a cache.
//!
//! # Tasks
//! - Expiry sweep: removes expired cache entries at a fixed interval until
//!   told to shut down

mod sweep;

pub use sweep::spawn_sweep_task;
