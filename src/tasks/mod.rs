//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the service is up.
//!
//! # Tasks
//! - TTL Sweep: removes idle cache entries at a fixed interval

mod sweeper;

pub use sweeper::{spawn_sweep_task, SweepHandle};
