//! Background Tasks Module
//!
//! Periodic eviction sweeps of the template and data caches.

mod cleanup;

pub use cleanup::{spawn_sweep_task, Sweep, SweepHandle};
