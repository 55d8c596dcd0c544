//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of the worker.
//!
//! # Tasks
//! - Expiration listener: feeds notification events into the refill worker
//! - Supervisor: stops the process when the listener is lost

mod listener;
mod supervisor;

pub use listener::spawn_listener_task;
pub use supervisor::supervise;
