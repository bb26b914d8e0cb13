//! Background task pool and the lighting service that schedules chunk
//! lighting on it.
#![forbid(unsafe_code)]

mod config;
mod error;
mod event;
mod job;
mod pool;
mod service;

pub use config::RuntimeConfig;
pub use error::{ServiceError, TaskError};
pub use event::{JobCause, LightingEvent};
pub use job::{LightingJob, LightingOutcome, LightingRequest, LightingResult, execute};
pub use pool::{TaskHandle, TaskId, TaskPool};
pub use service::{LightingService, ServiceStats};
