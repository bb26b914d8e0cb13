use lumen_lighting::LightingError;

/// Why a pool task did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("worker fault: {0}")]
    WorkerFault(String),
    #[error("task pool disconnected")]
    Disconnected,
    #[error("timed out waiting for task completion")]
    Timeout,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Lighting(#[from] LightingError),
    #[error("building worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error(transparent)]
    Task(#[from] TaskError),
}
