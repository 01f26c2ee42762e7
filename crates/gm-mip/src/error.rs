use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError<E>
where
    E: std::error::Error + 'static,
{
    #[error("base image is empty ({width}x{height})")]
    EmptyBase { width: usize, height: usize },
    #[error("failed to persist mip level {level}")]
    Persistence {
        level: usize,
        #[source]
        source: E,
    },
    #[error("cancelled after {completed} level(s)")]
    Cancelled { completed: usize },
}
