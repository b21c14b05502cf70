use crate::engine::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Engine channel closed")]
    ChannelClosed,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}
