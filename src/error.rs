use thiserror::Error;

/// Failures of the host surface. Gameplay itself never fails: collisions,
/// lost lives and game over are ordinary state transitions.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid value {value:?} for {name}")]
    InvalidSetting { name: &'static str, value: String },

    #[error("there is no level {0}")]
    UnknownLevel(u8),
}
