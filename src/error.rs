use std::{io, path::PathBuf};

use crate::alarm::AlarmId;

pub type ClockResult<T> = Result<T, ClockError>;

/// Everything that can go wrong while running the clock.
///
/// None of these are fatal to the tick loop, they are reported at the
/// boundary of the operation that raised them and the state machine stays in
/// its last valid state.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    #[error("alarm {0} does not exist")]
    AlarmNotFound(AlarmId),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    PersistenceFailure(#[from] PersistenceError),

    #[error(transparent)]
    ClockSetFailure(#[from] ClockSetError),
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("couldn't read alarm file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("couldn't write alarm file {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("couldn't parse alarm file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("couldn't serialize alarms: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ClockSetError {
    #[error("couldn't run the date program: {0}")]
    Spawn(#[from] io::Error),

    #[error("`date --set {arg}` exited with {status}: {stderr}")]
    Rejected {
        arg: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}
