use std::{ffi::NulError, fmt};

use nix::errno::Errno;
use thiserror::Error;

/// Failure to get a pipeline off the ground. Anything that goes wrong after
/// a successful exec only exists as that stage's exit status.
#[derive(Debug, Error)]
pub enum RunError {
    Pipe(Errno),
    Fork(Errno),
    Wait(Errno),
    NulByte(#[from] NulError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Pipe(errno) => write!(f, "cannot create pipe: {errno}"),
            Self::Fork(errno) => write!(f, "cannot fork: {errno}"),
            Self::Wait(errno) => write!(f, "cannot wait for child: {errno}"),
            Self::NulByte(_) => write!(f, "argument contains a nul byte"),
        }
    }
}
