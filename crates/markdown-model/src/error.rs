use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    NotFound = 1,
    InvalidArguments = 2,
    Io = 3,
    FrontMatter = 4,
    Index = 5,
    Mismatch = 6,
}

impl ExitCode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Success),
            1 => Some(Self::NotFound),
            2 => Some(Self::InvalidArguments),
            3 => Some(Self::Io),
            4 => Some(Self::FrontMatter),
            5 => Some(Self::Index),
            6 => Some(Self::Mismatch),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("i/o error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid front matter: {0}")]
    FrontMatter(String),

    #[error("index {index} out of range (length {len})")]
    Index { index: usize, len: usize },

    #[error("invalid section: {0}")]
    InvalidSection(String),
}

impl ModelError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Io { .. } => ExitCode::Io,
            Self::FrontMatter(_) => ExitCode::FrontMatter,
            Self::Index { .. } => ExitCode::Index,
            Self::InvalidSection(_) => ExitCode::InvalidArguments,
        }
    }
}

pub type ModelResult<T> = Result<T, ModelError>;
