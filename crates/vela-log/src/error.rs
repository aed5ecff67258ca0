use vela_mem::CapacityError;

use crate::log::CustomFmt;

#[derive(Debug)]
pub enum LogError {
    UnknownFormat(CustomFmt),
    CapacityError(CapacityError),
    IoError(std::io::Error),
}

impl core::fmt::Display for LogError {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownFormat(fmt) => write!(f, "unknown custom log format {}", fmt.index()),
            Self::CapacityError(_) => write!(f, "log format storage error"),
            Self::IoError(_) => write!(f, "IO error"),
        }
    }
}

impl core::error::Error for LogError {

    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::UnknownFormat(_) => None,
            Self::CapacityError(err) => Some(err),
            Self::IoError(err) => Some(err),
        }
    }
}

impl From<CapacityError> for LogError {

    fn from(value: CapacityError) -> Self {
        Self::CapacityError(value)
    }
}

impl From<std::io::Error> for LogError {

    fn from(value: std::io::Error) -> Self {
        Self::IoError(value)
    }
}
