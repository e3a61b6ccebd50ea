use std::result;

use thiserror::Error;

use crate::cmd::CmdError;
use crate::part::layout::ParseError;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("getting existing partitions of `{device}`: {source}")]
    DiskQueryFailed {
        device: String,
        #[source]
        source: CmdError,
    },
    #[error("parsing existing partitions of `{device}`: {source}")]
    LayoutParseFailed {
        device: String,
        #[source]
        source: ParseError,
    },
    #[error("missing first partition on `{device}`")]
    MissingAnchorPartition { device: String },
    #[error("removing partition {number} from `{device}`: {source}")]
    PartitionRemovalFailed {
        device: String,
        number: u32,
        #[source]
        source: CmdError,
    },
    #[error("creating partition {start}-{end} on `{device}`: {source}")]
    PartitionCreationFailed {
        device: String,
        start: u64,
        end: u64,
        #[source]
        source: CmdError,
    },
    #[error("partitioning disk `{device}`: {source}")]
    Partitioning {
        device: String,
        #[source]
        source: Box<Error>,
    },
    #[error("getting remaining size of `{device}`: {source}")]
    DeviceSize {
        device: String,
        #[source]
        source: Box<Error>,
    },
    #[error("byte offset out of range ({0})")]
    SizeOverflow(String),
    #[error("max tries must be > 0")]
    InvalidMaxTries,
}

impl Error {
    pub(crate) fn partitioning(device: &str, source: Error) -> Self {
        Error::Partitioning {
            device: device.to_owned(),
            source: Box::new(source),
        }
    }

    pub(crate) fn device_size(device: &str, source: Error) -> Self {
        Error::DeviceSize {
            device: device.to_owned(),
            source: Box::new(source),
        }
    }

    /// Innermost error, skipping the operation wrappers.
    pub fn inner(&self) -> &Error {
        match self {
            Error::Partitioning { source, .. } | Error::DeviceSize { source, .. } => source.inner(),
            e => e,
        }
    }
}
