use std::{sync::Arc, time::Instant};

use log::{error, info, warn};
use thiserror::Error;

use crate::{config::Config, error::Error, open_reader, ReadLine, Result};

pub const STATUS_OUT_OF_RANGE: u16 = 413;
pub const STATUS_INTERNAL: u16 = 500;

/// A failed lookup, translated for the transport answering the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status}: {detail}")]
pub struct ServiceError {
    pub status: u16,
    pub detail: &'static str,
}

impl From<&Error> for ServiceError {
    fn from(err: &Error) -> Self {
        match err {
            Error::LineIndexOutOfRange { .. } => Self {
                status: STATUS_OUT_OF_RANGE,
                detail: "Line index is out of range",
            },
            Error::FileNotFound { .. } => Self {
                status: STATUS_INTERNAL,
                detail: "File not found",
            },
            _ => Self {
                status: STATUS_INTERNAL,
                detail: "Internal server error",
            },
        }
    }
}

/// Bridges a transport and the line reader. Clones share the reader, and with it the index.
#[derive(Clone)]
pub struct LineService {
    reader: Arc<dyn ReadLine>,
}

impl LineService {
    pub fn new(config: &Config) -> LineService {
        info!(
            "serving {} using {:?} lookups",
            config.path.display(),
            config.strategy
        );
        Self::from_reader(open_reader(config.path.clone(), config.strategy))
    }

    pub fn from_reader(reader: Arc<dyn ReadLine>) -> LineService {
        Self { reader }
    }

    /// Does the expensive preparation of the file once. Should be called before accepting
    /// requests.
    pub async fn prepare(&self) -> Result<()> {
        info!("pre-processing file to speed up future requests");
        let start = Instant::now();
        self.reader.prepare().await?;
        info!("pre-processed file in {:?}", start.elapsed());
        Ok(())
    }

    /// Retrieve line `line_index` of the served file, starting at 0.
    pub async fn get_line(&self, line_index: usize) -> std::result::Result<String, ServiceError> {
        info!("retrieving line {} from served file", line_index);

        self.reader.read_line(line_index).await.map_err(|err| {
            match err {
                Error::LineIndexOutOfRange { .. } => warn!("{}", err),
                _ => error!("failed to read line {}: {}", line_index, err),
            }
            ServiceError::from(&err)
        })
    }
}
