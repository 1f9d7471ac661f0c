use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Operand {value} does not fit in {width}-bit signed integer")]
    OperandOutOfRange { value: i64, width: u32 },

    #[error("Worker error: {0}")]
    Worker(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn out_of_range(value: i64, width: u32) -> Self {
        Self::OperandOutOfRange { value, width }
    }

    pub fn worker(msg: impl Into<String>) -> Self {
        Self::Worker(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
