use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FireError {
    #[error("Dataset file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid value {value:?} in column '{column}' at row {row}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset has no records")]
    EmptyDataset,

    #[error("Unknown month code: {0:?}")]
    UnknownMonth(String),

    #[error("Unknown reference key: {0:?}")]
    UnknownKey(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl FireError {
    /// True for every failure raised while reading or validating the input file.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound(_)
                | Self::MissingColumn(_)
                | Self::InvalidValue { .. }
                | Self::Polars(_)
                | Self::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FireError>;

#[cfg(feature = "python")]
pub(crate) mod py {
    use pyo3::create_exception;
    use pyo3::exceptions::{PyException, PyValueError};
    use pyo3::PyErr;

    use super::FireError;

    create_exception!(_core, LoadError, PyException);
    create_exception!(_core, EmptyDatasetError, PyException);
    create_exception!(_core, UnknownMonthError, PyException);
    create_exception!(_core, UnknownKeyError, PyException);

    impl From<FireError> for PyErr {
        fn from(err: FireError) -> PyErr {
            let msg = err.to_string();
            match err {
                e if e.is_load_error() => LoadError::new_err(msg),
                FireError::EmptyDataset => EmptyDatasetError::new_err(msg),
                FireError::UnknownMonth(_) => UnknownMonthError::new_err(msg),
                FireError::UnknownKey(_) => UnknownKeyError::new_err(msg),
                _ => PyValueError::new_err(msg),
            }
        }
    }
}
