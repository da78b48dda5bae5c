use std::path::PathBuf;

use crate::prelude::StageError;

/// Errors raised while reading or writing corpus artifacts.
#[derive(thiserror::Error, Debug)]
pub enum CorpusError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("json error on {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error("missing column `{column}` in {path}")]
    MissingColumn { path: PathBuf, column: String },
    #[error("token `{0}` is not in the dictionary")]
    UnknownToken(String),
    #[error("year {0} precedes the first modern Congress session")]
    YearOutOfRange(i32),
    #[error("row count mismatch for {context}: expected {expected}, found {found}")]
    RowMismatch {
        context: String,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Stage(#[from] StageError),
}

pub type CorpusResult<T> = Result<T, CorpusError>;

impl CorpusError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
