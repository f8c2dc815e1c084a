use crate::engine::catalog::CatalogParseError;
use self::pest::WrappedPestError;
use std::env::VarError;
use std::fmt::{Display, Formatter};
use std::num::ParseIntError;
use thiserror::Error;

mod pest;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl<E> From<E> for Error
where
    ErrorKind: From<E>,
{
    fn from(value: E) -> Self {
        Error(Box::new(value.into()))
    }
}

#[derive(Debug, Error)]
#[allow(clippy::enum_variant_names)]
pub enum ErrorKind {
    /// Builder scripts that do not follow the grammar
    #[error("Invalid syntax, failed to parse:\n{0}")]
    SyntaxError(#[from] WrappedPestError),
    #[error("Number out of range:\n{0}")]
    InvalidNumber(#[from] ParseIntError),
    #[error("Internal error:\n{0}")]
    InternalError(#[from] InternalError),
    #[error("Error parsing catalog:\n{0}")]
    CatalogParseError(#[from] CatalogParseError),
    #[error("Could not find environment variable: \n{0}")]
    EnvVarError(#[from] VarError),
    #[error("IO error:\n{0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error:\n{0}")]
    JsonError(#[from] serde_json::Error),
}

pub type PestError = ::pest::error::Error<crate::engine::syntax::Rule>;

#[derive(Error, Debug)]
pub struct InternalError(pub String);

impl Display for InternalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    pub fn into_inner(self) -> ErrorKind {
        *self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_convert_through_their_kind() {
        let error: Error = "abc".parse::<u64>().unwrap_err().into();

        assert!(matches!(error.kind(), ErrorKind::InvalidNumber(_)));
        assert!(error.to_string().starts_with("Number out of range:\n"));

        let error: Error = InternalError("oops".to_string()).into();
        assert!(matches!(error.into_inner(), ErrorKind::InternalError(_)));
    }
}
