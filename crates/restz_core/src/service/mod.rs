//! Use-case services over the repositories.
//!
//! # Responsibility
//! - Translate DTO input into entity mutations and read results back.
//! - Turn repository absence into an explicit `ServiceError::NotFound`.

use crate::repo::{RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod product_service;
pub mod review_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for product/review use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Target record does not exist.
    NotFound { table: &'static str, id: i64 },
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { table, id } => write!(f, "row {id} not found in {table}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { table, id } => Self::NotFound { table, id },
            other => Self::Repo(other),
        }
    }
}

/// Converts a read-back miss right after a write into `InconsistentState`.
fn read_back<T>(result: RepoResult<Option<T>>, details: &'static str) -> ServiceResult<T> {
    result?.ok_or(ServiceError::InconsistentState(details))
}
