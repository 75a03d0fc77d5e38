// SPDX-FileCopyrightText: 2024 Fondazione LINKS
//
// SPDX-License-Identifier: GPL-3.0-or-later

use deadpool_postgres::PoolError;

use crate::acme::jose::JoseError;

#[derive(thiserror::Error, Debug)]
pub enum SaError {

    // Mapping Errors
    #[error("Encoding error: {0}")]
    EncodingError(#[source] serde_json::Error),
    #[error("{context}: {source}")]
    DecodingError {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Key digest error: {0}")]
    DigestError(#[source] JoseError),
    #[error("Signed object parse error: {0}")]
    ParseError(#[source] JoseError),
    #[error("{field} is too large to store in the database ({actual} > {limit})")]
    LimitExceededError {
        field: &'static str,
        limit: usize,
        actual: usize,
    },

    // Database Errors
    #[error("Row not found")]
    RowNotFound,
    #[error("tokio_postgres error")]
    TokioPostgresError(#[from] tokio_postgres::error::Error),
    #[error("tokio_pg_mapper error")]
    TokioPostgresMapperError(#[from] tokio_pg_mapper::Error),
    #[error("Pool error")]
    PoolError(#[from] PoolError),
}

impl SaError {
    /// Whether the stored or submitted data itself is at fault. Callers report
    /// these as "could not save/load resource" instead of retrying.
    pub fn is_data_integrity(&self) -> bool {
        match *self {
            SaError::EncodingError(_) => true,
            SaError::DecodingError { .. } => true,
            SaError::DigestError(_) => true,
            SaError::ParseError(_) => true,
            SaError::LimitExceededError { .. } => true,
            SaError::RowNotFound => false,
            SaError::TokioPostgresError(_) => false,
            SaError::TokioPostgresMapperError(_) => false,
            SaError::PoolError(_) => false,
        }
    }
}
