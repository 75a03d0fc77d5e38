// SPDX-FileCopyrightText: 2024 Fondazione LINKS
//
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::acme::jose::{JsonWebSignature, SignedObject};
use crate::acme::objects::{Challenge, ProblemDetails};
use crate::errors::SaError;

use super::models::{ChallengeModel, MAX_URI_LENGTH, MAX_VALIDATION_BYTES};

const PROBLEM_DETAILS_CONTEXT: &str = "unable to unmarshal problem details";

/// Builds the stored form of a challenge belonging to `authorization_id`.
///
/// Oversized values are rejected, never truncated: a validation whose full
/// serialization exceeds [`MAX_VALIDATION_BYTES`] or a URI longer than
/// [`MAX_URI_LENGTH`] characters fails with `LimitExceededError`.
pub fn challenge_to_model(
    challenge: &Challenge,
    authorization_id: &str,
) -> Result<ChallengeModel, SaError> {
    let validation = match &challenge.validation {
        Some(jws) => {
            let serialized = jws.full_serialize().map_err(SaError::EncodingError)?;
            if serialized.len() > MAX_VALIDATION_BYTES {
                log::warn!(
                    "challenge {} of authorization {}: validation object is too large ({} bytes)",
                    challenge.id,
                    authorization_id,
                    serialized.len()
                );
                return Err(SaError::LimitExceededError {
                    field: "validation",
                    limit: MAX_VALIDATION_BYTES,
                    actual: serialized.len(),
                });
            }
            Some(serialized.into_bytes())
        }
        None => None,
    };

    let error = match &challenge.error {
        Some(problem) => Some(serde_json::to_vec(problem).map_err(SaError::EncodingError)?),
        None => None,
    };

    if let Some(uri) = &challenge.uri {
        let length = uri.as_str().chars().count();
        if length > MAX_URI_LENGTH {
            log::warn!(
                "challenge {} of authorization {}: URI is too long ({} characters)",
                challenge.id,
                authorization_id,
                length
            );
            return Err(SaError::LimitExceededError {
                field: "uri",
                limit: MAX_URI_LENGTH,
                actual: length,
            });
        }
    }

    log::debug!(
        "challenge {} of authorization {} mapped to row",
        challenge.id,
        authorization_id
    );
    Ok(ChallengeModel {
        id: challenge.id,
        authorization_id: authorization_id.to_owned(),
        challenge_type: challenge.challenge_type.clone(),
        status: challenge.status,
        error,
        validated: challenge.validated,
        uri: challenge.uri.clone(),
        token: challenge.token.clone(),
        tls: challenge.tls,
        validation,
    })
}

/// Rebuilds a challenge from its row.
///
/// `error` always comes back as `Some`: rows without error bytes yield
/// `ProblemDetails::default()`, which is what readers of the existing
/// `challenges` table expect.
pub fn model_to_challenge(model: ChallengeModel) -> Result<Challenge, SaError> {
    let validation = match model.validation.as_deref() {
        Some(bytes) if !bytes.is_empty() => {
            Some(JsonWebSignature::parse_signed(bytes).map_err(SaError::ParseError)?)
        }
        _ => None,
    };

    let problem = match model.error.as_deref() {
        Some(bytes) if !bytes.is_empty() => {
            serde_json::from_slice(bytes).map_err(|source| SaError::DecodingError {
                context: PROBLEM_DETAILS_CONTEXT,
                source,
            })?
        }
        _ => ProblemDetails::default(),
    };

    Ok(Challenge {
        id: model.id,
        challenge_type: model.challenge_type,
        status: model.status,
        validated: model.validated,
        uri: model.uri,
        token: model.token,
        tls: model.tls,
        validation,
        error: Some(problem),
    })
}
