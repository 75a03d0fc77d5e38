// SPDX-FileCopyrightText: 2024 Fondazione LINKS
//
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::acme::jose::{Jwk, KeyDigest};
use crate::acme::objects::Registration;
use crate::errors::SaError;

use super::models::RegistrationModel;

const PUBLIC_KEY_CONTEXT: &str = "unable to unmarshal public key";

/// Builds the stored form of a registration, fingerprinting its key.
pub fn registration_to_model(registration: &Registration) -> Result<RegistrationModel, SaError> {
    let jwk = serde_json::to_vec(&registration.key).map_err(SaError::EncodingError)?;
    let jwk_sha256 = registration.key.key_digest().map_err(SaError::DigestError)?;

    log::debug!(
        "registration {} mapped to row ({:?} key, {} contacts)",
        registration.id,
        registration.key.kty(),
        registration.contact.len()
    );
    Ok(RegistrationModel {
        id: registration.id,
        jwk,
        jwk_sha256,
        contact: Some(registration.contact.clone()),
        agreement: registration.agreement.clone(),
    })
}

/// Rebuilds a registration from its row. The serialized key is
/// authoritative: `jwk_sha256` is not checked. A NULL contact column reads as
/// an empty list.
pub fn model_to_registration(model: RegistrationModel) -> Result<Registration, SaError> {
    let key: Jwk = serde_json::from_slice(&model.jwk).map_err(|source| {
        log::warn!("registration {} holds an unreadable key", model.id);
        SaError::DecodingError {
            context: PUBLIC_KEY_CONTEXT,
            source,
        }
    })?;

    Ok(Registration {
        id: model.id,
        key,
        contact: model.contact.unwrap_or_default(),
        agreement: model.agreement,
    })
}
