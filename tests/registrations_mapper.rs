// SPDX-FileCopyrightText: 2024 Fondazione LINKS
//
// SPDX-License-Identifier: GPL-3.0-or-later

mod common;

use acme_sa::acme::jose::{Jwk, KeyDigest};
use identity_iota::verification::jwu::encode_b64;
use acme_sa::acme::objects::Registration;
use acme_sa::errors::SaError;
use acme_sa::repository::registrations_mapper::{model_to_registration, registration_to_model};
use proptest::prelude::*;
use serde_json::json;

use common::*;

#[test]
fn row_carries_key_fingerprint() {
    let model = registration_to_model(&registration()).unwrap();
    assert_eq!(model.id, 42);
    assert_eq!(model.jwk_sha256, RFC7638_THUMBPRINT);
    assert_eq!(model.agreement, "https://example.com/terms/v1");
    assert_eq!(model.contact, Some(registration().contact));

    let stored: serde_json::Value = serde_json::from_slice(&model.jwk).unwrap();
    assert_eq!(stored["kty"], "RSA");
    assert_eq!(stored["n"], RFC7638_N);
    assert_eq!(stored["e"], "AQAB");
}

#[test]
fn registration_round_trips() {
    let original = registration();
    let restored = model_to_registration(registration_to_model(&original).unwrap()).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn empty_contact_list_is_kept() {
    let original = Registration {
        contact: Vec::new(),
        ..registration()
    };
    let model = registration_to_model(&original).unwrap();
    assert_eq!(model.contact, Some(Vec::new()));
    assert!(model_to_registration(model).unwrap().contact.is_empty());
}

#[test]
fn null_contact_column_reads_as_empty_list() {
    let mut model = registration_to_model(&registration()).unwrap();
    model.contact = None;
    let restored = model_to_registration(model).unwrap();
    assert!(restored.contact.is_empty());
    assert_eq!(restored.key, registration().key);

    assert_eq!(registration_to_model(&restored).unwrap().contact, Some(Vec::new()));
}

#[test]
fn contact_order_is_kept() {
    let original = Registration {
        contact: vec![url("tel:+15555550100"), url("mailto:b@example.com"), url("mailto:a@example.com")],
        ..registration()
    };
    let restored = model_to_registration(registration_to_model(&original).unwrap()).unwrap();
    assert_eq!(restored.contact, original.contact);
}

#[test]
fn key_without_digest_is_rejected() {
    let original = Registration {
        key: jwk(json!({ "kty": "oct", "k": encode_b64([1u8; 32]) })),
        ..registration()
    };
    assert!(matches!(
        registration_to_model(&original),
        Err(SaError::DigestError(_))
    ));
}

#[test]
fn corrupted_key_fails_to_decode() {
    let mut model = registration_to_model(&registration()).unwrap();
    model.jwk.truncate(model.jwk.len() / 2);

    match model_to_registration(model) {
        Err(SaError::DecodingError { context, .. }) => {
            assert_eq!(context, "unable to unmarshal public key")
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn key_with_unknown_type_fails_to_decode() {
    let mut model = registration_to_model(&registration()).unwrap();
    model.jwk = br#"{"kty":"DSA","p":"AQAB"}"#.to_vec();
    let err = model_to_registration(model).unwrap_err();
    assert!(err.is_data_integrity());
    assert!(err.to_string().starts_with("unable to unmarshal public key"));
}

#[test]
fn stale_fingerprint_is_not_checked_on_read() {
    let mut model = registration_to_model(&registration()).unwrap();
    model.jwk_sha256 = "stale".to_owned();
    assert_eq!(model_to_registration(model).unwrap(), registration());
}

proptest! {
    #[test]
    fn any_registration_round_trips(
        id in 1i64..i64::MAX,
        key in arb_jwk(),
        contact in prop::collection::vec(arb_url(), 0..5),
        agreement in "https://example\\.com/terms/v[0-9]{1,3}",
    ) {
        let original = Registration { id, key, contact, agreement };
        let restored = model_to_registration(registration_to_model(&original).unwrap()).unwrap();
        prop_assert_eq!(restored, original);
    }

    #[test]
    fn stored_fingerprint_matches_stored_key(key in arb_jwk()) {
        let original = Registration { key, ..registration() };
        let model = registration_to_model(&original).unwrap();
        let decoded: Jwk = serde_json::from_slice(&model.jwk).unwrap();
        prop_assert_eq!(model.jwk_sha256, decoded.key_digest().unwrap());
    }
}
