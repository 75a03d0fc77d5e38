// SPDX-FileCopyrightText: 2024 Fondazione LINKS
//
// SPDX-License-Identifier: GPL-3.0-or-later

#![allow(dead_code)]

use acme_sa::acme::jose::{JsonWebSignature, JwsHeader, Jwk, Signature};
use acme_sa::acme::objects::{AcmeStatus, AcmeUrl, Challenge, Registration};
use chrono::{DateTime, Utc};
use identity_iota::verification::jwu::encode_b64;
use proptest::prelude::*;
use serde_json::{json, Value};

/// RSA key from RFC 7638 section 3.1.
pub const RFC7638_N: &str = "0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4cbbfAAtVT86zwu1RK7aPFFxuhDR1L6tSoc_BJECPebWKRXjBZCiFV4n3oknjhMstn64tZ_2W-5JsGY4Hc5n9yBXArwl93lqt7_RN5w6Cf0h4QyQ5v-65YGjQR0_FDW2QvzqY368QQMicAtaSqzs8KJZgnYb9c7d0zgdAZHzu6qMQvRL5hajrn1n91CbOpbISD08qNLyrdkt-bFTWhAI4vMQFh6WeZu0fM4lFd2NcRwr3XPksINHaQ-G_xBniIqbw0Ls1jF44-csFCur-kEgU8awapJzKnqDKgw";
pub const RFC7638_THUMBPRINT: &str = "NzbLsXh8uDCcd-6MNwXF4W_7noWXFZAfHkxZsRGC9Xs";

pub fn jwk(value: Value) -> Jwk {
    serde_json::from_value(value).unwrap()
}

pub fn rfc7638_key() -> Jwk {
    jwk(json!({ "kty": "RSA", "n": RFC7638_N, "e": "AQAB" }))
}

pub fn ec_key() -> Jwk {
    jwk(json!({
        "kty": "EC",
        "crv": "P-256",
        "x": encode_b64([7u8; 32]),
        "y": encode_b64([9u8; 32]),
    }))
}

pub fn header(value: Value) -> JwsHeader {
    serde_json::from_value(value).unwrap()
}

pub fn url(input: &str) -> AcmeUrl {
    AcmeUrl::parse(input).unwrap()
}

pub fn registration() -> Registration {
    Registration {
        id: 42,
        key: rfc7638_key(),
        contact: vec![url("mailto:admin@example.com"), url("tel:+15555550100")],
        agreement: "https://example.com/terms/v1".to_owned(),
    }
}

pub fn signature(nonce: &str) -> Signature {
    let protected = header(json!({ "alg": "RS256", "jwk": rfc7638_key(), "nonce": nonce }));
    Signature::new(protected, vec![0xab; 256]).unwrap()
}

pub fn validation() -> JsonWebSignature {
    let payload = br#"{"type":"http-01","keyAuthorization":"token.thumbprint"}"#.to_vec();
    JsonWebSignature::new(payload, vec![signature("nonce-1")]).unwrap()
}

pub fn challenge() -> Challenge {
    Challenge {
        id: 7,
        challenge_type: "http-01".to_owned(),
        status: AcmeStatus::Pending,
        validated: None,
        uri: Some(url("https://ca.example.com/acme/challenge/abc/7")),
        token: "evaGxfADs6pSRb2LAv9IZf17Dt3juxGJ-PCt92wr-oA".to_owned(),
        tls: Some(false),
        validation: None,
        error: None,
    }
}

/// Random bytes in their base64url text form, as JWK members carry them.
pub fn arb_b64(len: std::ops::Range<usize>) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<u8>(), len).prop_map(|bytes| encode_b64(bytes))
}

pub fn arb_jwk() -> impl Strategy<Value = Jwk> {
    prop_oneof![
        (arb_b64(1..300), arb_b64(1..4)).prop_map(|(n, e)| jwk(json!({ "kty": "RSA", "n": n, "e": e }))),
        (
            prop::sample::select(vec!["P-256", "P-384", "P-521"]),
            arb_b64(32..67),
            arb_b64(32..67)
        )
            .prop_map(|(crv, x, y)| jwk(json!({ "kty": "EC", "crv": crv, "x": x, "y": y }))),
        arb_b64(32..33).prop_map(|x| jwk(json!({ "kty": "OKP", "crv": "Ed25519", "x": x }))),
    ]
}

pub fn arb_url() -> impl Strategy<Value = AcmeUrl> {
    prop_oneof![
        "[a-z0-9]{1,20}".prop_map(|user| url(&format!("mailto:{user}@example.com"))),
        "[a-z0-9/]{0,200}".prop_map(|path| url(&format!("https://ca.example.com/{path}"))),
    ]
}

pub fn arb_status() -> impl Strategy<Value = AcmeStatus> {
    prop::sample::select(vec![
        AcmeStatus::Unknown,
        AcmeStatus::Pending,
        AcmeStatus::Processing,
        AcmeStatus::Valid,
        AcmeStatus::Invalid,
        AcmeStatus::Revoked,
    ])
}

pub fn arb_timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_102_444_800, 0u32..1_000_000_000)
        .prop_filter_map("valid timestamp", |(secs, nanos)| {
            DateTime::<Utc>::from_timestamp(secs, nanos)
        })
}

pub fn arb_validation() -> impl Strategy<Value = JsonWebSignature> {
    (
        prop::collection::vec(any::<u8>(), 0..2048),
        prop::collection::vec(("[A-Za-z0-9_-]{1,32}", prop::collection::vec(any::<u8>(), 1..512)), 1..4),
    )
        .prop_map(|(payload, signatures)| {
            let signatures = signatures
                .into_iter()
                .map(|(nonce, bytes)| {
                    Signature::new(header(json!({ "alg": "ES256", "nonce": nonce })), bytes).unwrap()
                })
                .collect();
            JsonWebSignature::new(payload, signatures).unwrap()
        })
}
