// SPDX-FileCopyrightText: 2024 Fondazione LINKS
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Account keys and signed objects, the two cryptographic shapes the storage
//! layer has to persist. Only encoding and fingerprinting live here; signature
//! verification belongs to the web front end.

use identity_iota::verification::jwu::{decode_b64, decode_b64_json, encode_b64, encode_b64_json};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use identity_iota::verification::jwk::{Jwk, JwkParams};
pub use identity_iota::verification::jws::{JwsAlgorithm, JwsHeader};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(thiserror::Error, Debug)]
pub enum JoseError {
    #[error("unsupported key type for digest: {0}")]
    UnsupportedKeyType(&'static str),
    #[error("algorithm {0:?} cannot be verified")]
    UnverifiableAlgorithm(String),
    #[error("malformed signed object: {0}")]
    Malformed(&'static str),
    #[error("invalid base64url encoding of {field}")]
    Encoding {
        field: &'static str,
        #[source]
        source: BoxError,
    },
    #[error("invalid JSON in {field}")]
    Json {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Fingerprint of a public key, stored next to the key so accounts can be
/// looked up by key.
pub trait KeyDigest {
    fn key_digest(&self) -> Result<String, JoseError>;
}

/// Signed proof artifacts as persisted by the storage layer.
pub trait SignedObject: Sized {
    /// Parses either the compact or one of the JSON serializations.
    fn parse_signed(input: &[u8]) -> Result<Self, JoseError>;
    /// Serializes to the JSON form, which unlike the compact form keeps
    /// unprotected headers and multiple signatures.
    fn full_serialize(&self) -> Result<String, serde_json::Error>;
}

impl KeyDigest for Jwk {
    /// RFC 7638 SHA-256 thumbprint, base64url without padding.
    fn key_digest(&self) -> Result<String, JoseError> {
        match self.params() {
            // Symmetric keys are never account keys.
            JwkParams::Oct(_) => Err(JoseError::UnsupportedKeyType("oct")),
            _ => Ok(self.thumbprint_sha256_b64()),
        }
    }
}

fn encoding_error<E>(field: &'static str) -> impl FnOnce(E) -> JoseError
where
    E: std::error::Error + Send + Sync + 'static,
{
    move |source| JoseError::Encoding {
        field,
        source: source.into(),
    }
}

/// One signature of a JWS. The JOSE header is the union of the protected and
/// the unprotected header (RFC 7515 section 7.2.1).
#[derive(Clone, Debug, PartialEq)]
pub struct Signature {
    // Encoded form is kept as received: it is part of the signing input.
    protected: Option<String>,
    unprotected: Option<Map<String, Value>>,
    header: JwsHeader,
    signature: Vec<u8>,
}

impl Signature {
    /// Signature whose whole header is integrity protected.
    pub fn new(header: JwsHeader, signature: Vec<u8>) -> Result<Self, JoseError> {
        let protected = encode_b64_json(&header).map_err(encoding_error("protected"))?;
        Self::assemble(Some(protected), None, signature)
    }

    /// Signature carrying its header only in the unprotected member.
    pub fn new_unprotected(header: JwsHeader, signature: Vec<u8>) -> Result<Self, JoseError> {
        let members = match serde_json::to_value(&header) {
            Ok(Value::Object(members)) => members,
            Ok(_) => return Err(JoseError::Malformed("header is not a JSON object")),
            Err(source) => return Err(JoseError::Json { field: "header", source }),
        };
        Self::assemble(None, Some(members), signature)
    }

    pub fn with_unprotected(self, unprotected: Map<String, Value>) -> Result<Self, JoseError> {
        Self::assemble(self.protected, Some(unprotected), self.signature)
    }

    pub fn protected(&self) -> Option<&str> {
        self.protected.as_deref()
    }

    /// Effective JOSE header, protected and unprotected members merged.
    pub fn header(&self) -> &JwsHeader {
        &self.header
    }

    pub fn unprotected(&self) -> Option<&Map<String, Value>> {
        self.unprotected.as_ref()
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    fn assemble(
        protected: Option<String>,
        unprotected: Option<Map<String, Value>>,
        signature: Vec<u8>,
    ) -> Result<Self, JoseError> {
        let mut members: Map<String, Value> = match &protected {
            Some(encoded) => decode_b64_json(encoded).map_err(encoding_error("protected"))?,
            None => Map::new(),
        };
        for (name, value) in unprotected.iter().flatten() {
            if members.insert(name.clone(), value.clone()).is_some() {
                return Err(JoseError::Malformed("protected and unprotected headers share a parameter"));
            }
        }
        if members.is_empty() {
            return Err(JoseError::Malformed("missing JOSE header"));
        }
        let header: JwsHeader = serde_json::from_value(Value::Object(members))
            .map_err(|source| JoseError::Json { field: "header", source })?;
        check_algorithm(&header)?;

        Ok(Self {
            protected,
            unprotected,
            header,
            signature,
        })
    }

    fn decode(raw: RawSignature) -> Result<Self, JoseError> {
        let signature = decode_b64(&raw.signature).map_err(encoding_error("signature"))?;
        Self::assemble(raw.protected, raw.header, signature)
    }

    fn encode(&self) -> RawSignature {
        RawSignature {
            protected: self.protected.clone(),
            header: self.unprotected.clone(),
            signature: encode_b64(&self.signature),
        }
    }
}

fn check_algorithm(header: &JwsHeader) -> Result<(), JoseError> {
    match header.alg() {
        None => Err(JoseError::UnverifiableAlgorithm(String::new())),
        Some(JwsAlgorithm::NONE) => Err(JoseError::UnverifiableAlgorithm("none".to_owned())),
        Some(_) => Ok(()),
    }
}

/// JSON Web Signature (RFC 7515) with one or more signatures over a payload.
#[derive(Clone, Debug, PartialEq)]
pub struct JsonWebSignature {
    payload: Vec<u8>,
    signatures: Vec<Signature>,
}

impl JsonWebSignature {
    pub fn new(payload: Vec<u8>, signatures: Vec<Signature>) -> Result<Self, JoseError> {
        if signatures.is_empty() {
            return Err(JoseError::Malformed("no signatures"));
        }
        Ok(Self {
            payload,
            signatures,
        })
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// Compact form `protected.payload.signature`. Only a single signature
    /// with a protected header and no unprotected header fits in it.
    pub fn compact_serialize(&self) -> Result<String, JoseError> {
        match self.signatures.as_slice() {
            [Signature {
                protected: Some(protected),
                unprotected: None,
                signature,
                ..
            }] => Ok(format!(
                "{}.{}.{}",
                protected,
                encode_b64(&self.payload),
                encode_b64(signature)
            )),
            _ => Err(JoseError::Malformed(
                "compact form requires exactly one signature with only a protected header",
            )),
        }
    }

    fn parse_compact(input: &str) -> Result<Self, JoseError> {
        let parts: Vec<&str> = input.split('.').collect();
        let [protected, payload, signature] = parts.as_slice() else {
            return Err(JoseError::Malformed("compact form must have three parts"));
        };
        let signature = Signature::decode(RawSignature {
            protected: Some((*protected).to_owned()),
            header: None,
            signature: (*signature).to_owned(),
        })?;
        let payload = decode_b64(payload).map_err(encoding_error("payload"))?;
        Self::new(payload, vec![signature])
    }

    fn parse_json(input: &str) -> Result<Self, JoseError> {
        let raw: RawJsonWebSignature =
            serde_json::from_str(input).map_err(|source| JoseError::Json {
                field: "envelope",
                source,
            })?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawJsonWebSignature) -> Result<Self, JoseError> {
        let flattened = raw.protected.is_some() || raw.header.is_some() || raw.signature.is_some();
        let raw_signatures = match (flattened, raw.signatures.is_empty()) {
            (true, true) => vec![RawSignature {
                protected: raw.protected,
                header: raw.header,
                signature: raw
                    .signature
                    .ok_or(JoseError::Malformed("missing signature"))?,
            }],
            (false, false) => raw.signatures,
            (true, false) => {
                return Err(JoseError::Malformed(
                    "mixed flattened and general serialization",
                ))
            }
            (false, true) => return Err(JoseError::Malformed("no signatures")),
        };
        let signatures = raw_signatures
            .into_iter()
            .map(Signature::decode)
            .collect::<Result<Vec<_>, _>>()?;
        let payload = decode_b64(&raw.payload).map_err(encoding_error("payload"))?;
        Self::new(payload, signatures)
    }

    fn to_raw(&self) -> RawJsonWebSignature {
        let payload = encode_b64(&self.payload);
        match self.signatures.as_slice() {
            [single] => {
                let signature = single.encode();
                RawJsonWebSignature {
                    payload,
                    protected: signature.protected,
                    header: signature.header,
                    signature: Some(signature.signature),
                    signatures: Vec::new(),
                }
            }
            many => RawJsonWebSignature {
                payload,
                protected: None,
                header: None,
                signature: None,
                signatures: many.iter().map(Signature::encode).collect(),
            },
        }
    }
}

impl SignedObject for JsonWebSignature {
    fn parse_signed(input: &[u8]) -> Result<Self, JoseError> {
        let text = std::str::from_utf8(input)
            .map_err(|_| JoseError::Malformed("signed object is not valid UTF-8"))?
            .trim();
        if text.starts_with('{') {
            Self::parse_json(text)
        } else {
            Self::parse_compact(text)
        }
    }

    fn full_serialize(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_raw())
    }
}

impl Serialize for JsonWebSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_raw().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for JsonWebSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawJsonWebSignature::deserialize(deserializer)?;
        Self::from_raw(raw).map_err(de::Error::custom)
    }
}

// JSON serialization envelopes of RFC 7515 section 7.2. `identity_iota`
// decodes compact and flattened tokens for verification only, and has no
// general form nor a way to re-emit a received object unchanged.
#[derive(Serialize, Deserialize)]
struct RawSignature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    protected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    header: Option<Map<String, Value>>,
    signature: String,
}

#[derive(Serialize, Deserialize)]
struct RawJsonWebSignature {
    payload: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    protected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    header: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signature: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    signatures: Vec<RawSignature>,
}
