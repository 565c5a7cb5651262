use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The side a signatory takes in a bilateral contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignatoryRole {
    Client,
    Contractor,
}

impl SignatoryRole {
    /// Roles that must each sign once before a contract counts as signed.
    pub const REQUIRED: [SignatoryRole; 2] = [SignatoryRole::Client, SignatoryRole::Contractor];

    pub fn as_str(self) -> &'static str {
        match self {
            SignatoryRole::Client => "CLIENT",
            SignatoryRole::Contractor => "CONTRACTOR",
        }
    }
}

impl fmt::Display for SignatoryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatoryRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CLIENT" => Ok(SignatoryRole::Client),
            "CONTRACTOR" => Ok(SignatoryRole::Contractor),
            other => Err(format!("unknown signatory role '{}'", other)),
        }
    }
}

/// A contracting party. Immutable once part of a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Signatory {
    /// Name of the legal entity.
    pub business_name: String,
    /// Registered headquarters address.
    #[serde(rename = "HeadQuarters")]
    pub headquarters: String,
    /// Legal representative.
    pub holder: String,
    /// Business-registry identifier (e.g. a SIREN/SIRET number).
    pub registration_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<SignatoryRole>,
}

impl Signatory {
    pub fn new(
        business_name: impl Into<String>,
        headquarters: impl Into<String>,
        holder: impl Into<String>,
        registration_number: impl Into<String>,
        role: Option<SignatoryRole>,
    ) -> Self {
        Signatory {
            business_name: business_name.into(),
            headquarters: headquarters.into(),
            holder: holder.into(),
            registration_number: registration_number.into(),
            role,
        }
    }

    /// Digest standing in for this signatory's signature.
    pub fn digest(&self) -> String {
        signature_digest(&self.registration_number)
    }
}

/// Lowercase hex SHA-256 of a registration number.
///
/// This is a placeholder for a real signing mechanism: anyone who knows
/// the registration number can produce it.
pub fn signature_digest(registration_number: &str) -> String {
    let hash = Sha256::digest(registration_number.as_bytes());
    format!("{:x}", hash)
}
