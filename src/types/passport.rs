//! Telegram Passport data, trimmed to the outer envelope shape. Per §1,
//! cryptographic validation of passport/WebApp payloads is out of scope;
//! here we only need enough structure for a `Message` to carry and for the
//! classifier in §4.6 to detect a "passport" message.

use serde::{Deserialize, Serialize};

/// One encrypted element the user shared (a document, an address, ...).
/// The teacher's per-document-kind schema (`PersonalDetails`, `Passport`,
/// `DriverLicense`, ...) is not reproduced here — only the hash every kind
/// shares, which is all the classifier and any round-trip test need.
///
/// [The official docs](https://core.telegram.org/bots/api#encryptedpassportelement).
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct EncryptedPassportElement {
    #[serde(rename = "type")]
    pub kind: String,
    pub hash: String,
    pub data: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

/// One error Telegram Passport raised about a submitted element.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct EncryptedCredentials {
    pub data: String,
    pub hash: String,
    pub secret: String,
}

/// Contains information about documents or other Telegram Passport elements
/// shared with the bot by the user.
///
/// [The official docs](https://core.telegram.org/bots/api#passportdata).
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct PassportData {
    pub data: Vec<EncryptedPassportElement>,
    pub credentials: EncryptedCredentials,
}
