use crate::error::KeyError;
use ed25519_dalek::SigningKey;
use stellar_strkey::ed25519::{PrivateKey, PublicKey};

/// A fee-paying or source signing credential, parsed from a strkey secret seed.
///
/// The seed never appears in `Debug` output or log lines; only the public key
/// is printable.
#[derive(Clone)]
pub struct Keypair {
    public: String,
    signing: SigningKey,
}

impl Keypair {
    /// Parses an `S...` strkey secret seed and derives its public key.
    pub fn from_secret(secret: &str) -> Result<Self, KeyError> {
        let seed = PrivateKey::from_string(secret).map_err(|_| KeyError::MalformedSecret)?;
        let signing = SigningKey::from_bytes(&seed.0);
        let public = PublicKey(signing.verifying_key().to_bytes()).to_string();
        Ok(Self { public, signing })
    }

    /// The `G...` strkey public key.
    pub fn public_key(&self) -> &str {
        &self.public
    }

    /// Key material for the signing collaborator.
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing
    }

    /// Whether `key` is a well-formed `G...` ed25519 public key strkey.
    pub fn is_valid_public_key(key: &str) -> bool {
        PublicKey::from_string(key).is_ok()
    }
}

impl PartialEq for Keypair {
    fn eq(&self, other: &Self) -> bool {
        self.public == other.public
    }
}

impl Eq for Keypair {}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Keypair").field(&self.public).finish()
    }
}
