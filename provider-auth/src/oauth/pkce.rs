//! PKCE (Proof Key for Code Exchange) support for OAuth 2.0.
//!
//! Implements RFC 7636 for securing authorization code flows in public clients.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

/// PKCE code verifier (random string).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkceVerifier(String);

impl PkceVerifier {
    /// Generate a new random PKCE verifier.
    ///
    /// 32 bytes from the operating system CSPRNG, base64url encoded without padding,
    /// giving a 43 character verifier.
    pub fn generate() -> Self {
        let mut random_bytes = [0u8; 32];
        OsRng.fill_bytes(&mut random_bytes);
        Self(URL_SAFE_NO_PAD.encode(random_bytes))
    }

    /// Create a PKCE verifier from an existing string.
    pub fn from_string(verifier: String) -> Self {
        Self(verifier)
    }

    /// Get the verifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Generate the corresponding code challenge.
    pub fn challenge(&self) -> PkceChallenge {
        PkceChallenge::from_verifier(self)
    }
}

/// PKCE code challenge (SHA256 hash of verifier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkceChallenge(String);

impl PkceChallenge {
    /// The only challenge method this crate produces.
    pub const METHOD: &'static str = "S256";

    /// Create a code challenge from a verifier.
    ///
    /// Uses SHA256 hashing and base64url encoding as per RFC 7636.
    pub fn from_verifier(verifier: &PkceVerifier) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(verifier.as_str().as_bytes());
        let hash = hasher.finalize();
        let challenge = URL_SAFE_NO_PAD.encode(hash);
        Self(challenge)
    }

    /// Get the challenge string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A freshly generated verifier together with its challenge.
#[derive(Debug, Clone)]
pub struct PkcePair {
    pub verifier: PkceVerifier,
    pub challenge: PkceChallenge,
}

impl PkcePair {
    pub fn generate() -> Self {
        let verifier = PkceVerifier::generate();
        let challenge = verifier.challenge();
        Self {
            verifier,
            challenge,
        }
    }
}
