//! HMAC-SHA256 signing of bundle download URLs.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies `(file_path, expires)` pairs.
///
/// The token covers both the path and the expiry timestamp, so neither can
/// be changed without invalidating the signature.
pub struct UrlSigner {
    secret: Vec<u8>,
}

impl UrlSigner {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Produce the URL-safe base64 token for a path and expiry.
    pub fn sign(&self, file_path: &str, expires: i64) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
        mac.update(file_path.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }

    /// Check a presented token against the path and expiry, rejecting expired
    /// timestamps. Token comparison is constant-time.
    pub fn verify(&self, file_path: &str, expires: i64, token: &str, now: i64) -> bool {
        if expires < now {
            return false;
        }
        let expected = self.sign(file_path, expires);
        expected.as_bytes().ct_eq(token.as_bytes()).into()
    }
}
