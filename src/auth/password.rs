//! Password hashing and verification

use crate::error::Result;

/// Hash a plaintext password with bcrypt at the default cost.
///
/// The digest is self-describing: algorithm, salt and cost are embedded,
/// so verification needs no external parameter storage.
pub fn hash_password(plain: &str) -> Result<String> {
    Ok(bcrypt::hash(plain, bcrypt::DEFAULT_COST)?)
}

/// Verify a plaintext password against a stored digest.
///
/// Returns false for a mismatch and for a malformed digest. Never errors:
/// a digest this system did not produce is just a failed login.
pub fn verify_password(plain: &str, digest: &str) -> bool {
    bcrypt::verify(plain, digest).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let digest = hash_password("s3cret").expect("hashing failed");
        assert!(verify_password("s3cret", &digest));
        assert!(!verify_password("wrong", &digest));
    }

    #[test]
    fn test_verify_malformed_digest_is_false() {
        assert!(!verify_password("anything", "not-a-bcrypt-digest"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn test_same_password_different_digests() {
        let a = hash_password("s3cret").unwrap();
        let b = hash_password("s3cret").unwrap();
        // Fresh salt per digest
        assert_ne!(a, b);
        assert!(verify_password("s3cret", &a));
        assert!(verify_password("s3cret", &b));
    }
}
