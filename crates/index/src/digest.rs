use crate::format::DIGEST_LEN;
use sha3::{Digest, Sha3_224};
use std::fmt;

/// SHA3-224 of a trigger. The sort and search key of the index.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BangDigest([u8; DIGEST_LEN]);

impl BangDigest {
    pub fn of(trigger: &str) -> Self {
        Self::of_bytes(trigger.as_bytes())
    }

    pub fn of_bytes(trigger: &[u8]) -> Self {
        let hash = Sha3_224::digest(trigger);
        let mut out = [0u8; DIGEST_LEN];
        out.copy_from_slice(&hash);
        Self(out)
    }

    pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let raw: [u8; DIGEST_LEN] = bytes.try_into().ok()?;
        Some(Self(raw))
    }

    pub const fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Debug for BangDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BangDigest({})", self.to_hex())
    }
}

impl fmt::Display for BangDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_sha3_224_vector() {
        // FIPS 202 test vector for the empty message.
        assert_eq!(
            BangDigest::of("").to_hex(),
            "6b4e03423667dbb73b6e15454f0eb1abd4597f9a1b078e3f5b5a6bc7"
        );
    }

    #[test]
    fn digest_is_deterministic_and_case_sensitive() {
        assert_eq!(BangDigest::of("gh"), BangDigest::of("gh"));
        assert_ne!(BangDigest::of("gh"), BangDigest::of("GH"));
    }

    #[test]
    fn ordering_is_unsigned_bytewise() {
        let mut low = [0u8; DIGEST_LEN];
        let mut high = [0u8; DIGEST_LEN];
        low[0] = 0x7f;
        high[0] = 0x80;
        assert!(BangDigest::from_bytes(low) < BangDigest::from_bytes(high));
    }
}
