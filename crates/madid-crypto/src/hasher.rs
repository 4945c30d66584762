use std::fmt;

use madid_types::{DeviceId, VisitorIdentifier};
use sha2::{Digest, Sha256};

/// A 256-bit SHA-256 digest of a visitor identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityHash([u8; 32]);

impl IdentityHash {
    /// The raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The device id an identified visitor is tracked under.
    pub fn to_device_id(&self) -> DeviceId {
        DeviceId::from_digest_hex(self.to_hex())
    }
}

impl fmt::Debug for IdentityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityHash({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for IdentityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Unsalted SHA-256 hasher for visitor identifiers.
///
/// The identifier's UTF-8 bytes are hashed exactly as given: no trimming,
/// no case folding, no domain tag. Linkability across sessions and devices
/// is the whole point, so no salt is mixed in.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityHasher;

impl IdentityHasher {
    /// Hash raw identifier bytes.
    pub fn hash_bytes(data: &[u8]) -> IdentityHash {
        IdentityHash(Sha256::digest(data).into())
    }

    /// Hash a visitor identifier.
    pub fn hash(&self, identifier: &VisitorIdentifier) -> IdentityHash {
        Self::hash_bytes(identifier.as_bytes())
    }

    /// Hash a visitor identifier straight into the device id it maps to.
    pub fn device_id(&self, identifier: &VisitorIdentifier) -> DeviceId {
        self.hash(identifier).to_device_id()
    }
}
