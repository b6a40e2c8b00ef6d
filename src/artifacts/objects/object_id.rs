//! Object identifier (SHA-1 hash)
//!
//! Object IDs are 20-byte digests, written as 40 lowercase hexadecimal
//! characters wherever they appear in text (e.g. "abc123...def").
//!
//! ## Format
//!
//! - Full: 40 hex characters
//! - Short: First 7 characters (e.g., "abc123f")
//!
//! Parsing accepts both upper and lower case digits, rendering is always
//! lowercase.

use crate::artifacts::objects::{OBJECT_ID_LENGTH, OBJECT_ID_RAW_LENGTH};
use sha1::{Digest, Sha1};

/// Object identifier (SHA-1 hash)
///
/// Opaque to the backup log beyond hex encoding, hex decoding and equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_RAW_LENGTH]);

impl ObjectId {
    /// The all-zero id, used by callers for "did not exist" on either side
    /// of a transition.
    pub const fn null() -> Self {
        Self([0; OBJECT_ID_RAW_LENGTH])
    }

    pub fn is_null(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Parse and validate an object ID from a string
    ///
    /// # Arguments
    ///
    /// * `id` - 40-character hexadecimal string
    ///
    /// # Returns
    ///
    /// Validated ObjectId or error if invalid length/characters
    pub fn try_parse(id: &str) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("Invalid object ID length: {}", id.len()));
        }

        Self::from_hex_prefix(id.as_bytes())
            .ok_or_else(|| anyhow::anyhow!("Invalid object ID characters: {}", id))
    }

    /// Decode the object ID held in the first 40 bytes of `buf`
    ///
    /// Trailing bytes are ignored, so a line can be handed over as is and the
    /// caller continues right after the id.
    pub fn from_hex_prefix(buf: &[u8]) -> Option<Self> {
        let hex40 = buf.get(..OBJECT_ID_LENGTH)?;
        let mut raw = [0u8; OBJECT_ID_RAW_LENGTH];

        // Process a nibble pair at a time
        for (byte, pair) in raw.iter_mut().zip(hex40.chunks_exact(2)) {
            *byte = (hex_value(pair[0])? << 4) | hex_value(pair[1])?;
        }

        Some(Self(raw))
    }

    /// Hash `content` into an object ID
    pub fn digest(content: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(content);

        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; OBJECT_ID_RAW_LENGTH] {
        &self.0
    }

    /// Render the 40-character lowercase hex form
    pub fn to_hex(&self) -> String {
        self.to_string()
    }

    /// Get abbreviated form of the object ID
    ///
    /// # Returns
    ///
    /// First 7 characters of the hash (standard Git abbreviation)
    pub fn to_short_oid(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(7);
        hex
    }
}

impl From<[u8; OBJECT_ID_RAW_LENGTH]> for ObjectId {
    fn from(raw: [u8; OBJECT_ID_RAW_LENGTH]) -> Self {
        Self(raw)
    }
}

impl std::str::FromStr for ObjectId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}
