use crate::KEY_LEN;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Secret key material paired with a name.
///
/// Serializes as a plain array of byte values. `Debug` never prints the
/// bytes themselves.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(transparent)]
pub struct SecretKey(pub [u8; KEY_LEN]);

impl SecretKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; KEY_LEN] = bytes.try_into().ok()?;
        Some(SecretKey(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// One allocated name plus its key.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Pair {
    pub name: String,
    pub key: SecretKey,
}

impl Pair {
    pub fn new(name: String, key: SecretKey) -> Self {
        Pair { name, key }
    }
}

/// Counters for a run. Only the runner mutates these.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunState {
    pub requested: usize,
    pub completed: usize,
    pub in_flight: usize,
}

impl RunState {
    pub fn new(requested: usize) -> Self {
        RunState {
            requested,
            ..Default::default()
        }
    }

    pub fn is_done(&self) -> bool {
        self.completed >= self.requested
    }
}
