use crate::error::Result;
use crate::types::SecretKey;
use crate::KEY_LEN;
use rand::rngs::OsRng;
use rand::RngCore;

/// Anything able to hand out fresh key material.
///
/// The runner moves a clone onto a blocking thread for every pairing, so
/// implementations must be cheap to clone.
pub trait KeySource: Clone + Send + 'static {
    fn generate(&mut self) -> Result<SecretKey>;
}

/// Keys read straight from the operating system's secure random source.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyGenerator;

impl KeyGenerator {
    pub fn new() -> Self {
        KeyGenerator
    }

    pub fn new_key() -> Result<SecretKey> {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.try_fill_bytes(&mut bytes)?;
        Ok(SecretKey(bytes))
    }
}

impl KeySource for KeyGenerator {
    fn generate(&mut self) -> Result<SecretKey> {
        KeyGenerator::new_key()
    }
}
