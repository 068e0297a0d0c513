pub mod error;
pub mod export;
pub mod key;
pub mod names;
pub mod runner;
pub mod store;
pub mod types;

pub use error::{NomenError, Result};

// length in bytes of every generated key
pub const KEY_LEN: usize = 32;
// the single bucket holding all pairings
pub const BUCKET_NAME: &str = "keys";
// draws attempted before the local name space counts as exhausted
pub const MAX_NAME_RETRIES: usize = 1000;
