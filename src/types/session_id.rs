use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// Opaque identifier for one chat session.
///
/// Sent to the backend as `user_id` so that usage statistics can be
/// attributed.  The identifier combines the creation time in milliseconds
/// with a random base-36 suffix, e.g. `user_1718000000000_k3j9x0a2b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh identifier from the current time.
    pub fn generate() -> Self {
        Self::generate_at(OffsetDateTime::now_utc(), &mut rand::thread_rng())
    }

    /// Generate an identifier for the given instant using `rng` for the suffix.
    pub fn generate_at<R: Rng>(now: OffsetDateTime, rng: &mut R) -> Self {
        let millis = now.unix_timestamp_nanos() / 1_000_000;
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect();
        Self(format!("user_{millis}_{suffix}"))
    }

    /// The identifier as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
