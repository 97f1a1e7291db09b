use sha2::{Digest, Sha256};

/// Short digest used to correlate prompts in logs without logging them.
pub(crate) fn prompt_digest(prompt: &str) -> String {
    let digest = Sha256::digest(prompt.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(12);
    encoded
}
