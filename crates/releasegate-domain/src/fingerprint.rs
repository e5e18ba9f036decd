use sha2::{Digest, Sha256};

/// Hex SHA-256 of the evaluated draft text, binding a packet to its exact input.
pub fn input_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        assert_eq!(
            input_hash("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn whitespace_changes_the_hash() {
        assert_ne!(input_hash("No risk."), input_hash("No risk. "));
    }
}
