//! Document identifier generation.

use rand::RngCore;

/// Length of generated identifiers, in hex characters.
pub const ID_LENGTH: usize = 30;

/// Produces `_id` and `_rev` stamps for generated documents.
pub trait IdGenerator {
    /// Returns a fresh identifier.
    fn next_id(&mut self) -> String;
}

/// Random 30-character lowercase hex identifiers.
///
/// Collisions are only statistically improbable; nothing checks for them.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        let mut bytes = [0u8; ID_LENGTH / 2];
        rand::rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

/// Deterministic identifiers: a counter rendered as 30 hex digits.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Creates a generator starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{:0width$x}", self.next, width = ID_LENGTH);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn is_lower_hex(s: &str) -> bool {
        s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
    }

    #[test]
    fn test_random_ids_shape() {
        let mut ids = RandomIds;
        for _ in 0..100 {
            let id = ids.next_id();
            assert_eq!(id.len(), ID_LENGTH);
            assert!(is_lower_hex(&id), "not lowercase hex: {id}");
        }
    }

    #[test]
    fn test_random_ids_differ() {
        let mut ids = RandomIds;
        let seen: HashSet<String> = (0..1000).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id(), "0".repeat(ID_LENGTH));
        let second = ids.next_id();
        assert_eq!(second.len(), ID_LENGTH);
        assert!(second.ends_with("01"));
        assert!(is_lower_hex(&ids.next_id()));
    }
}
