//! Admin key material and wire format.
//!
//! A key is `prefix.secret`: an 8-letter prefix that identifies the stored
//! row and a 40-character alphanumeric secret of which only the hash is kept.

use rand::RngExt;
use rand::rngs::StdRng;

pub const PREFIX_LEN: usize = 8;
pub const SECRET_LEN: usize = 40;
pub const KEY_SEPARATOR: char = '.';

/// Argon2 salt length in bytes for admin key hashes
const HASH_SALT_LEN: usize = 16;

const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// One draw of key material; regenerated as a whole on prefix collision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyMaterial {
    pub prefix: String,
    pub secret: String,
    pub hash_salt: String,
}

impl KeyMaterial {
    pub fn draw(rng: &mut StdRng) -> Self {
        Self {
            prefix: random_string(rng, LETTERS, PREFIX_LEN),
            secret: random_string(rng, ALPHANUMERIC, SECRET_LEN),
            hash_salt: random_string(rng, ALPHANUMERIC, HASH_SALT_LEN),
        }
    }

    pub fn wire_format(&self) -> String {
        format!("{}{}{}", self.prefix, KEY_SEPARATOR, self.secret)
    }
}

fn random_string(rng: &mut StdRng, alphabet: &[u8], length: usize) -> String {
    std::iter::repeat_with(|| alphabet[rng.random_range(0..alphabet.len())] as char)
        .take(length)
        .collect()
}

/// Split a presented key into `(prefix, secret)`.
///
/// Exactly two non-empty parts are accepted.
pub fn split_key(candidate: &str) -> Option<(&str, &str)> {
    let mut parts = candidate.split(KEY_SEPARATOR);
    let prefix = parts.next()?;
    let secret = parts.next()?;
    if parts.next().is_some() || prefix.is_empty() || secret.is_empty() {
        return None;
    }
    Some((prefix, secret))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_key_material_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let material = KeyMaterial::draw(&mut rng);
            assert_eq!(material.prefix.len(), PREFIX_LEN);
            assert!(material.prefix.chars().all(|c| c.is_ascii_alphabetic()));
            assert_eq!(material.secret.len(), SECRET_LEN);
            assert!(material.secret.chars().all(|c| c.is_ascii_alphanumeric()));
            assert_eq!(material.hash_salt.len(), HASH_SALT_LEN);
        }
    }

    #[test]
    fn test_random_string_covers_alphabet() {
        let mut rng = StdRng::seed_from_u64(11);
        let drawn = random_string(&mut rng, ALPHANUMERIC, 4096);
        for c in ALPHANUMERIC {
            assert!(drawn.contains(*c as char), "never drew {}", *c as char);
        }
        assert_eq!(random_string(&mut rng, LETTERS, 0), "");
    }

    #[test]
    fn test_same_seed_same_material() {
        let a = KeyMaterial::draw(&mut StdRng::seed_from_u64(42));
        let b = KeyMaterial::draw(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_wire_format_round_trips_through_split() {
        let material = KeyMaterial::draw(&mut StdRng::seed_from_u64(1));
        let key = material.wire_format();
        assert_eq!(
            split_key(&key),
            Some((material.prefix.as_str(), material.secret.as_str()))
        );
    }

    #[test]
    fn test_split_key_rejects_malformed() {
        assert_eq!(split_key("garbage"), None);
        assert_eq!(split_key(""), None);
        assert_eq!(split_key("."), None);
        assert_eq!(split_key("abc."), None);
        assert_eq!(split_key(".secret"), None);
        assert_eq!(split_key("a.b.c"), None);
        assert_eq!(split_key("abcdefgh.s3cret"), Some(("abcdefgh", "s3cret")));
    }
}
