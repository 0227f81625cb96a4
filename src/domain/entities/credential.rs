//! Transfer credential - the rsync daemon secret for one site
//!
//! A secret is 16 distinct characters sampled without replacement from
//! letters, digits and an 18-character punctuation set. The punctuation set
//! deliberately has no `:` because the secrets file is `name:secret` with no
//! escaping.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::value_objects::SiteName;

/// Length of a generated secret
pub const SECRET_LEN: usize = 16;

/// Punctuation allowed in generated secrets
pub const SECRET_PUNCTUATION: &str = "!@#$%^&*()_+-=[]{}";

const LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";

/// Full alphabet a secret is drawn from
pub fn secret_alphabet() -> Vec<char> {
    LETTERS
        .chars()
        .chain(DIGITS.chars())
        .chain(SECRET_PUNCTUATION.chars())
        .collect()
}

/// rsync daemon secret bound to exactly one site
#[derive(Clone, PartialEq, Eq)]
pub struct TransferCredential {
    site: SiteName,
    secret: String,
}

impl TransferCredential {
    /// Generate a fresh secret using the thread-local CSPRNG
    pub fn generate(site: &SiteName) -> Self {
        Self::generate_with(site, &mut rand::rng())
    }

    /// Generate a fresh secret from the given RNG
    pub fn generate_with<R: Rng + ?Sized>(site: &SiteName, rng: &mut R) -> Self {
        let mut pool = secret_alphabet();
        let (picked, _) = pool.partial_shuffle(rng, SECRET_LEN);
        Self {
            site: site.clone(),
            secret: picked.iter().collect(),
        }
    }

    /// Wrap an existing secret (e.g. loaded from the site document)
    pub fn from_existing(site: &SiteName, secret: impl Into<String>) -> Self {
        Self {
            site: site.clone(),
            secret: secret.into(),
        }
    }

    pub fn site(&self) -> &SiteName {
        &self.site
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Line stored in the remote secrets file
    pub fn secrets_entry(&self) -> String {
        format!("{}:{}", self.site, self.secret)
    }
}

impl std::fmt::Debug for TransferCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferCredential")
            .field("site", &self.site)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn site() -> SiteName {
        SiteName::parse("example").unwrap()
    }

    #[test]
    fn alphabet_has_enough_distinct_symbols() {
        let alphabet = secret_alphabet();
        let distinct: HashSet<_> = alphabet.iter().collect();
        assert_eq!(SECRET_PUNCTUATION.chars().count(), 18);
        assert_eq!(alphabet.len(), 80);
        assert_eq!(distinct.len(), alphabet.len());
        assert!(!alphabet.contains(&':'));
    }

    #[test]
    fn secret_is_sixteen_distinct_alphabet_chars() {
        let alphabet: HashSet<char> = secret_alphabet().into_iter().collect();
        let cred = TransferCredential::generate(&site());
        let chars: Vec<char> = cred.secret().chars().collect();
        assert_eq!(chars.len(), SECRET_LEN);
        let distinct: HashSet<_> = chars.iter().copied().collect();
        assert_eq!(distinct.len(), SECRET_LEN);
        assert!(chars.iter().all(|c| alphabet.contains(c)));
    }

    #[test]
    fn consecutive_secrets_differ() {
        let a = TransferCredential::generate(&site());
        let b = TransferCredential::generate(&site());
        assert_ne!(a.secret(), b.secret());
    }

    #[test]
    fn secrets_entry_format() {
        let cred = TransferCredential::from_existing(&site(), "abc");
        assert_eq!(cred.secrets_entry(), "example:abc");
    }

    #[test]
    fn debug_hides_secret() {
        let cred = TransferCredential::from_existing(&site(), "topsecret");
        assert!(!format!("{:?}", cred).contains("topsecret"));
    }
}
