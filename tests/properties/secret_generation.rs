//! Property tests for rsync secret generation.

use std::collections::HashSet;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use jamal::domain::entities::{secret_alphabet, TransferCredential, SECRET_LEN};
use jamal::SiteName;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: A secret is 16 distinct characters from the alphabet, never `:`.
    #[test]
    fn property_secret_shape(seed in any::<u64>()) {
        let site = SiteName::parse("blog").unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let credential = TransferCredential::generate_with(&site, &mut rng);
        let secret = credential.secret();

        let alphabet: HashSet<char> = secret_alphabet().into_iter().collect();
        let chars: HashSet<char> = secret.chars().collect();

        prop_assert_eq!(secret.chars().count(), SECRET_LEN);
        prop_assert_eq!(chars.len(), SECRET_LEN);
        prop_assert!(chars.is_subset(&alphabet));
        prop_assert!(!secret.contains(':'));
        prop_assert!(!secret.chars().any(char::is_whitespace));
    }
}
