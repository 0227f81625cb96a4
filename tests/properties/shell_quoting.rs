//! Property tests for the single escaping routine used by remote commands.

use proptest::prelude::*;

use jamal::domain::services::shell_quote;

/// Undo POSIX single-quote escaping the way `sh` reads a word
fn sh_unquote(word: &str) -> Option<String> {
    let mut out = String::new();
    let mut chars = word.chars();
    while let Some(c) = chars.next() {
        match c {
            '\'' => loop {
                match chars.next()? {
                    '\'' => break,
                    inner => out.push(inner),
                }
            },
            '\\' => out.push(chars.next()?),
            _ => return None,
        }
    }
    Some(out)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The shell sees exactly the original string.
    #[test]
    fn property_shell_quote_is_lossless(s in any::<String>()) {
        let quoted = shell_quote(&s);
        prop_assert_eq!(sh_unquote(&quoted), Some(s));
    }

    /// PROPERTY: Quoted words always start and end inside single quotes.
    #[test]
    fn property_shell_quote_is_wrapped(s in ".{0,40}") {
        let quoted = shell_quote(&s);
        prop_assert!(quoted.starts_with('\''));
        prop_assert!(quoted.ends_with('\''));
    }
}
