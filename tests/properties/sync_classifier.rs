//! Property tests for rsync output classification.

use proptest::prelude::*;

use jamal::{classify_line, SyncCategory};

fn filename() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_./-][A-Za-z0-9_. /-]{0,30}[A-Za-z0-9_./-]")
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Classification never panics, whatever rsync prints.
    #[test]
    fn property_classify_never_panics(line in any::<String>()) {
        let _ = classify_line(&line);
    }

    /// PROPERTY: Lines without a separator come back verbatim as Raw.
    #[test]
    fn property_lines_without_separator_are_raw(line in "[^|]{0,60}") {
        let event = classify_line(&line);
        prop_assert_eq!(event.category, SyncCategory::Raw);
        prop_assert_eq!(event.filename, line);
    }

    /// PROPERTY: Any `<` code is an upload of the trimmed file name.
    #[test]
    fn property_sent_files_are_uploads(flags in "[a-z.+]{10}", name in filename()) {
        let event = classify_line(&format!("<{flags} | {name}"));
        prop_assert_eq!(event.category, SyncCategory::Uploading);
        prop_assert_eq!(event.filename, name);
    }

    /// PROPERTY: Every event increments exactly one tally bucket.
    #[test]
    fn property_tally_counts_every_line(lines in proptest::collection::vec(any::<String>(), 0..20)) {
        let mut tally = jamal::domain::value_objects::SyncTally::default();
        for line in &lines {
            tally.record(classify_line(line).category);
        }
        let total = tally.uploaded
            + tally.accessed
            + tally.unchanged
            + tally.deleted
            + tally.created
            + tally.other;
        prop_assert_eq!(total, lines.len());
    }
}
