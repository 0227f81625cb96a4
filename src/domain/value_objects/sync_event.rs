//! Sync event classification
//!
//! rsync is run with `--out-format='%i | %n'`, so every item it touches is
//! reported as `<itemized-change-code> | <path>`. [`classify_line`] turns one
//! such line into a [`SyncEvent`]. It is a pure function of the line so it can
//! be tested without a live rsync process.

use std::fmt;

use serde::Serialize;

/// rsync's itemize code for a removed destination entry
pub const DELETING_CODE: &str = "*deleting";

/// rsync's itemize code for a newly created directory
pub const CREATING_DIR_CODE: &str = "cd+++++++++";

/// What happened to one item during the transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncCategory {
    /// File content is being sent to the remote side
    Uploading,
    /// Directory visited / attributes checked
    Accessing,
    /// File present on both sides and identical
    Unchanged,
    /// Extraneous remote entry removed
    Deleting,
    /// New remote directory created
    Creating,
    /// Anything else (statistics, unhandled codes); reported verbatim
    Raw,
}

impl SyncCategory {
    pub fn label(&self) -> &'static str {
        match self {
            SyncCategory::Uploading => "Uploading",
            SyncCategory::Accessing => "Accessing",
            SyncCategory::Unchanged => "Unchanged",
            SyncCategory::Deleting => "Deleting",
            SyncCategory::Creating => "Creating",
            SyncCategory::Raw => "",
        }
    }
}

impl fmt::Display for SyncCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncCategory::Raw => f.write_str("raw"),
            other => f.write_str(other.label()),
        }
    }
}

/// One classified line of rsync output
///
/// For [`SyncCategory::Raw`] `filename` holds the original line unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncEvent {
    pub category: SyncCategory,
    pub filename: String,
}

impl SyncEvent {
    fn raw(line: &str) -> Self {
        Self {
            category: SyncCategory::Raw,
            filename: line.to_string(),
        }
    }
}

/// Classify one line of `%i | %n` rsync output
///
/// Rules, first match wins:
/// - code starts with `<` → Uploading
/// - code starts with `.` → Accessing when the second char is `d`, else Unchanged
/// - code is `*deleting` → Deleting
/// - code is `cd+++++++++` → Creating
/// - anything else (including lines without a `|`) → Raw
pub fn classify_line(line: &str) -> SyncEvent {
    let Some((code, path)) = line.split_once('|') else {
        return SyncEvent::raw(line);
    };
    let code = code.trim();
    let filename = path.trim().to_string();

    let category = if code.starts_with('<') {
        SyncCategory::Uploading
    } else if code.starts_with('.') {
        if code[1..].starts_with('d') {
            SyncCategory::Accessing
        } else {
            SyncCategory::Unchanged
        }
    } else if code == DELETING_CODE {
        SyncCategory::Deleting
    } else if code == CREATING_DIR_CODE {
        SyncCategory::Creating
    } else {
        return SyncEvent::raw(line);
    };

    SyncEvent { category, filename }
}

/// Running totals of classified events, reported when the sync ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncTally {
    pub uploaded: usize,
    pub accessed: usize,
    pub unchanged: usize,
    pub deleted: usize,
    pub created: usize,
    pub other: usize,
}

impl SyncTally {
    pub fn record(&mut self, category: SyncCategory) {
        match category {
            SyncCategory::Uploading => self.uploaded += 1,
            SyncCategory::Accessing => self.accessed += 1,
            SyncCategory::Unchanged => self.unchanged += 1,
            SyncCategory::Deleting => self.deleted += 1,
            SyncCategory::Creating => self.created += 1,
            SyncCategory::Raw => self.other += 1,
        }
    }

    pub fn changes(&self) -> usize {
        self.uploaded + self.deleted + self.created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(line: &str) -> SyncCategory {
        classify_line(line).category
    }

    #[test]
    fn directory_visit_is_accessing() {
        let ev = classify_line(".d..t...... | assets/");
        assert_eq!(ev.category, SyncCategory::Accessing);
        assert_eq!(ev.filename, "assets/");
    }

    #[test]
    fn identical_file_is_unchanged() {
        let ev = classify_line(".f..t...... | index.html");
        assert_eq!(ev.category, SyncCategory::Unchanged);
        assert_eq!(ev.filename, "index.html");
    }

    #[test]
    fn sent_file_is_uploading() {
        assert_eq!(category("<f+++++++++ | css/site.css"), SyncCategory::Uploading);
        assert_eq!(category("<f.st...... | about.html"), SyncCategory::Uploading);
    }

    #[test]
    fn deletion_marker_is_deleting() {
        let ev = classify_line("*deleting   | old/page.html");
        assert_eq!(ev.category, SyncCategory::Deleting);
        assert_eq!(ev.filename, "old/page.html");
    }

    #[test]
    fn new_directory_is_creating() {
        let ev = classify_line("cd+++++++++ | blog/2024/");
        assert_eq!(ev.category, SyncCategory::Creating);
        assert_eq!(ev.filename, "blog/2024/");
    }

    #[test]
    fn unknown_code_is_raw_and_verbatim() {
        let line = "cL+++++++++ | link -> target";
        let ev = classify_line(line);
        assert_eq!(ev.category, SyncCategory::Raw);
        assert_eq!(ev.filename, line);
    }

    #[test]
    fn statistics_lines_are_raw() {
        let line = "sent 1.23K bytes  received 45 bytes  2.55K bytes/sec";
        assert_eq!(classify_line(line), SyncEvent::raw(line));
    }

    #[test]
    fn empty_line_is_raw() {
        assert_eq!(category(""), SyncCategory::Raw);
    }

    #[test]
    fn single_dot_code_is_unchanged() {
        assert_eq!(category(". | x"), SyncCategory::Unchanged);
    }

    #[test]
    fn only_first_pipe_splits() {
        let ev = classify_line("<f+++++++++ | a|b.txt");
        assert_eq!(ev.category, SyncCategory::Uploading);
        assert_eq!(ev.filename, "a|b.txt");
    }

    #[test]
    fn classification_is_stable() {
        let line = ".d..t...... | ./";
        assert_eq!(classify_line(line), classify_line(line));
    }

    #[test]
    fn tally_counts_changes() {
        let mut tally = SyncTally::default();
        for line in [
            "<f+++++++++ | a",
            "*deleting | b",
            "cd+++++++++ | c/",
            ".f..t...... | d",
            ".d..t...... | ./",
            "total size is 0",
        ] {
            tally.record(classify_line(line).category);
        }
        assert_eq!(tally.changes(), 3);
        assert_eq!(tally.unchanged, 1);
        assert_eq!(tally.accessed, 1);
        assert_eq!(tally.other, 1);
    }
}
