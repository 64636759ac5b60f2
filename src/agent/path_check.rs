//! Document path comparison for `checkPath`.

/// Lower-cases and unifies separators to `\`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    path.trim().replace('/', "\\").to_lowercase()
}

/// Whether the open document is the one the caller targeted.
///
/// A document without a path never matches.
#[must_use]
pub fn same_document(current: Option<&str>, requested: &str) -> bool {
    current.is_some_and(|current| normalize_path(current) == normalize_path(requested))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_and_case_are_ignored() {
        assert!(same_document(
            Some("C:\\Docs\\Report.DOCX"),
            "c:/docs/report.docx"
        ));
    }

    #[test]
    fn different_files_do_not_match() {
        assert!(!same_document(Some("C:\\docs\\a.docx"), "C:\\docs\\b.docx"));
        assert!(!same_document(Some("C:\\docs\\a.docx"), "a.docx"));
    }

    #[test]
    fn unsaved_document_never_matches() {
        assert!(!same_document(None, "C:\\docs\\a.docx"));
    }
}
