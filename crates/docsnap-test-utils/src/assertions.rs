//! Assertion helpers with readable failure output.

use std::path::Path;

/// Assert that a file's content equals expected text exactly.
///
/// # Example
///
/// ```rust
/// use docsnap_test_utils::assertions::assert_file_equals;
/// use tempfile::TempDir;
///
/// let dir = TempDir::new().unwrap();
/// let path = dir.path().join("a.txt");
/// std::fs::write(&path, "Hello").unwrap();
///
/// assert_file_equals(&path, "Hello");
/// ```
pub fn assert_file_equals(path: &Path, expected: &str) {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read file {}: {}", path.display(), e));

    if content != expected {
        panic!(
            "File {} content does not match expected.\nDiff:\n{}",
            path.display(),
            line_diff(expected, &content)
        );
    }
}

/// Assert that a file contains specific text.
pub fn assert_file_contains(path: &Path, expected: &str) {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read file {}: {}", path.display(), e));

    assert!(
        content.contains(expected),
        "File {} does not contain expected text.\nExpected to find: {}\nActual content:\n{}",
        path.display(),
        expected,
        content
    );
}

/// Assert that two files hold identical bytes.
pub fn assert_same_bytes(actual: &Path, expected: &Path) {
    let read = |p: &Path| {
        std::fs::read(p).unwrap_or_else(|e| panic!("Failed to read file {}: {}", p.display(), e))
    };
    let (a, b) = (read(actual), read(expected));
    assert!(
        a == b,
        "Files differ: {} ({} bytes) vs {} ({} bytes)",
        actual.display(),
        a.len(),
        expected.display(),
        b.len()
    );
}

/// Assert that two strings are equal, with a line diff on failure.
pub fn assert_strings_equal(actual: &str, expected: &str) {
    if actual != expected {
        panic!("Strings are not equal.\nDiff:\n{}", line_diff(expected, actual));
    }
}

/// Assert that every line of `expected` appears in `raw`, in order.
///
/// Handy for checking rendered diffs without pinning unrelated lines.
pub fn assert_lines_in_order(raw: &str, expected: &[&str]) {
    let mut lines = raw.lines();
    for want in expected {
        assert!(
            lines.any(|line| line == *want),
            "Line {want:?} not found (in order) in:\n{raw}"
        );
    }
}

fn line_diff(expected: &str, actual: &str) -> String {
    let diff = similar::TextDiff::from_lines(expected, actual);
    let mut output = String::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            similar::ChangeTag::Delete => "-",
            similar::ChangeTag::Insert => "+",
            similar::ChangeTag::Equal => " ",
        };
        output.push_str(&format!("{sign}{change}"));
        if change.missing_newline() {
            output.push('\n');
        }
    }
    output
}

/// Assert that a result is Ok and extract the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Assert that a result is Err and extract the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => e,
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Ok(value) => panic!("{}: {:?}", $msg, value),
            Err(e) => e,
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_assertions() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, "same\n").unwrap();
        std::fs::write(&b, "same\n").unwrap();

        assert_file_equals(&a, "same\n");
        assert_file_contains(&a, "sam");
        assert_same_bytes(&a, &b);
    }

    #[test]
    #[should_panic(expected = "Files differ")]
    fn test_same_bytes_fails() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, "one").unwrap();
        std::fs::write(&b, "two").unwrap();
        assert_same_bytes(&a, &b);
    }

    #[test]
    #[should_panic(expected = "-old")]
    fn test_strings_equal_shows_diff() {
        assert_strings_equal("new\n", "old\n");
    }

    #[test]
    fn test_lines_in_order() {
        assert_lines_in_order("  a\n- b\n+ c\n  d", &["- b", "  d"]);
    }

    #[test]
    #[should_panic(expected = "not found")]
    fn test_lines_out_of_order() {
        assert_lines_in_order("  a\n- b", &["- b", "  a"]);
    }

    #[test]
    fn test_macros() {
        let value = assert_ok!(Ok::<_, String>(3));
        assert_eq!(value, 3);
        let err = assert_err!(Err::<u8, _>("bad"));
        assert_eq!(err, "bad");
    }
}
