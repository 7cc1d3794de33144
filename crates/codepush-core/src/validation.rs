//! Input validation shared by the release family of commands

use std::path::Path;
use std::str::FromStr;

use semver::Comparator;

use crate::error::ValidationError;

const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "ipa", "apk"];

/// Check a target binary version range.
///
/// Accepts an exact version, wildcards (`*`, `x`), caret/tilde forms, comparator sets
/// (`>=1.0.0 <1.0.5`), hyphen ranges (`1.0.0 - 1.2.0`) and `||` unions.
pub fn is_valid_semver_range(range: &str) -> bool {
    let range = range.trim();
    if range.is_empty() {
        return false;
    }

    range.split("||").all(|set| is_valid_comparator_set(set.trim()))
}

fn is_valid_comparator_set(set: &str) -> bool {
    if set.is_empty() {
        // `1.0.0 || ` style trailing unions match nothing
        return false;
    }

    if let Some((low, high)) = set.split_once(" - ") {
        return is_valid_partial(low.trim()) && is_valid_partial(high.trim());
    }

    let mut pending_op: Option<&str> = None;
    for token in set.split_whitespace() {
        let comparator = match pending_op.take() {
            Some(op) => format!("{op}{token}"),
            None if is_bare_operator(token) => {
                pending_op = Some(token);
                continue;
            }
            None => token.to_string(),
        };

        if !is_valid_comparator(&comparator) {
            return false;
        }
    }

    pending_op.is_none()
}

fn is_bare_operator(token: &str) -> bool {
    matches!(token, "<" | "<=" | ">" | ">=" | "=" | "^" | "~")
}

/// `*`, `x` and `X` match every version
fn is_wildcard(token: &str) -> bool {
    matches!(token, "*" | "x" | "X")
}

fn is_valid_comparator(comparator: &str) -> bool {
    if is_wildcard(comparator) {
        return true;
    }
    let normalized = strip_v_prefix(comparator);
    Comparator::from_str(&normalized).is_ok()
}

fn is_valid_partial(version: &str) -> bool {
    if is_wildcard(version) {
        return true;
    }
    let version = version.trim_start_matches(['v', 'V']);
    !version.is_empty()
        && !version.starts_with(['<', '>', '=', '^', '~'])
        && Comparator::from_str(version).is_ok()
}

/// Drop a `v` between an operator and the version (`>=v1.0.0`, `v1.2`)
fn strip_v_prefix(comparator: &str) -> String {
    let split = comparator
        .find(|c: char| !matches!(c, '<' | '>' | '=' | '^' | '~'))
        .unwrap_or(comparator.len());
    let (op, rest) = comparator.split_at(split);
    format!("{op}{}", rest.trim_start_matches(['v', 'V']))
}

/// Validate a target binary range, mapping failure to the user-facing error
pub fn validate_semver_range(range: &str) -> Result<(), ValidationError> {
    if is_valid_semver_range(range) {
        Ok(())
    } else {
        Err(ValidationError::InvalidTargetBinaryRange)
    }
}

/// True unless the path names a `.zip`, `.ipa` or `.apk` archive
pub fn is_valid_release_package(path: &Path) -> bool {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => !ARCHIVE_EXTENSIONS
            .iter()
            .any(|archive| ext.eq_ignore_ascii_case(archive)),
        None => true,
    }
}

pub fn validate_release_package(path: &Path) -> Result<(), ValidationError> {
    if is_valid_release_package(path) {
        Ok(())
    } else {
        Err(ValidationError::BinaryOrZipPackage)
    }
}

pub fn validate_rollout(rollout: Option<u8>) -> Result<(), ValidationError> {
    match rollout {
        Some(value) if !(1..=100).contains(&value) => Err(ValidationError::InvalidRollout),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_accepts_common_ranges() {
        for range in [
            "1.0.0",
            "*",
            "^1.2.3",
            "~1.2",
            "1.x",
            "1.2.*",
            ">=1.0.0 <1.0.5",
            ">= 1.0.0 < 2.0.0",
            "1.0.0 - 1.2.0",
            "^1.0.0 || ^2.0.0",
            "v1.0.0",
        ] {
            assert!(is_valid_semver_range(range), "expected {range:?} to be valid");
        }
    }

    #[test]
    fn test_rejects_invalid_ranges() {
        for range in ["not semver", "notsemver", "", "   ", "1.0.0 ||", ">=", "1.0.0 - "] {
            assert!(!is_valid_semver_range(range), "expected {range:?} to be invalid");
        }
    }

    #[test]
    fn test_range_error_message() {
        let err = validate_semver_range("not semver").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please use a semver-compliant target binary version range, for example \"1.0.0\", \"*\" or \"^1.2.3\"."
        );
    }

    #[test]
    fn test_rejects_archive_packages_case_insensitively() {
        for path in [
            "/fake/path/test/file.zip",
            "/fake/path/test/file.ipa",
            "/fake/path/test/file.apk",
            "build/App.IPA",
            "dist.Zip",
        ] {
            assert_eq!(
                validate_release_package(&PathBuf::from(path)),
                Err(ValidationError::BinaryOrZipPackage)
            );
        }
    }

    #[test]
    fn test_accepts_directories_and_bundles() {
        for path in ["./resources", "platforms/ios/www", "main.jsbundle", "index.android.bundle"] {
            assert!(is_valid_release_package(&PathBuf::from(path)));
        }
    }

    #[test]
    fn test_rollout_bounds() {
        assert!(validate_rollout(None).is_ok());
        assert!(validate_rollout(Some(1)).is_ok());
        assert!(validate_rollout(Some(100)).is_ok());
        assert_eq!(validate_rollout(Some(0)), Err(ValidationError::InvalidRollout));
        assert_eq!(validate_rollout(Some(101)), Err(ValidationError::InvalidRollout));
    }

    #[test]
    fn test_bare_x_is_a_wildcard() {
        for range in ["x", "X", "1.0.0 || x", "x - 1.2.0"] {
            assert!(is_valid_semver_range(range), "expected {range:?} to be valid");
        }
        assert!(!is_valid_semver_range("xx"));
    }
}
