//! Round-Trip Validator: compares original source against a reprinted
//! reconstruction three ways, from strictest to loosest, plus the two
//! process-wide toggles that gate when validation runs at all.

use std::sync::atomic::{AtomicBool, Ordering};

use md5::{Digest, Md5};
use regex::Regex;

use crate::error::{ValidationError, Warning};

static STATEMENT_VALIDATION: AtomicBool = AtomicBool::new(false);
static FILE_VALIDATION: AtomicBool = AtomicBool::new(false);

/// Enable or disable the per-statement check that every field on a line was
/// consumed by its variant's parser.
pub fn set_statement_validation(enabled: bool) {
    STATEMENT_VALIDATION.store(enabled, Ordering::Relaxed);
}

pub fn statement_validation() -> bool {
    STATEMENT_VALIDATION.load(Ordering::Relaxed)
}

/// Enable or disable the file-level round-trip check that
/// [`crate::SmaliFile::from_source`] runs after parsing.
pub fn set_file_validation(enabled: bool) {
    FILE_VALIDATION.store(enabled, Ordering::Relaxed);
}

pub fn file_validation() -> bool {
    FILE_VALIDATION.load(Ordering::Relaxed)
}

/// An MD5 digest over the non-whitespace characters of `data`, sorted, so
/// two texts that contain the same characters in a different order hash
/// equal.
pub fn order_independent_hash(data: &str) -> [u8; 16] {
    let mut chars: Vec<char> = data.chars().filter(|c| !c.is_whitespace()).collect();
    chars.sort_unstable();
    let tokens: String = chars.into_iter().collect();
    let mut hasher = Md5::new();
    hasher.update(tokens.as_bytes());
    hasher.finalize().into()
}

fn comments_re() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)#.*$").unwrap())
}

fn indentation_re() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)(^[ \t]+)|([ \t]+$)").unwrap())
}

fn oversized_whitespace_re() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\t ]{2,}").unwrap())
}

/// Strip comments and indentation, then collapse runs of spaces/tabs to a
/// single space. The original ported this as two passes with an identical
/// second regex (`[\t ]{2,}` applied twice); the second pass can never
/// match once the first has run, so it is omitted here.
pub fn normalize_smali(smali: &str) -> String {
    let no_comments = comments_re().replace_all(smali, "");
    let no_indentation = indentation_re().replace_all(&no_comments, "");
    oversized_whitespace_re()
        .replace_all(&no_indentation, " ")
        .into_owned()
}

pub fn whitespace_normalized_equals(a: &str, b: &str) -> bool {
    normalize_smali(a) == normalize_smali(b)
}

/// Run the three-tier round-trip comparison `raw` started from against
/// `reconstruction` produced by reprinting it. Returns the non-fatal
/// warnings observed, or a fatal [`ValidationError`] if the character
/// multisets don't even match.
pub fn validate(raw: &str, reconstruction: &str) -> Result<Vec<Warning>, ValidationError> {
    if order_independent_hash(raw) != order_independent_hash(reconstruction) {
        return Err(ValidationError(
            "reconstructed source does not contain the same characters as the original".into(),
        ));
    }
    let mut warnings = Vec::new();
    if !whitespace_normalized_equals(raw, reconstruction) {
        warnings.push(Warning::Validation(
            "reconstructed source might not match the original".into(),
        ));
    } else if raw.trim_end() != reconstruction.trim_end() {
        warnings.push(Warning::Whitespace(
            "reconstructed source has different whitespace than the original".into(),
        ));
    }
    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_ignores_character_order() {
        assert_eq!(order_independent_hash("ba c"), order_independent_hash("abc"));
    }

    #[test]
    fn hash_differs_on_different_characters() {
        assert_ne!(order_independent_hash("abc"), order_independent_hash("abd"));
    }

    #[test]
    fn normalize_strips_comments_and_collapses_whitespace() {
        let src = "    .locals  1   # a comment\n";
        assert_eq!(normalize_smali(src), ".locals 1\n");
    }

    #[test]
    fn identical_text_validates_clean() {
        let src = ".class public LFoo;\n.super Ljava/lang/Object;";
        assert_eq!(validate(src, src).unwrap(), Vec::new());
    }

    #[test]
    fn reordered_characters_fail_validation() {
        let err = validate(".locals 1", ".locals 2").unwrap_err();
        assert!(err.0.contains("same characters"));
    }

    #[test]
    fn different_leading_whitespace_warns_only() {
        let warnings = validate("\t.locals 1", "    .locals 1").unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], Warning::Whitespace(_)));
    }
}
