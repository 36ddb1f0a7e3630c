use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

static INVALID_CHARS: OnceLock<Regex> = OnceLock::new();

/// Name used when the client did not send a usable filename.
pub const FALLBACK_FILENAME: &str = "upload";

/// Generates a unique object name from a client supplied filename.
///
/// Directory components are dropped, characters outside `[\w\-.]` are replaced
/// with `_`, and a random token of `token_length` hex digits is inserted before
/// the extension: `photo.jpg` becomes `photo.3f9a1c2e7b5d4a60.jpg`.
///
/// `token_length` is clamped to `8..=32`.
pub fn generate_secure_filename(filename: &str, token_length: usize) -> String {
    let token_length = token_length.clamp(8, 32);

    let basename = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let basename = if basename.is_empty() || basename.chars().all(|c| c == '.') {
        FALLBACK_FILENAME
    } else {
        basename
    };

    let invalid_chars = INVALID_CHARS.get_or_init(|| {
        Regex::new(r"[^\w\-.]+").expect("filename regex is valid")
    });
    let sanitized = invalid_chars.replace_all(basename, "_");

    let (base, ext) = split_filename(&sanitized);

    let token = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(token_length)
        .collect::<String>();

    if ext.is_empty() {
        format!("{}.{}", base, token)
    } else {
        format!("{}.{}.{}", base, token, ext)
    }
}

/// Splits a filename into its base name and lowercased extension.
///
/// A leading dot belongs to the base name, so `.profile` has no extension.
pub fn split_filename(filename: &str) -> (String, String) {
    let (prefix, rest) = match filename.strip_prefix('.') {
        Some(rest) => (".", rest),
        None => ("", filename),
    };

    match rest.rfind('.') {
        Some(i) => (
            format!("{}{}", prefix, &rest[..i]),
            rest[i + 1..].to_lowercase(),
        ),
        None => (filename.to_string(), String::new()),
    }
}
