//! Token masking for log output
//!
//! The service authenticates through an `access_token` query parameter, so
//! every request URL carries the token. URLs and error messages pass through
//! these helpers before they reach a log line.

use regex::Regex;
use reqwest::Url;

/// Query parameter carrying the token
pub const TOKEN_PARAM: &str = "access_token";

/// Masks a token for safe logging
///
/// Shows only the first 3 and last 3 characters for identification purposes.
/// Tokens shorter than 10 characters are fully masked as "****".
///
/// # Examples
///
/// ```
/// use maven_repo_upload::security::mask_token;
///
/// assert_eq!(mask_token("abcdef123456"), "abc...456");
/// assert_eq!(mask_token("short"), "****");
/// ```
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }

    let prefix: String = chars[..3].iter().collect();
    let suffix: String = chars[chars.len() - 3..].iter().collect();
    format!("{}...{}", prefix, suffix)
}

/// Renders a URL with the token query value masked
pub fn redact_url(url: &Url) -> String {
    let has_token = url.query_pairs().any(|(key, _)| key == TOKEN_PARAM);
    if !has_token {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            if key == TOKEN_PARAM {
                (key.into_owned(), mask_token(&value))
            } else {
                (key.into_owned(), value.into_owned())
            }
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

/// Replaces every occurrence of `secret` in `text` with its masked form
pub fn mask_secret_in(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        return text.to_string();
    }

    match Regex::new(&regex::escape(secret)) {
        Ok(regex) => regex
            .replace_all(text, mask_token(secret).as_str())
            .into_owned(),
        Err(_) => text.replace(secret, "****"),
    }
}
