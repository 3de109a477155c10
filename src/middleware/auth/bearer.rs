//! `Authorization` header → bearer token.
//!
//! The rule is lenient on purpose and clients rely on it:
//! - the token is whatever follows the first space
//! - the scheme word before it is not checked (`Token abc` yields `abc`)
//! - an empty remainder counts as no token
//!
//! A remainder that is not text is still a token; it just can never verify.

use axum::http::{HeaderMap, header};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bearer<'a> {
    Token(&'a str),
    /// Present but not visible ASCII.
    Undecodable,
}

pub fn extract_bearer(headers: &HeaderMap) -> Option<Bearer<'_>> {
    let value = headers.get(header::AUTHORIZATION)?.as_bytes();
    let space = value.iter().position(|b| *b == b' ')?;
    let token = &value[space + 1..];

    if token.is_empty() {
        return None;
    }

    // HeaderValue::to_str accepts visible ASCII only; keep the same rule for the token part
    match std::str::from_utf8(token) {
        Ok(s) if token.iter().all(|b| b.is_ascii_graphic() || *b == b' ' || *b == b'\t') => {
            Some(Bearer::Token(s))
        }
        _ => Some(Bearer::Undecodable),
    }
}
