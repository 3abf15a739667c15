//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `HttpTransport` builds an
//! `HttpRequest` and parses an `HttpResponse`; executing the round-trip in
//! between is the only step that touches the network, so hosts that bring
//! their own HTTP stack can reuse the build and parse halves unchanged.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// A GET request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// First value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Bytes left literal in a query fragment: RFC 3986 unreserved characters
/// plus the sub-delimiters the API reads as syntax.
const FRAGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!')
    .remove(b'$')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b',')
    .remove(b'/')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'?')
    .remove(b'@');

/// Percent-encode a fragment for the query string.
///
/// `<` and `>` are escaped since a URI may not carry them raw, and `&` and
/// `+` since they would split or alter the fragment. Operands are never
/// pre-encoded, so `%` is escaped too.
pub fn encode_fragment(fragment: &str) -> String {
    utf8_percent_encode(fragment, FRAGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_characters_pass_through() {
        assert_eq!(encode_fragment("!name"), "!name");
        assert_eq!(encode_fragment("name=/ring/i"), "name=/ring/i");
        assert_eq!(encode_fragment("sort=dialog:asc"), "sort=dialog:asc");
        assert_eq!(encode_fragment("name!=a,b"), "name!=a,b");
    }

    #[test]
    fn unsafe_bytes_are_escaped() {
        assert_eq!(encode_fragment("name=The Two Towers"), "name=The%20Two%20Towers");
        assert_eq!(encode_fragment("dialog=Frodo & Sam"), "dialog=Frodo%20%26%20Sam");
        assert_eq!(encode_fragment("dialog=100%"), "dialog=100%25");
        assert_eq!(encode_fragment("name=/^The|A/"), "name=/%5EThe%7CA/");
    }

    #[test]
    fn comparison_operators_are_escaped() {
        assert_eq!(encode_fragment("budgetInMillions>=200"), "budgetInMillions%3E=200");
        assert_eq!(encode_fragment("runtimeInMinutes<160"), "runtimeInMinutes%3C160");
    }

    #[test]
    fn non_ascii_is_utf8_escaped() {
        assert_eq!(encode_fragment("name=Éowyn"), "name=%C3%89owyn");
    }

    #[test]
    fn header_lookup_ignores_case() {
        let response = HttpResponse {
            status: 200,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: String::new(),
        };
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("etag"), None);
    }

    #[test]
    fn every_literal_syntax_byte_survives() {
        let literal = "AZaz09-._~!$'()*,/:;=?@";
        assert_eq!(encode_fragment(literal), literal);
        assert_eq!(encode_fragment("a+b#c\"d"), "a%2Bb%23c%22d");
    }
}
