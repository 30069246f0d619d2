use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static IPV4: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[0-9]{1,3}\.){3}[0-9]{1,3}$").expect("ipv4 pattern is valid")
});

/// Drops every character that is not an ASCII digit or a dot.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Dotted-quad grammar check only: `999.999.999.999` is accepted.
pub fn is_valid_ipv4(candidate: &str) -> bool {
    IPV4.is_match(candidate)
}

/// An address that passed [`is_valid_ipv4`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address(String);

impl Address {
    pub fn parse(candidate: &str) -> Option<Self> {
        if is_valid_ipv4(candidate) {
            Some(Self(candidate.to_owned()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
