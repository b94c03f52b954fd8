//! HTTP digest access authentication (RFC 7616, MD5 family).
//!
//! The Atlas admin API authenticates programmatic API keys with digest
//! authentication: the first request is answered `401` with a
//! `WWW-Authenticate: Digest ...` challenge, and the request is repeated
//! with an `Authorization` header derived from it.

use md5::{Digest, Md5};

use atlas_pauser_core::{PauserError, Result};

/// A parsed `WWW-Authenticate: Digest` challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestChallenge {
    /// Protection space.
    pub realm: String,
    /// Server nonce.
    pub nonce: String,
    /// Opaque value to echo back, if any.
    pub opaque: Option<String>,
    /// Offered quality-of-protection values.
    pub qop: Vec<String>,
    /// Hash algorithm, `MD5` when absent.
    pub algorithm: Option<String>,
}

impl DigestChallenge {
    /// Parse a `WWW-Authenticate` header value.
    ///
    /// Returns `None` if the value is not a digest challenge or lacks a
    /// realm or nonce.
    #[must_use]
    pub fn parse(header: &str) -> Option<Self> {
        let header = header.trim();
        let (scheme, params) = header.split_once(char::is_whitespace)?;
        if !scheme.eq_ignore_ascii_case("digest") {
            return None;
        }

        let mut realm = None;
        let mut nonce = None;
        let mut opaque = None;
        let mut qop = Vec::new();
        let mut algorithm = None;

        for (key, value) in split_params(params) {
            match key.to_ascii_lowercase().as_str() {
                "realm" => realm = Some(value),
                "nonce" => nonce = Some(value),
                "opaque" => opaque = Some(value),
                "qop" => {
                    qop = value
                        .split(',')
                        .map(|q| q.trim().to_string())
                        .filter(|q| !q.is_empty())
                        .collect();
                }
                "algorithm" => algorithm = Some(value),
                _ => {}
            }
        }

        Some(Self {
            realm: realm?,
            nonce: nonce?,
            opaque,
            qop,
            algorithm,
        })
    }

    /// Compute the `Authorization` header value answering this challenge.
    ///
    /// # Errors
    ///
    /// Returns `PauserError::Remote` if the server asks for an algorithm or
    /// quality of protection other than `MD5`/`MD5-sess` and `auth`.
    pub fn authorization(
        &self,
        username: &str,
        password: &str,
        method: &str,
        uri: &str,
        nonce_count: u32,
        cnonce: &str,
    ) -> Result<String> {
        let sess = match self.algorithm.as_deref() {
            None => false,
            Some(a) if a.eq_ignore_ascii_case("md5") => false,
            Some(a) if a.eq_ignore_ascii_case("md5-sess") => true,
            Some(other) => {
                return Err(PauserError::remote(
                    None,
                    format!("unsupported digest algorithm: {other}"),
                ))
            }
        };

        let qop_auth = if self.qop.is_empty() {
            false
        } else if self.qop.iter().any(|q| q.eq_ignore_ascii_case("auth")) {
            true
        } else {
            return Err(PauserError::remote(
                None,
                format!("unsupported digest qop: {}", self.qop.join(",")),
            ));
        };

        let mut ha1 = md5_hex(&format!("{username}:{}:{password}", self.realm));
        if sess {
            ha1 = md5_hex(&format!("{ha1}:{}:{cnonce}", self.nonce));
        }
        let ha2 = md5_hex(&format!("{method}:{uri}"));
        let nc = format!("{nonce_count:08x}");

        let response = if qop_auth {
            md5_hex(&format!("{ha1}:{}:{nc}:{cnonce}:auth:{ha2}", self.nonce))
        } else {
            md5_hex(&format!("{ha1}:{}:{ha2}", self.nonce))
        };

        let mut header = format!(
            r#"Digest username="{username}", realm="{}", nonce="{}", uri="{uri}", response="{response}""#,
            self.realm, self.nonce
        );
        if let Some(algorithm) = &self.algorithm {
            header.push_str(&format!(", algorithm={algorithm}"));
        }
        if let Some(opaque) = &self.opaque {
            header.push_str(&format!(r#", opaque="{opaque}""#));
        }
        if qop_auth {
            header.push_str(&format!(r#", qop=auth, nc={nc}, cnonce="{cnonce}""#));
        }

        Ok(header)
    }
}

fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}

/// Split `key=value, key="quoted, value"` into pairs.
fn split_params(params: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut rest = params.trim();

    while !rest.is_empty() {
        let Some(eq) = rest.find('=') else { break };
        let key = rest[..eq].trim().trim_start_matches(',').trim().to_string();
        rest = rest[eq + 1..].trim_start();

        let value = if let Some(quoted) = rest.strip_prefix('"') {
            let mut value = String::new();
            let mut chars = quoted.char_indices();
            let mut end = quoted.len();
            while let Some((i, c)) = chars.next() {
                match c {
                    '\\' => {
                        if let Some((_, escaped)) = chars.next() {
                            value.push(escaped);
                        }
                    }
                    '"' => {
                        end = i + 1;
                        break;
                    }
                    _ => value.push(c),
                }
            }
            rest = &quoted[end.min(quoted.len())..];
            value
        } else {
            let end = rest.find(',').unwrap_or(rest.len());
            let value = rest[..end].trim().to_string();
            rest = &rest[end..];
            value
        };

        rest = rest.trim_start().trim_start_matches(',').trim_start();
        pairs.push((key, value));
    }

    pairs
}
