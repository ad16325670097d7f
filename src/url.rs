//! Gopher urls, RFC 4266.
//!
//! `gopher://<host>[:<port>]/<type><selector>[?<query>]`

use core::fmt;
use core::ops::Deref;
use std::sync::Arc;

use percent_encoding::percent_decode_str;

use crate::item::ItemType;
use crate::Error;

/// Port used when the url has none.
pub const DEFAULT_PORT: u16 = 70;

#[derive(Clone, PartialEq, Eq)]
pub struct GopherUrl {
    buffer: Arc<str>,

    // Components
    host_start: usize,
    host_end: usize,
    port: Option<u16>,
    path_start: usize,             // Before initial '/', if any
    query_start: Option<usize>,    // Before '?'
    fragment_start: Option<usize>, // Before '#'

    // Percent decoded path.
    path: Vec<u8>,
}

impl GopherUrl {
    pub fn parse(s: impl Into<Arc<str>>) -> Result<Self, Error> {
        let buffer: Arc<str> = s.into();
        let s = &*buffer;

        // x://a
        if s.len() < 5 {
            return Err(Error::TooShort);
        }

        let scheme_end = s.find("://").ok_or(Error::MissingScheme)?;
        let scheme = &s[..scheme_end];
        if !scheme.eq_ignore_ascii_case("gopher") {
            return Err(Error::NotGopher(scheme.to_string()));
        }

        let scheme_end_and_delimiter = scheme_end + 3;
        // All indexes are relative to _after_ :// and adjusted at the end.
        let x = &s[scheme_end_and_delimiter..];

        let (query_start, fragment_start) = (x.find('?'), x.find('#'));

        let query_or_fragment = match (query_start, fragment_start) {
            (None, None) => None,
            (None, Some(m)) => Some(m),
            (Some(n), None) => Some(n),
            (Some(n), Some(m)) => {
                if m < n {
                    return Err(Error::FragmentBeforeQuery);
                }
                Some(n)
            }
        };

        // A '/' after '?' or '#' belongs to the query or fragment.
        let path_start = match (x.find('/'), query_or_fragment) {
            (Some(p), Some(qf)) => p.min(qf),
            (p, qf) => p.or(qf).unwrap_or(x.len()),
        };

        let authority = &x[..path_start];

        // [::1]:7070
        let port_start = if authority.starts_with('[') {
            authority
                .find(']')
                .and_then(|n| authority[n..].find(':').map(|m| n + m))
        } else {
            authority.rfind(':')
        };
        let host_end = port_start.unwrap_or(path_start);

        if host_end == 0 {
            return Err(Error::MissingHost);
        }

        let mut port = None;

        if let Some(port_start) = port_start {
            let port_str = &authority[(port_start + 1)..];
            // gopher://host:/1 is a valid way of saying the default port.
            if !port_str.is_empty() {
                let p: u16 = port_str.parse().map_err(|_| Error::PortNotANumber)?;
                port = Some(p);
            }
        }

        let path_end = query_or_fragment.unwrap_or(x.len());
        let path = percent_decode_str(&x[path_start..path_end]).collect();

        let adjust = |n: usize| n + scheme_end_and_delimiter;

        Ok(GopherUrl {
            host_start: adjust(0),
            host_end: adjust(host_end),
            port,
            path_start: adjust(path_start),
            query_start: query_start.map(adjust),
            fragment_start: fragment_start.map(adjust),
            path,
            buffer,
        })
    }

    pub fn host(&self) -> &str {
        &self.buffer[self.host_start..self.host_end]
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// The path as it appears in the url, still percent encoded.
    pub fn pathname(&self) -> &str {
        let end = self
            .query_start
            .or(self.fragment_start)
            .unwrap_or(self.buffer.len());

        &self.buffer[self.path_start..end]
    }

    /// Percent decoded path including the leading `/` and item type.
    pub fn path(&self) -> &[u8] {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        let start = self.query_start? + 1;
        let end = self.fragment_start.unwrap_or(self.buffer.len());
        Some(&self.buffer[start..end])
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment_start.map(|s| &self.buffer[s + 1..])
    }

    /// The item type encoded as the first path byte.
    ///
    /// An empty path is the server's root menu.
    pub fn item_type(&self) -> ItemType {
        match self.path.get(1) {
            Some(b) => ItemType::from(*b),
            None => ItemType::Directory,
        }
    }

    /// Percent decoded selector, the path after the item type.
    pub fn selector(&self) -> &[u8] {
        self.path.get(2..).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

impl TryFrom<&str> for GopherUrl {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl fmt::Display for GopherUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.buffer)
    }
}

impl fmt::Debug for GopherUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GopherUrl").field(&&*self.buffer).finish()
    }
}

impl Deref for GopherUrl {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.buffer
    }
}
