//! Per-fetch transcoding state.
//!
//! A [`Session`] is created when a gopher fetch starts and is fed the
//! response body chunk by chunk. Each call to [`Session::feed`] gives back a
//! [`Feed`], a lazy iterator of [`Event`] produced from the chunk.
//!
//! For menus (item types `1` and `7`) the events look like this:
//!
//! ```text
//!   feed(chunk) ──► Data(<html><head>…)       first non-empty chunk only
//!                   Data(<title>…<h1>…)       first non-empty chunk only
//!                   Data(row)                 one per complete menu line
//!                   …
//!   feed([])    ──► Data(row)                 unterminated last line, if any
//!                   Data(</div></body></html>)
//!                   End
//! ```
//!
//! Any other item type passes each chunk through as one `Data` event, and
//! the empty end-of-stream feed only produces `End`.
//!
//! ```
//! use std::sync::Arc;
//! use gophtml::{Config, Event, Session};
//!
//! let mut session = Session::open("gopher://example.org/1/", Arc::new(Config::default()));
//!
//! let mut html = Vec::new();
//!
//! for chunk in [&b"1Docs\t/docs\texa"[..], b"mple.org\t70\r\n.\r\n", b""] {
//!     for event in session.feed(chunk) {
//!         if let Event::Data(data) = event {
//!             html.extend_from_slice(&data);
//!         }
//!     }
//! }
//!
//! let html = String::from_utf8(html).unwrap();
//! assert!(html.contains("<a href=\"gopher://example.org/1/docs\">"));
//! assert!(html.ends_with("</div></body></html>"));
//! ```

use core::fmt;
use std::collections::TryReserveError;
use std::sync::Arc;

use http::header::CONTENT_TYPE;
use http::{HeaderName, HeaderValue, StatusCode};

use crate::item::{mime_from_extension, ItemType};
use crate::parser::parse_line;
use crate::render;
use crate::url::GopherUrl;
use crate::{Config, Error};

/// Output of a session.
#[derive(Clone, PartialEq, Eq)]
pub enum Event {
    /// Synthetic response header, only ever `Content-Type`.
    Header(HeaderName, HeaderValue),
    /// Body bytes. Might be empty for menu lines that render to nothing.
    Data(Vec<u8>),
    /// The body is complete.
    End,
}

impl Event {
    pub fn as_data(&self) -> Option<&[u8]> {
        match self {
            Event::Data(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Header(name, value) => write!(f, "Header({}: {:?})", name, value),
            Event::Data(v) => write!(f, "Data({:?})", String::from_utf8_lossy(v)),
            Event::End => write!(f, "End"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// Waiting for the first menu bytes before sending the document head.
    Top,
    /// Head sent, title block next.
    Title,
    Rows,
    Epilogue,
    End,
    /// Nothing more will be produced.
    Closed,
}

pub struct Session {
    config: Arc<Config>,
    raw_url: Arc<str>,
    url: Option<GopherUrl>,
    declared: Option<ItemType>,
    stage: Stage,
    header_sent: bool,
    ended: bool,
    status: Option<StatusCode>,
    degraded: Option<Error>,

    // Menu bytes not yet turned into rows. The first `consumed` bytes are
    // already parsed and are dropped on the next feed.
    carry: Vec<u8>,
    consumed: usize,
}

impl Session {
    /// Start a session for a gopher url.
    ///
    /// An unparseable url is not an error here, the session reports
    /// `400 Bad Request` from [`Session::status`] and ignores the body.
    pub fn open(url: impl Into<Arc<str>>, config: Arc<Config>) -> Self {
        let raw_url: Arc<str> = url.into();

        let url = match GopherUrl::parse(raw_url.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!("Unparseable gopher url ({}): {}", e, raw_url);
                None
            }
        };

        let declared = url.as_ref().map(|u| u.item_type());

        let stage = if declared.map(|d| d.needs_transcode()).unwrap_or(false) {
            Stage::Top
        } else {
            Stage::Rows
        };

        debug!("Open gopher session {:?}: {}", declared, raw_url);

        Session {
            config,
            raw_url,
            url,
            declared,
            stage,
            header_sent: false,
            ended: false,
            status: None,
            degraded: None,
            carry: Vec::new(),
            consumed: 0,
        }
    }

    pub fn url(&self) -> Option<&GopherUrl> {
        self.url.as_ref()
    }

    /// Item type from the url path, `None` if the url could not be parsed.
    pub fn declared_type(&self) -> Option<ItemType> {
        self.declared
    }

    /// Whether the html head and title have been produced.
    pub fn is_header_sent(&self) -> bool {
        self.header_sent
    }

    /// Whether the end-of-stream feed has been seen.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// The reason the session stopped producing output, if it did.
    pub fn degraded(&self) -> Option<&Error> {
        self.degraded.as_ref()
    }

    /// Bytes held back waiting for a line terminator.
    pub fn carried(&self) -> usize {
        self.carry.len() - self.consumed
    }

    fn transcodes(&self) -> bool {
        self.declared.map(|d| d.needs_transcode()).unwrap_or(false)
    }

    /// Synthetic `Content-Type` header for the resource, if known.
    pub fn probe(&self) -> Option<Event> {
        let declared = self.declared?;

        let mime = declared.mime().or_else(|| {
            if !self.config.is_guess_mime_from_extension() {
                return None;
            }
            self.url
                .as_ref()
                .and_then(|u| mime_from_extension(u.selector()))
        })?;

        debug!("Probed content type for {:?}: {}", declared, mime);

        Some(Event::Header(CONTENT_TYPE, HeaderValue::from_static(mime)))
    }

    /// Synthetic http status from the first bytes of the response.
    ///
    /// `None` means there is not enough to decide yet. Once decided the same
    /// status is returned for every following call.
    ///
    /// A menu starting with an error line that names the requested selector
    /// is a whole page error, `404 Not Found`. The body is still transcoded so
    /// the error shows up in the page.
    pub fn status(&mut self, first: &[u8]) -> Option<StatusCode> {
        if let Some(status) = self.status {
            return Some(status);
        }

        let status = match self.declared {
            None => StatusCode::BAD_REQUEST,
            Some(_) if first.is_empty() => return None,
            Some(declared) => {
                if declared.needs_transcode()
                    && first[0] == ItemType::Error.tag()
                    && self.is_error_for_url(first)
                {
                    debug!("Gopher server reports error for: {}", self.raw_url);
                    // Keep transcoding so the error is readable.
                    self.declared = Some(ItemType::Directory);
                    StatusCode::NOT_FOUND
                } else {
                    StatusCode::OK
                }
            }
        };

        self.status = Some(status);

        Some(status)
    }

    // 3 '/missing' does not exist\terror.host\t1
    fn is_error_for_url(&self, first: &[u8]) -> bool {
        let Some(url) = &self.url else {
            return false;
        };

        let end = first
            .iter()
            .position(|c| matches!(c, b'\r' | b'\n'))
            .unwrap_or(first.len());

        let mut fields = first[1..end].split(|c| *c == b'\t');
        let name = fields.next().unwrap_or_default();
        let selector = fields.next();

        let wanted = trim_slash(url.selector());

        selector
            .into_iter()
            .chain(quoted(name))
            .filter(|c| !c.is_empty())
            .any(|c| trim_slash(c) == wanted)
    }

    /// Feed the next chunk of the response. An empty chunk is end-of-stream.
    ///
    /// The events are produced as the returned [`Feed`] is iterated. Dropping
    /// it early loses nothing for menus, the remaining rows come out of the
    /// next feed.
    pub fn feed<'a>(&'a mut self, input: &'a [u8]) -> Feed<'a> {
        let eof = input.is_empty();

        if self.degraded.is_some() {
            if eof && !self.ended {
                // No epilogue, but the end is still signalled.
                self.ended = true;
                self.stage = Stage::End;
            }
            return Feed::new(self, eof, 0);
        }

        if self.ended {
            if !eof {
                warn!("Gopher data after end of stream: {} bytes", input.len());
            }
            // A repeated end-of-stream finishes what an earlier one left.
            return Feed::new(self, eof, 0);
        }

        if eof {
            debug!("End of gopher stream: {}", self.raw_url);
            self.ended = true;
            return Feed::new(self, true, 0);
        }

        let Some(declared) = self.declared else {
            trace!("Drop {} bytes for unparseable url", input.len());
            return Feed::new(self, false, input.len());
        };

        if !declared.needs_transcode() {
            let mut feed = Feed::new(self, false, input.len());
            feed.passthrough = Some(input);
            return feed;
        }

        self.take_chunk(input, Vec::try_reserve);

        Feed::new(self, false, input.len())
    }

    /// Append a menu chunk to the carry buffer, degrading the session if
    /// the buffer can't grow.
    fn take_chunk<F>(&mut self, input: &[u8], reserve: F)
    where
        F: FnOnce(&mut Vec<u8>, usize) -> Result<(), TryReserveError>,
    {
        if let Err(e) = self.append(input, reserve) {
            self.degrade(e);
        }
    }

    fn append<F>(&mut self, input: &[u8], reserve: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Vec<u8>, usize) -> Result<(), TryReserveError>,
    {
        if self.consumed > 0 {
            self.carry.drain(..self.consumed);
            self.consumed = 0;
        }

        reserve(&mut self.carry, input.len())?;
        self.carry.extend_from_slice(input);

        Ok(())
    }

    fn next_row(&mut self, eof: bool) -> Option<Vec<u8>> {
        let pending = &self.carry[self.consumed..];

        let Some((used, line)) = parse_line(pending, eof) else {
            let max = self.config.get_max_line_len();
            if !eof && pending.len() > max {
                self.degrade(Error::LineTooLong(max));
            }
            return None;
        };

        let row = render::render_line(&line, &self.config);
        self.consumed += used;

        Some(row)
    }

    fn degrade(&mut self, e: Error) {
        warn!("Gopher session degraded ({}): {}", e, self.raw_url);
        self.degraded = Some(e);
        self.stage = Stage::Closed;
        self.carry = Vec::new();
        self.consumed = 0;
    }

    fn title(&self) -> Vec<u8> {
        let path = self.url.as_ref().map(|u| u.path()).unwrap_or_default();
        render::title(path, &self.config)
    }

    /// End the session. Whatever is still carried is discarded.
    pub fn close(self) {
        if self.carried() > 0 {
            debug!(
                "Close gopher session with {} unparsed bytes: {}",
                self.carried(),
                self.raw_url
            );
        } else {
            debug!("Close gopher session: {}", self.raw_url);
        }
    }
}

fn trim_slash(v: &[u8]) -> &[u8] {
    v.strip_suffix(b"/").unwrap_or(v)
}

/// First span in single or double quotes.
fn quoted(name: &[u8]) -> Option<&[u8]> {
    let start = name.iter().position(|c| *c == b'\'' || *c == b'"')?;
    let quote = name[start];
    let rest = &name[start + 1..];
    let end = rest.iter().position(|c| *c == quote)?;
    Some(&rest[..end])
}

/// Events from one [`Session::feed`].
pub struct Feed<'a> {
    session: &'a mut Session,
    passthrough: Option<&'a [u8]>,
    eof: bool,
    accepted: usize,
}

impl<'a> Feed<'a> {
    fn new(session: &'a mut Session, eof: bool, accepted: usize) -> Self {
        Feed {
            session,
            passthrough: None,
            eof,
            accepted,
        }
    }

    /// Number of bytes of the chunk taken by the session.
    ///
    /// This is the whole chunk, except once the session is degraded or
    /// ended, when it is 0.
    pub fn accepted(&self) -> usize {
        self.accepted
    }
}

impl Iterator for Feed<'_> {
    type Item = Event;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(input) = self.passthrough.take() {
            return Some(Event::Data(input.to_vec()));
        }

        let s = &mut *self.session;

        loop {
            match s.stage {
                Stage::Top => {
                    if s.carried() == 0 {
                        if !self.eof {
                            return None;
                        }
                        // An empty menu gets no page.
                        s.stage = Stage::Epilogue;
                        continue;
                    }
                    s.stage = Stage::Title;
                    return Some(Event::Data(render::top(&s.config)));
                }

                Stage::Title => {
                    s.stage = Stage::Rows;
                    s.header_sent = true;
                    return Some(Event::Data(s.title()));
                }

                Stage::Rows => {
                    if s.transcodes() {
                        if let Some(row) = s.next_row(self.eof) {
                            return Some(Event::Data(row));
                        }
                        if s.stage == Stage::Closed {
                            return None;
                        }
                    }
                    if !self.eof {
                        return None;
                    }
                    s.stage = Stage::Epilogue;
                }

                Stage::Epilogue => {
                    s.stage = Stage::End;
                    if s.transcodes() && s.header_sent {
                        return Some(Event::Data(render::bottom(&s.config)));
                    }
                }

                Stage::End => {
                    s.stage = Stage::Closed;
                    return Some(Event::End);
                }

                Stage::Closed => return None,
            }
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("url", &self.raw_url)
            .field("declared", &self.declared)
            .field("stage", &self.stage)
            .field("header_sent", &self.header_sent)
            .field("carried", &self.carried())
            .field("degraded", &self.degraded)
            .finish()
    }
}

impl fmt::Debug for Feed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feed")
            .field("eof", &self.eof)
            .field("accepted", &self.accepted)
            .finish()
    }
}
