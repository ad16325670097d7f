//! Sans-IO streaming transcoder from gopher menus to html.
//!
//! Gopher (RFC 1436) serves menus as tab separated lines. Clients built
//! around http want a status code, a `Content-Type` and an html body. This
//! crate turns the raw bytes of a gopher response into that, chunk by chunk,
//! without ever owning a socket.
//!
//! * [`Session`] holds the state of one fetch. Feed it the response body as
//!   it arrives and iterate the [`Event`]s that come out.
//! * [`Session::probe`] and [`Session::status`] synthesize the `Content-Type`
//!   and the http status.
//! * [`fetch::Fetch`] drives a session from a fetcher's callbacks and pushes
//!   everything to a [`fetch::Sink`].
//!
//! Menus (item types `1` and `7`) are transcoded. Anything else passes
//! through unchanged.
//!
//! ```
//! use std::sync::Arc;
//! use gophtml::http::StatusCode;
//! use gophtml::{Config, Event, Session};
//!
//! let mut session = Session::open("gopher://example.org/1/", Arc::new(Config::default()));
//!
//! const MENU: &[u8] = b"1Docs\t/docs\texample.org\t70\r\n.\r\n";
//!
//! assert!(matches!(session.probe(), Some(Event::Header(_, _))));
//! assert_eq!(session.status(MENU), Some(StatusCode::OK));
//!
//! let events: Vec<Event> = session.feed(MENU).collect();
//!
//! // Document head, title block, one row per line.
//! assert_eq!(events.len(), 4);
//! assert_eq!(
//!     events[2].as_data().unwrap(),
//!     b"<a href=\"gopher://example.org/1/docs\"><span class=\"dir\">Docs</span></a><br/>"
//! );
//!
//! // End of stream closes the document.
//! let events: Vec<Event> = session.feed(&[]).collect();
//! assert_eq!(events[0].as_data().unwrap(), b"</div></body></html>");
//! assert_eq!(events[1], Event::End);
//! ```

#[macro_use]
extern crate log;

// Re-export the basis for this library.
pub use http;

mod error;
pub use error::Error;

mod config;
pub use config::{Config, DEFAULT_MAX_LINE_LEN};

mod item;
pub use item::{mime_for, mime_from_extension, needs_transcode, ItemType};

mod out;

mod parser;

mod render;

pub mod url;
pub use url::GopherUrl;

mod session;
pub use session::{Event, Feed, Session};

pub mod fetch;

#[cfg(test)]
mod test;
