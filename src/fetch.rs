//! Glue between a streaming fetcher and a [`Session`].
//!
//! Fetchers built around http expect a status, a header stream and a body.
//! [`Fetch`] drives a session from the fetcher's progress callbacks and
//! hands everything to a [`Sink`].

use std::sync::Arc;

use http::{HeaderName, HeaderValue, StatusCode};

use crate::session::{Event, Session};
use crate::Config;

/// What [`Sink::emit`] is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// One header line, `Name: value\r\n`.
    Header,
    /// Body bytes.
    Data,
}

/// Receiver of the transcoded response.
pub trait Sink {
    fn emit(&mut self, kind: Kind, bytes: &[u8]);

    fn http_code(&mut self, code: StatusCode);

    /// The body is complete.
    fn finished(&mut self) {}
}

/// A gopher fetch in progress.
#[derive(Debug)]
pub struct Fetch<S> {
    session: Session,
    sink: S,
    status_sent: bool,
}

impl<S: Sink> Fetch<S> {
    pub fn new(url: impl Into<Arc<str>>, config: Arc<Config>, sink: S) -> Self {
        Fetch {
            session: Session::open(url, config),
            sink,
            status_sent: false,
        }
    }

    /// Connection to the gopher server is established.
    pub fn connected(&mut self) {
        if let Some(event) = self.session.probe() {
            deliver(&mut self.sink, event);
        }

        // A broken url is known before any bytes arrive.
        if self.session.declared_type().is_none() {
            self.report_status(&[]);
        }
    }

    /// Bytes received from the server. Returns how many were accepted.
    ///
    /// An empty slice is the same as [`Fetch::done`].
    pub fn data(&mut self, input: &[u8]) -> usize {
        if input.is_empty() {
            self.done();
            return 0;
        }

        if !self.status_sent {
            self.report_status(input);
        }

        let sink = &mut self.sink;
        let mut feed = self.session.feed(input);

        for event in &mut feed {
            deliver(sink, event);
        }

        feed.accepted()
    }

    /// The server closed the connection.
    pub fn done(&mut self) {
        if !self.status_sent {
            self.report_status(&[]);
        }

        let sink = &mut self.sink;
        for event in self.session.feed(&[]) {
            deliver(sink, event);
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// End the fetch, also when aborted, and get the sink back.
    pub fn close(self) -> S {
        self.session.close();
        self.sink
    }

    fn report_status(&mut self, first: &[u8]) {
        if let Some(code) = self.session.status(first) {
            trace!("Report gopher status: {}", code);
            self.sink.http_code(code);
            self.status_sent = true;
        }
    }
}

fn deliver<S: Sink>(sink: &mut S, event: Event) {
    match event {
        Event::Header(name, value) => {
            sink.emit(Kind::Header, &header_line(&name, &value));
        }
        Event::Data(v) => sink.emit(Kind::Data, &v),
        Event::End => sink.finished(),
    }
}

/// `Content-Type: text/html\r\n`
fn header_line(name: &HeaderName, value: &HeaderValue) -> Vec<u8> {
    let mut line = Vec::new();

    let mut upper = true;
    for c in name.as_str().bytes() {
        line.push(if upper { c.to_ascii_uppercase() } else { c });
        upper = c == b'-';
    }

    line.extend_from_slice(b": ");
    line.extend_from_slice(value.as_bytes());
    line.extend_from_slice(b"\r\n");

    line
}

#[cfg(test)]
mod test {
    use super::*;
    use http::header::CONTENT_TYPE;

    #[derive(Debug, Default)]
    struct Recorder {
        headers: Vec<String>,
        body: Vec<u8>,
        codes: Vec<StatusCode>,
        finished: usize,
    }

    impl Sink for Recorder {
        fn emit(&mut self, kind: Kind, bytes: &[u8]) {
            match kind {
                Kind::Header => self
                    .headers
                    .push(String::from_utf8(bytes.to_vec()).unwrap()),
                Kind::Data => self.body.extend_from_slice(bytes),
            }
        }

        fn http_code(&mut self, code: StatusCode) {
            self.codes.push(code);
        }

        fn finished(&mut self) {
            self.finished += 1;
        }
    }

    fn fetch(url: &str) -> Fetch<Recorder> {
        Fetch::new(url, Arc::new(Config::default()), Recorder::default())
    }

    #[test]
    fn header_line_is_title_case() {
        let line = header_line(&CONTENT_TYPE, &HeaderValue::from_static("text/plain"));
        assert_eq!(line, b"Content-Type: text/plain\r\n");
    }

    #[test]
    fn fetch_menu() {
        let mut f = fetch("gopher://example.org/1/");
        f.connected();
        assert_eq!(f.data(b"iHello\t\texample.org\t70\r\n"), 24);
        f.done();

        let r = f.close();
        assert_eq!(r.headers, vec!["Content-Type: text/html;charset=UTF-8\r\n"]);
        assert_eq!(r.codes, vec![StatusCode::OK]);
        assert_eq!(r.finished, 1);

        let body = String::from_utf8(r.body).unwrap();
        assert!(body.starts_with("<html><head>"));
        assert!(body.contains("<span class=\"info\">Hello</span><br/>"));
        assert!(body.ends_with("</div></body></html>"));
    }

    #[test]
    fn fetch_passthrough() {
        let mut f = fetch("gopher://example.org/9/blob.bin");
        f.connected();
        assert_eq!(f.data(b"\x00\x01\x02"), 3);
        assert_eq!(f.data(b"\x03"), 1);
        f.done();

        let r = f.close();
        assert!(r.headers.is_empty());
        assert_eq!(r.codes, vec![StatusCode::OK]);
        assert_eq!(r.body, b"\x00\x01\x02\x03");
        assert_eq!(r.finished, 1);
    }

    #[test]
    fn fetch_bad_url() {
        let mut f = fetch("gopher://");
        f.connected();
        assert_eq!(f.sink().codes, vec![StatusCode::BAD_REQUEST]);
        assert_eq!(f.data(b"ignored"), 7);
        f.done();

        let r = f.close();
        assert_eq!(r.codes, vec![StatusCode::BAD_REQUEST]);
        assert!(r.body.is_empty());
    }

    #[test]
    fn fetch_degraded_still_finishes() {
        let config = Config::new().max_line_len(4);
        let mut f = Fetch::new("gopher://example.org/1/", Arc::new(config), Recorder::default());
        f.connected();
        assert_eq!(f.data(b"iNo end in sight"), 16);
        assert_eq!(f.data(b"more"), 0);
        f.done();

        let r = f.close();
        assert_eq!(r.finished, 1);
        assert!(!String::from_utf8(r.body).unwrap().contains("</html>"));
    }

    #[test]
    fn fetch_empty_response() {
        let mut f = fetch("gopher://example.org/0/empty");
        f.connected();
        f.done();
        f.done();

        let r = f.close();
        assert_eq!(r.headers, vec!["Content-Type: text/plain\r\n"]);
        // Nothing to decide on.
        assert!(r.codes.is_empty());
        assert_eq!(r.finished, 1);
    }
}
