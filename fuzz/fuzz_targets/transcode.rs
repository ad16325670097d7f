#![no_main]

use std::sync::Arc;

use gophtml::{Config, Event, Session};
use libfuzzer_sys::fuzz_target;

// First byte picks the chunk size, the rest is the response body.
fuzz_target!(|data: &[u8]| {
    let Some((size, body)) = data.split_first() else {
        return;
    };
    let size = (*size as usize).max(1);

    let config = Config::new().inline_images(true).max_line_len(512);
    let mut session = Session::open("gopher://example.org/1/", Arc::new(config));

    let _ = session.status(body);

    let mut ends = 0;
    for chunk in body.chunks(size) {
        for event in session.feed(chunk) {
            if event == Event::End {
                ends += 1;
            }
        }
    }
    for event in session.feed(&[]) {
        if event == Event::End {
            ends += 1;
        }
    }

    assert_eq!(ends, 1);
});
