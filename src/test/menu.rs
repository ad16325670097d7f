use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};

use super::scenario::Scenario;
use super::TestSliceExt;
use crate::{Config, Event};

const MENU: &[u8] = b"\
    1Docs\t/docs\texample.org\t70\r\n\
    0README\t/README\texample.org\t70\r\n\
    .\r\n";

const DOCS: &str = "<a href=\"gopher://example.org/1/docs\"><span class=\"dir\">Docs</span></a><br/>";
const README: &str =
    "<a href=\"gopher://example.org/0/README\"><span class=\"text\">README</span></a><br/>";

#[test]
fn simple_menu() {
    let scenario = Scenario::builder().input(MENU).build();
    let outcome = scenario.run();

    assert_eq!(
        outcome.header,
        Some(Event::Header(
            CONTENT_TYPE,
            HeaderValue::from_static("text/html;charset=UTF-8")
        ))
    );
    assert_eq!(outcome.status, Some(StatusCode::OK));

    let data = outcome.data();
    assert_eq!(data.len(), 6);

    assert!(data[0].as_str().starts_with("<html><head>"));
    assert!(data[0]
        .as_str()
        .contains("<link rel=\"stylesheet\" type=\"text/css\" href=\"resource:internal.css\">"));
    assert!(data[1].as_str().contains("<title>Index of /1/</title>"));
    assert!(data[1].as_str().contains("<h1>/1/</h1>"));
    assert_eq!(data[2].as_str(), DOCS);
    assert_eq!(data[3].as_str(), README);
    assert_eq!(data[4].as_str(), "");
    assert_eq!(data[5].as_str(), "</div></body></html>");

    assert!(outcome.ends_once());
    assert!(outcome.session.is_header_sent());
}

#[test]
fn split_after_type_and_name() {
    let whole = Scenario::builder().input(MENU).build().run();
    let split = Scenario::builder().input(MENU).cut(5).build().run();

    assert_eq!(whole.events, split.events);
}

#[test]
fn split_at_every_byte() {
    let whole = Scenario::builder().input(MENU).build().run();

    let mut builder = Scenario::builder().input(MENU);
    for i in 1..MENU.len() {
        builder = builder.cut(i);
    }
    let split = builder.build().run();

    assert_eq!(split.data().len(), 6);
    assert_eq!(whole.events, split.events);
}

#[test]
fn split_between_cr_and_lf() {
    // The cut leaves "...70\r" in the first chunk.
    let at = MENU.iter().position(|c| *c == b'\n').unwrap();
    let split = Scenario::builder().input(MENU).cut(at).build().run();

    assert_eq!(split.data()[2].as_str(), DOCS);
    assert_eq!(split.data()[3].as_str(), README);
}

#[test]
fn unterminated_last_line() {
    let outcome = Scenario::builder()
        .input(b"iHello\t\th\t70\r\niBye\t\th\t70")
        .build()
        .run();

    let data = outcome.data();
    assert_eq!(data.len(), 5);
    assert_eq!(data[3].as_str(), "<span class=\"info\">Bye</span><br/>");
    assert_eq!(data[4].as_str(), "</div></body></html>");
}

#[test]
fn lines_after_sentinel_are_rendered() {
    let outcome = Scenario::builder()
        .input(b".\r\niLate\t\th\t70\r\n")
        .build()
        .run();

    assert!(outcome
        .html()
        .contains("<span class=\"info\">Late</span><br/>"));
}

#[test]
fn lf_only_menu() {
    let outcome = Scenario::builder()
        .input(b"iOne\t\th\t70\niTwo\t\th\t70\n")
        .build()
        .run();

    assert_eq!(outcome.data().len(), 5);
}

#[test]
fn empty_body() {
    let outcome = Scenario::builder().build().run();

    assert_eq!(outcome.status, None);
    assert_eq!(outcome.events, vec![Event::End]);
    assert!(!outcome.session.is_header_sent());
}

#[test]
fn epilogue_once() {
    let mut outcome = Scenario::builder().input(MENU).build().run();

    assert!(outcome.session.feed(&[]).next().is_none());
    assert!(outcome.session.feed(&[]).next().is_none());
}

#[test]
fn line_breaks_between_fragments() {
    let config = Config::new().line_breaks(true);
    let outcome = Scenario::builder().input(MENU).config(config).build().run();

    let html = outcome.html();
    assert!(html.contains(&format!("{}\n{}\n", DOCS, README)));
    assert!(html.ends_with("</div></body></html>\n"));
}

#[test]
fn custom_page_frame() {
    let config = Config::new()
        .stylesheet("/gopher.css")
        .icon("/dir.png")
        .title_prefix("Menu ");
    let outcome = Scenario::builder()
        .url("gopher://example.org/1/a%20b")
        .input(MENU)
        .config(config)
        .build()
        .run();

    let html = outcome.html();
    assert!(html.contains("href=\"/gopher.css\""));
    assert!(html.contains("href=\"/dir.png\""));
    assert!(html.contains("<title>Menu /1/a b</title>"));
}

#[test]
fn search_results_are_a_menu() {
    let outcome = Scenario::builder()
        .url("gopher://example.org/7/search?gopher")
        .input(MENU)
        .build()
        .run();

    assert_eq!(outcome.data().len(), 6);
    assert!(outcome.html().contains(DOCS));
}
