//! Html fragments for menu lines and the page around them.

use crate::item::{mime_from_extension, ItemType};
use crate::out::Out;
use crate::parser::Line;
use crate::Config;

const GOPHER_PORT: &[u8] = b"70";
const TELNET_PORT: &[u8] = b"23";
const CSO_PORT: &[u8] = b"105";

/// Render one menu line.
///
/// Lines that produce nothing (`.` and `+`) give an empty vec.
pub(crate) fn render_line(line: &Line<'_>, config: &Config) -> Vec<u8> {
    use ItemType::*;

    let mut out = Out::new();
    let item_type = line.item_type();

    match item_type {
        EndOfPage => {
            trace!("End of gopher menu");
        }
        DuplicateServer => {
            trace!("Ignore redundant server line");
        }
        Text => link(&mut out, line, "text"),
        Directory => link(&mut out, line, "dir"),
        BinHex | BinArchive | UuEncoded | Binary => link(&mut out, line, "binary"),
        PdfAlt | Pdf => link(&mut out, line, "other"),
        Error => {
            out.str("<span class=\"error\">")
                .text(line.name())
                .str("</span><br/>");
        }
        Query => search(&mut out, line),
        Telnet => remote(&mut out, line, "telnet"),
        Tn3270 => remote(&mut out, line, "tn3270"),
        CsoSearch => {
            out.str("<a href=\"cso://").attr(line.host());
            port(&mut out, line.port(), CSO_PORT);
            out.str("\">");
            label(&mut out, line, "cso");
            out.str("</a><br/>");
        }
        Gif | Image | Png | Bitmap => image(&mut out, line, config),
        Html => html(&mut out, line),
        Info => {
            if line.selector() == b"TITLE" {
                out.str("<h2>").text(line.name()).str("</h2>");
            } else {
                out.str("<span class=\"info\">")
                    .text(line.name())
                    .str("</span><br/>");
            }
        }
        Sound => media(&mut out, line, "audio"),
        Movie => {
            let video = mime_from_extension(line.selector())
                .map(|m| m.starts_with("video/"))
                .unwrap_or(false);
            media(&mut out, line, if video { "video" } else { "audio" });
        }
        Mime | Calendar | Event | Mbox => {
            debug!("Gopher item without rendering: {:?}", item_type);
            link(&mut out, line, "unknown");
        }
        Unknown(_) => {
            warn!("Unknown gopher item type: {:?}", item_type);
            link(&mut out, line, "unknown");
        }
    }

    if config.is_line_breaks() && !out.is_empty() {
        out.str("\n");
    }

    out.flush()
}

/// `<a href="gopher://..."><span class="CLASS">NAME</span></a><br/>`
fn link(out: &mut Out, line: &Line<'_>, class: &str) {
    out.str("<a href=\"");
    gopher_href(out, line);
    out.str("\">");
    label(out, line, class);
    out.str("</a><br/>");
}

fn label(out: &mut Out, line: &Line<'_>, class: &str) {
    out.markup(format_args!("<span class=\"{}\">", class))
        .text(line.name())
        .str("</span>");
}

fn gopher_href(out: &mut Out, line: &Line<'_>) {
    out.str("gopher://").attr(line.host());
    port(out, line.port(), GOPHER_PORT);
    out.str("/")
        .attr(&[line.item_type().tag()])
        .attr(line.selector());
}

/// `:PORT` unless empty or the default for the scheme.
fn port(out: &mut Out, port: &[u8], default: &[u8]) {
    if !port.is_empty() && port != default {
        out.str(":").attr(port);
    }
}

fn search(out: &mut Out, line: &Line<'_>) {
    out.str("<form method=\"get\" action=\"");
    gopher_href(out, line);
    out.str("\"><span class=\"query\"><label>")
        .text(line.name())
        .str(" <input name=\"\" type=\"text\"/></label></span></form><br/>");
}

/// Telnet and tn3270 sessions. What follows the last `/` of the selector,
/// if there is one, is the user to log in as.
fn remote(out: &mut Out, line: &Line<'_>, scheme: &str) {
    let selector = line.selector();
    let user = selector
        .iter()
        .rposition(|c| *c == b'/')
        .map(|i| &selector[i + 1..])
        .filter(|u| !u.is_empty());

    out.markup(format_args!("<a href=\"{}://", scheme));
    if let Some(user) = user {
        out.attr(user).str("@");
    }
    out.attr(line.host());
    port(out, line.port(), TELNET_PORT);
    out.str("\">");
    label(out, line, "telnet");
    out.str("</a><br/>");
}

fn image(out: &mut Out, line: &Line<'_>, config: &Config) {
    out.str("<a href=\"");
    gopher_href(out, line);
    out.str("\"><span class=\"img\">").text(line.name());

    if config.is_inline_images() {
        out.str(" <img src=\"");
        gopher_href(out, line);
        out.str("\" alt=\"").attr(line.name()).str("\"/>");
    }

    out.str("</span></a><br/>");
}

fn html(out: &mut Out, line: &Line<'_>) {
    let selector = line.selector();
    let external = selector
        .strip_prefix(b"URL:")
        .or_else(|| selector.strip_prefix(b"/URL:"));

    let Some(href) = external else {
        link(out, line, "html");
        return;
    };

    out.str("<a href=\"").attr(href).str("\">");
    label(out, line, "html");
    out.str("</a><br/>");
}

fn media(out: &mut Out, line: &Line<'_>, kind: &str) {
    link(out, line, kind);
    out.markup(format_args!("<{} controls src=\"", kind));
    gopher_href(out, line);
    out.markup(format_args!("\"></{}>", kind));
}

/// Document head up to the icon link.
pub(crate) fn top(config: &Config) -> Vec<u8> {
    let mut out = Out::new();

    out.str("<html><head>\n")
        .str("<meta http-equiv=\"Content-Type\" content=\"text/html; charset=UTF-8\"/>\n")
        .str("<link rel=\"stylesheet\" type=\"text/css\" href=\"")
        .attr(config.get_stylesheet().as_bytes())
        .str("\">\n")
        .str("<link rel=\"icon\" type=\"image/png\" href=\"")
        .attr(config.get_icon().as_bytes())
        .str("\">\n");

    out.flush()
}

/// Title, navigation and heading. Opens the menu container closed by
/// [`bottom`].
pub(crate) fn title(path: &[u8], config: &Config) -> Vec<u8> {
    let mut out = Out::new();

    out.str("<title>")
        .text(config.get_title_prefix().as_bytes())
        .text(path)
        .str("</title>\n")
        .str("</head><body id=\"gopher\">\n")
        .str("<div class=\"uplink dontprint\"><a href=\"..\">[up]</a><a href=\"/\">[top]</a></div>\n")
        .str("<h1>")
        .text(path)
        .str("</h1>\n")
        .str("<div id=\"menu\">");

    if config.is_line_breaks() {
        out.str("\n");
    }

    out.flush()
}

pub(crate) fn bottom(config: &Config) -> Vec<u8> {
    let mut out = Out::new();
    out.str("</div></body></html>");
    if config.is_line_breaks() {
        out.str("\n");
    }
    out.flush()
}
