//! Charset-tolerant XML decoding.
//!
//! The API has been seen declaring encodings other than UTF-8 in its XML
//! prologue. The declared encoding is honoured (a byte order mark wins over
//! the declaration), the body is transcoded to UTF-8, and only then handed
//! to the deserializer.

use std::borrow::Cow;
use std::ops::Range;

use encoding_rs::{Encoding, UTF_8};
use quick_xml::de::DeError;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use serde::de::DeserializeOwned;

use crate::error::DecodeError;

/// How far into the body to look for the XML declaration.
const PROLOGUE_SCAN: usize = 256;

/// Decode a response body into a wire shape.
pub fn decode_xml<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    let text = transcode(body)?;
    let text = protect_text(&text)?;
    Ok(quick_xml::de::from_str(&text)?)
}

/// Convert `body` to UTF-8 according to its declared encoding.
fn transcode(body: &[u8]) -> Result<Cow<'_, str>, DecodeError> {
    let encoding = match declared_encoding(body) {
        Some(label) => Encoding::for_label(label.as_bytes())
            .ok_or_else(|| DecodeError::Charset(label.to_string()))?,
        None => UTF_8,
    };
    let (text, _, _) = encoding.decode(body);
    Ok(text)
}

/// Rewrite element text so the deserializer reproduces it verbatim.
fn protect_text(xml: &str) -> Result<String, DecodeError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::with_capacity(xml.len());
    let mut copied = 0;
    let mut after_start = false;
    // Text right after a start tag; it is a leaf's value if an end tag follows.
    let mut pending: Option<Range<usize>> = None;

    loop {
        let start = offset(&reader, xml);
        let event = reader.read_event().map_err(DeError::from)?;
        let end = offset(&reader, xml);

        if let Some(span) = pending.take() {
            let leaf = matches!(event, Event::End(_));
            splice(&mut out, &mut copied, xml, span, leaf);
        }

        match event {
            Event::Text(_) if after_start => pending = Some(start..end),
            Event::Text(_) => splice(&mut out, &mut copied, xml, start..end, false),
            Event::Eof => break,
            _ => {}
        }
        after_start = matches!(event, Event::Start(_));
    }

    out.push_str(&xml[copied..]);
    Ok(out)
}

fn offset(reader: &Reader<&[u8]>, xml: &str) -> usize {
    usize::try_from(reader.buffer_position()).map_or(xml.len(), |pos| pos.min(xml.len()))
}

/// Append everything up to `span`, then the escaped text of `span`.
fn splice(out: &mut String, copied: &mut usize, xml: &str, span: Range<usize>, leaf: bool) {
    out.push_str(&xml[*copied..span.start]);
    out.push_str(&escape_text(&xml[span.clone()], leaf));
    *copied = span.end;
}

/// Escape stray `&`, and for leaf text with content the leading and trailing
/// whitespace.
fn escape_text(text: &str, leaf: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        if c == '&' && !starts_reference(&text[i..]) {
            escaped.push_str("&amp;");
        } else {
            escaped.push(c);
        }
    }
    if !leaf {
        return escaped;
    }

    // Whitespace-only text is layout inside an empty container.
    let body = escaped.trim_matches(is_xml_space);
    if body.is_empty() {
        return escaped;
    }
    let lead = escaped.len() - escaped.trim_start_matches(is_xml_space).len();
    let tail = escaped.len() - escaped.trim_end_matches(is_xml_space).len();

    let mut out = String::with_capacity(escaped.len() + 5 * (lead + tail));
    out.extend(escaped[..lead].chars().map(char_ref));
    out.push_str(body);
    out.extend(escaped[escaped.len() - tail..].chars().map(char_ref));
    out
}

fn is_xml_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn char_ref(c: char) -> String {
    format!("&#{};", u32::from(c))
}

/// Whether `s` (starting at `&`) begins a reference the deserializer resolves.
fn starts_reference(s: &str) -> bool {
    let Some(close) = s.find(';') else {
        return false;
    };
    let name = &s[1..close];
    match name.strip_prefix('#') {
        Some(num) => {
            let (digits, radix) = match num.strip_prefix('x') {
                Some(hex) => (hex, 16),
                None => (num, 10),
            };
            !digits.is_empty()
                && digits.chars().all(|c| c.is_digit(radix))
                && u32::from_str_radix(digits, radix)
                    .ok()
                    .and_then(char::from_u32)
                    .is_some()
        }
        None => matches!(name, "lt" | "gt" | "amp" | "apos" | "quot"),
    }
}

/// Pull the `encoding="..."` value out of an `<?xml ...?>` prologue.
fn declared_encoding(body: &[u8]) -> Option<&str> {
    let head = &body[..body.len().min(PROLOGUE_SCAN)];
    let head = head.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(head);
    if !head.starts_with(b"<?xml") {
        return None;
    }
    let end = head.windows(2).position(|w| w == b"?>")?;
    let decl = std::str::from_utf8(&head[..end]).ok()?;

    let rest = &decl[decl.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let rest = &rest[1..];
    rest.find(quote).map(|close| &rest[..close])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct Heading {
        #[serde(rename = "RouteHeading")]
        route_heading: String,
    }

    #[test]
    fn finds_declared_encoding() {
        assert_eq!(
            declared_encoding(br#"<?xml version="1.0" encoding="utf-8"?><a/>"#),
            Some("utf-8")
        );
        assert_eq!(
            declared_encoding(b"<?xml version='1.0' encoding = 'ISO-8859-1' ?><a/>"),
            Some("ISO-8859-1")
        );
        assert_eq!(declared_encoding(br#"<?xml version="1.0"?><a/>"#), None);
        assert_eq!(declared_encoding(b"<a/>"), None);
        assert_eq!(declared_encoding(b""), None);
    }

    #[test]
    fn decodes_utf8() {
        let body = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
                    <Route><RouteHeading>Airport / Aéroport</RouteHeading></Route>";
        let h: Heading = decode_xml(body.as_bytes()).unwrap();
        assert_eq!(h.route_heading, "Airport / Aéroport");
    }

    #[test]
    fn decodes_latin1() {
        let mut body = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\
                         <Route><RouteHeading>Airport / A"
            .to_vec();
        body.push(0xE9);
        body.extend_from_slice(b"roport</RouteHeading></Route>");

        let h: Heading = decode_xml(&body).unwrap();
        assert_eq!(h.route_heading, "Airport / Aéroport");
    }

    #[test]
    fn leaf_text_is_kept_verbatim() {
        let body = "<Route>\n  <RouteHeading>  BANK / FIFTH\t</RouteHeading>\n</Route>";
        let h: Heading = decode_xml(body.as_bytes()).unwrap();
        assert_eq!(h.route_heading, "  BANK / FIFTH\t");

        let body = "<Route><RouteHeading>\n  </RouteHeading></Route>";
        let h: Heading = decode_xml(body.as_bytes()).unwrap();
        assert_eq!(h.route_heading, "");
    }

    #[test]
    fn unknown_entities_and_bare_ampersands_are_literal() {
        let body = "<Route><RouteHeading>BANK &nbsp; FIFTH</RouteHeading></Route>";
        let h: Heading = decode_xml(body.as_bytes()).unwrap();
        assert_eq!(h.route_heading, "BANK &nbsp; FIFTH");

        let body = "<Route><RouteHeading>BANK & FIFTH</RouteHeading></Route>";
        let h: Heading = decode_xml(body.as_bytes()).unwrap();
        assert_eq!(h.route_heading, "BANK & FIFTH");

        let body = "<Route><RouteHeading>A &amp; B &#233; &#xE9; &#0x;</RouteHeading></Route>";
        let h: Heading = decode_xml(body.as_bytes()).unwrap();
        assert_eq!(h.route_heading, "A & B \u{e9} \u{e9} &#0x;");
    }

    #[test]
    fn escape_text_rules() {
        assert_eq!(escape_text("a & b", false), "a &amp; b");
        assert_eq!(escape_text(" x ", false), " x ");
        assert_eq!(escape_text(" x ", true), "&#32;x&#32;");
        assert_eq!(escape_text("\n  ", true), "\n  ");
        assert_eq!(escape_text("&lt;", true), "&lt;");
        assert!(starts_reference("&quot;"));
        assert!(!starts_reference("&nbsp;"));
        assert!(!starts_reference("&#xD800;"));
        assert!(!starts_reference("&amp"));
    }

    #[test]
    fn undeclared_defaults_to_utf8() {
        let body = "<Route><RouteHeading>Tunney's Pasture</RouteHeading></Route>";
        let h: Heading = decode_xml(body.as_bytes()).unwrap();
        assert_eq!(h.route_heading, "Tunney's Pasture");
    }

    #[test]
    fn unknown_charset_is_a_decode_error() {
        let body = br#"<?xml version="1.0" encoding="x-made-up"?><Route/>"#;
        let err = decode_xml::<Heading>(body).unwrap_err();
        assert!(matches!(err, DecodeError::Charset(label) if label == "x-made-up"));
    }

    #[test]
    fn malformed_markup_is_a_decode_error() {
        let body = b"<Route><RouteHeading>unterminated</Route>";
        let err = decode_xml::<Heading>(body).unwrap_err();
        assert!(matches!(err, DecodeError::Xml(_)));
    }
}
