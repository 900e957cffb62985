use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::FeedError;
use crate::models::FeedEntry;

mod atom;
mod rss2;

/// Feed format detected from the document root element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedFormat {
    Rss2,
    Atom,
}

/// Parse a syndication feed from raw XML bytes.
///
/// The format is detected from the root element: `<rss>` for RSS 2.0,
/// `<feed>` for Atom. Anything else is a parse error.
pub fn parse_feed(xml: &[u8]) -> Result<Vec<FeedEntry>, FeedError> {
    match detect_format(xml)? {
        FeedFormat::Rss2 => rss2::parse_rss2_feed(xml),
        FeedFormat::Atom => atom::parse_atom_feed(xml),
    }
}

/// Find the document root element and map it to a feed format
fn detect_format(xml: &[u8]) -> Result<FeedFormat, FeedError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                return match name.as_str() {
                    "rss" => Ok(FeedFormat::Rss2),
                    "feed" => Ok(FeedFormat::Atom),
                    other => Err(FeedError::Parse(format!(
                        "unsupported feed root element <{}>",
                        other
                    ))),
                };
            }
            Ok(Event::Eof) => {
                return Err(FeedError::Parse("document has no root element".into()))
            }
            Err(e) => return Err(FeedError::Parse(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_rss2() {
        let xml = br#"<?xml version="1.0"?><rss version="2.0"><channel></channel></rss>"#;
        assert_eq!(detect_format(xml).unwrap(), FeedFormat::Rss2);
    }

    #[test]
    fn test_detects_atom() {
        let xml = br#"<?xml version="1.0"?><feed xmlns="http://www.w3.org/2005/Atom"></feed>"#;
        assert_eq!(detect_format(xml).unwrap(), FeedFormat::Atom);
    }

    #[test]
    fn test_rejects_unknown_root() {
        let xml = br#"<html><body>not a feed</body></html>"#;
        assert!(detect_format(xml).is_err());
    }

    #[test]
    fn test_rejects_empty_document() {
        assert!(detect_format(b"").is_err());
    }
}
