use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::FeedError;
use crate::models::{Category, FeedEntry};

/// Parse an RSS 2.0 feed from raw XML bytes
pub fn parse_rss2_feed(xml: &[u8]) -> Result<Vec<FeedEntry>, FeedError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut buf = Vec::new();

    let mut current_item: Option<EntryBuilder> = None;
    let mut current_element = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                current_element = name.clone();

                if name == "item" {
                    current_item = Some(EntryBuilder::default());
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();

                if name == "item" {
                    if let Some(builder) = current_item.take() {
                        entries.push(builder.build());
                    }
                }
                current_element.clear();
            }
            Ok(Event::Text(e)) => {
                if let Some(ref mut item) = current_item {
                    let text = e.unescape().unwrap_or_default().to_string();
                    item.append(&current_element, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(ref mut item) = current_item {
                    let text = String::from_utf8_lossy(&e).to_string();
                    item.append(&current_element, &text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::Parse(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(entries)
}

/// Accumulates child-element text for one `<item>`
#[derive(Default)]
struct EntryBuilder {
    guid: Option<String>,
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    content_encoded: Option<String>,
    authors: Vec<String>,
    categories: Vec<String>,
    pub_date: Option<String>,
}

impl EntryBuilder {
    /// Route element text to the matching field.
    ///
    /// Text inside one element can arrive in several events, so fields are
    /// appended to rather than replaced.
    fn append(&mut self, element: &str, text: &str) {
        match element {
            "guid" => push_text(&mut self.guid, text),
            "title" => push_text(&mut self.title, text),
            "link" => push_text(&mut self.link, text),
            "description" => push_text(&mut self.description, text),
            "content:encoded" => push_text(&mut self.content_encoded, text),
            "pubDate" => push_text(&mut self.pub_date, text),
            "author" | "dc:creator" => self.authors.push(text.to_string()),
            "category" => self.categories.push(text.to_string()),
            _ => {}
        }
    }

    fn build(self) -> FeedEntry {
        // guid is the stable identity; feeds without one commonly rely on the
        // permalink instead
        let id = self
            .guid
            .clone()
            .or_else(|| self.link.clone())
            .unwrap_or_default();

        FeedEntry {
            id,
            title: self.title.unwrap_or_default(),
            content: self.content_encoded.or(self.description).unwrap_or_default(),
            link: self.link,
            authors: self.authors,
            categories: self.categories.into_iter().map(Category::new).collect(),
            modified_at: self.pub_date.as_deref().and_then(parse_rfc2822),
        }
    }
}

fn push_text(field: &mut Option<String>, text: &str) {
    field.get_or_insert_with(String::new).push_str(text);
}

fn parse_rfc2822(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc2822(value.trim()) {
        Ok(date) => Some(date.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!("Invalid pubDate '{}': {}", value, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>Example Channel</title>
    <link>https://example.org</link>
    <item>
      <title>First &amp; foremost</title>
      <link>https://example.org/first</link>
      <guid isPermaLink="false">urn:entry:1</guid>
      <description>Plain summary</description>
      <content:encoded><![CDATA[<p>Full <strong>body</strong></p>]]></content:encoded>
      <category>News</category>
      <category>Sports</category>
      <dc:creator>Alice</dc:creator>
      <pubDate>Tue, 05 Jan 2016 10:30:00 +0000</pubDate>
    </item>
    <item>
      <title>Bare minimum</title>
      <link>https://example.org/second</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_full_item() {
        let entries = parse_rss2_feed(SAMPLE).unwrap();
        assert_eq!(entries.len(), 2);

        let entry = &entries[0];
        assert_eq!(entry.id, "urn:entry:1");
        assert_eq!(entry.title, "First & foremost");
        assert_eq!(entry.content, "<p>Full <strong>body</strong></p>");
        assert_eq!(entry.link.as_deref(), Some("https://example.org/first"));
        assert_eq!(entry.authors, vec!["Alice".to_string()]);
        assert_eq!(
            entry.categories,
            vec![Category::new("News"), Category::new("Sports")]
        );
        assert_eq!(
            entry.modified_at,
            Some(Utc.with_ymd_and_hms(2016, 1, 5, 10, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_link_used_as_id_when_guid_missing() {
        let entries = parse_rss2_feed(SAMPLE).unwrap();
        assert_eq!(entries[1].id, "https://example.org/second");
    }

    #[test]
    fn test_description_used_when_no_content_encoded() {
        let entries = parse_rss2_feed(SAMPLE).unwrap();
        assert_eq!(entries[1].content, "");

        let xml = br#"<rss version="2.0"><channel><item>
            <guid>x</guid><description>summary only</description>
        </item></channel></rss>"#;
        let entries = parse_rss2_feed(xml).unwrap();
        assert_eq!(entries[0].content, "summary only");
    }

    #[test]
    fn test_channel_title_not_mistaken_for_item_title() {
        let entries = parse_rss2_feed(SAMPLE).unwrap();
        assert_eq!(entries[0].title, "First & foremost");
        assert_eq!(entries[1].title, "Bare minimum");
    }

    #[test]
    fn test_invalid_pub_date_yields_none() {
        let xml = br#"<rss version="2.0"><channel><item>
            <guid>x</guid><pubDate>not a date</pubDate>
        </item></channel></rss>"#;
        let entries = parse_rss2_feed(xml).unwrap();
        assert_eq!(entries[0].modified_at, None);
    }

    #[test]
    fn test_item_without_guid_or_link_has_empty_id() {
        let xml = br#"<rss version="2.0"><channel><item>
            <title>orphan</title>
        </item></channel></rss>"#;
        let entries = parse_rss2_feed(xml).unwrap();
        assert_eq!(entries[0].id, "");
    }
}
