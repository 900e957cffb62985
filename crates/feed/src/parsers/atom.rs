use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::FeedError;
use crate::models::{Category, FeedEntry};

/// Parse an Atom feed from raw XML bytes
pub fn parse_atom_feed(xml: &[u8]) -> Result<Vec<FeedEntry>, FeedError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut buf = Vec::new();

    let mut current_entry: Option<EntryBuilder> = None;
    let mut in_author = false;
    // <source> embeds the origin feed's own id/title/updated; nothing inside
    // it belongs to the entry
    let mut in_source = false;
    // Element whose text is currently being captured. Atom content may nest
    // markup (type="xhtml"), so capture ends only on the matching close tag.
    let mut capture: Option<&'static str> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();

                if current_entry.is_none() {
                    if name == "entry" {
                        current_entry = Some(EntryBuilder::default());
                    }
                } else if in_source {
                    // skip
                } else if name == "source" {
                    in_source = true;
                } else if name == "author" {
                    in_author = true;
                } else if capture.is_none() {
                    capture = capture_field(&name, in_author);
                    if name == "link" {
                        if let Some(ref mut entry) = current_entry {
                            entry.take_link(&e);
                        }
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();

                if let Some(ref mut entry) = current_entry {
                    if !in_source {
                        match name.as_str() {
                            "link" => entry.take_link(&e),
                            "category" => entry.take_category(&e),
                            _ => {}
                        }
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();

                match name.as_str() {
                    "entry" => {
                        if let Some(builder) = current_entry.take() {
                            entries.push(builder.build());
                        }
                        in_author = false;
                        capture = None;
                    }
                    "source" => in_source = false,
                    "author" => {
                        in_author = false;
                        if let Some(ref mut entry) = current_entry {
                            entry.finish_author();
                        }
                    }
                    _ => {
                        if capture == capture_field(&name, in_author) {
                            capture = None;
                        }
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if let (Some(entry), Some(field)) = (current_entry.as_mut(), capture) {
                    if !in_source {
                        let text = e.unescape().unwrap_or_default().to_string();
                        entry.append(field, &text);
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if let (Some(entry), Some(field)) = (current_entry.as_mut(), capture) {
                    if !in_source {
                        let text = String::from_utf8_lossy(&e).to_string();
                        entry.append(field, &text);
                    }
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

/// Map an element name to a captured text field, if it is one
fn capture_field(element: &str, in_author: bool) -> Option<&'static str> {
    match element {
        "id" => Some("id"),
        "title" => Some("title"),
        "content" => Some("content"),
        "summary" => Some("summary"),
        "updated" => Some("updated"),
        "published" => Some("published"),
        "name" if in_author => Some("name"),
        _ => None,
    }
}

/// Accumulates child-element text and attributes for one `<entry>`
#[derive(Default)]
struct EntryBuilder {
    id: Option<String>,
    title: Option<String>,
    content: Option<String>,
    summary: Option<String>,
    link: Option<String>,
    authors: Vec<String>,
    categories: Vec<String>,
    updated: Option<String>,
    published: Option<String>,
    current_author: String,
}

impl EntryBuilder {
    fn append(&mut self, field: &str, text: &str) {
        match field {
            "id" => push_text(&mut self.id, text),
            "title" => push_text(&mut self.title, text),
            "content" => push_text(&mut self.content, text),
            "summary" => push_text(&mut self.summary, text),
            "updated" => push_text(&mut self.updated, text),
            "published" => push_text(&mut self.published, text),
            "name" => self.current_author.push_str(text),
            _ => {}
        }
    }

    /// Close out an `<author>` block, keeping its accumulated name
    fn finish_author(&mut self) {
        if !self.current_author.is_empty() {
            self.authors.push(std::mem::take(&mut self.current_author));
        }
    }

    /// Keep the first alternate (or rel-less) link of the entry
    fn take_link(&mut self, e: &BytesStart) {
        let mut href = None;
        let mut rel = None;
        for attr in e.attributes().flatten() {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = String::from_utf8_lossy(&attr.value).to_string();
            match key.as_str() {
                "href" => href = Some(value),
                "rel" => rel = Some(value),
                _ => {}
            }
        }
        let is_alternate = matches!(rel.as_deref(), None | Some("alternate"));
        if self.link.is_none() && is_alternate {
            self.link = href;
        }
    }

    fn take_category(&mut self, e: &BytesStart) {
        for attr in e.attributes().flatten() {
            if attr.key.as_ref() == b"term" {
                let value = String::from_utf8_lossy(&attr.value).to_string();
                if !value.is_empty() {
                    self.categories.push(value);
                }
            }
        }
    }

    fn build(self) -> FeedEntry {
        let modified_at = self
            .updated
            .as_deref()
            .and_then(parse_rfc3339)
            .or_else(|| self.published.as_deref().and_then(parse_rfc3339));

        FeedEntry {
            id: self.id.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            content: self.content.or(self.summary).unwrap_or_default(),
            link: self.link,
            authors: self.authors,
            categories: self.categories.into_iter().map(Category::new).collect(),
            modified_at,
        }
    }
}

fn push_text(field: &mut Option<String>, text: &str) {
    field.get_or_insert_with(String::new).push_str(text);
}

fn parse_rfc3339(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value.trim()) {
        Ok(date) => Some(date.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!("Invalid Atom timestamp '{}': {}", value, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE: &[u8] = br#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example Feed</title>
  <id>urn:feed:1</id>
  <updated>2016-01-01T00:00:00Z</updated>
  <entry>
    <id>urn:entry:1</id>
    <title>Hello Atom</title>
    <link rel="alternate" href="https://example.org/hello"/>
    <link rel="enclosure" href="https://example.org/hello.mp3"/>
    <author><name>Alice</name></author>
    <author><name>Bob</name></author>
    <category term="News"/>
    <category term="Sports"/>
    <updated>2016-01-05T10:30:00Z</updated>
    <content type="html">&lt;p&gt;Body&lt;/p&gt;</content>
  </entry>
  <entry>
    <id>urn:entry:2</id>
    <title>Summary only</title>
    <summary>Short text</summary>
    <published>2016-01-06T08:00:00Z</published>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_full_entry() {
        let entries = parse_atom_feed(SAMPLE).unwrap();
        assert_eq!(entries.len(), 2);

        let entry = &entries[0];
        assert_eq!(entry.id, "urn:entry:1");
        assert_eq!(entry.title, "Hello Atom");
        assert_eq!(entry.content, "<p>Body</p>");
        assert_eq!(entry.link.as_deref(), Some("https://example.org/hello"));
        assert_eq!(entry.authors, vec!["Alice".to_string(), "Bob".to_string()]);
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
    fn test_summary_and_published_fallbacks() {
        let entries = parse_atom_feed(SAMPLE).unwrap();

        let entry = &entries[1];
        assert_eq!(entry.content, "Short text");
        assert_eq!(
            entry.modified_at,
            Some(Utc.with_ymd_and_hms(2016, 1, 6, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_enclosure_link_not_taken() {
        let xml = br#"<feed xmlns="http://www.w3.org/2005/Atom"><entry>
            <id>x</id>
            <link rel="enclosure" href="https://example.org/file.bin"/>
        </entry></feed>"#;
        let entries = parse_atom_feed(xml).unwrap();
        assert_eq!(entries[0].link, None);
    }

    #[test]
    fn test_feed_metadata_not_mixed_into_entries() {
        let entries = parse_atom_feed(SAMPLE).unwrap();
        assert_eq!(entries[0].id, "urn:entry:1");
        assert_eq!(entries[1].title, "Summary only");
    }

    #[test]
    fn test_source_element_ignored() {
        let xml = br#"<feed xmlns="http://www.w3.org/2005/Atom"><entry>
            <id>urn:entry:9</id>
            <source><id>urn:other-feed</id><title>Origin</title></source>
            <title>Kept title</title>
        </entry></feed>"#;
        let entries = parse_atom_feed(xml).unwrap();
        assert_eq!(entries[0].id, "urn:entry:9");
        assert_eq!(entries[0].title, "Kept title");
    }
}
