//! Streaming RSS parser. The whole document is rejected on malformed XML,
//! matching the upstream behavior of skipping feeds that fail to parse.

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use reader_core::{parse_timestamp, EntryDate, FeedEntry, FeedSnapshot, ReaderConfig, ReaderError};

/// Parse an RSS 2.0 document into a `FeedSnapshot`.
///
/// The channel title falls back to "Unknown Feed"; per-entry fallbacks come
/// from `FeedEntry::default()`. At most `config.max_entries_per_feed`
/// entries are kept, in document order.
pub fn parse_feed(xml: &[u8], config: &ReaderConfig) -> crate::Result<FeedSnapshot> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut entries: Vec<FeedEntry> = Vec::new();
    let mut channel_title: Option<String> = None;
    let mut saw_channel = false;

    let mut current_entry: Option<EntryBuilder> = None;
    let mut current_element = String::new();
    // <image> carries its own <title>, which must not become the channel title.
    let mut in_image = false;

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match name.as_str() {
                    "channel" => saw_channel = true,
                    "item" => current_entry = Some(EntryBuilder::default()),
                    "image" => in_image = true,
                    _ => {}
                }
                current_element = name;
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match name.as_str() {
                    "item" => {
                        if let Some(builder) = current_entry.take() {
                            if entries.len() < config.max_entries_per_feed {
                                entries.push(builder.build());
                            }
                        }
                    }
                    "image" => in_image = false,
                    _ => {}
                }
                current_element.clear();

                if entries.len() >= config.max_entries_per_feed && channel_title.is_some() {
                    break;
                }
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().unwrap_or_default().to_string();
                assign_text(
                    &current_element,
                    text,
                    &mut current_entry,
                    &mut channel_title,
                    in_image,
                );
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e.into_inner()).to_string();
                assign_text(
                    &current_element,
                    text,
                    &mut current_entry,
                    &mut channel_title,
                    in_image,
                );
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ReaderError::Parse(format!("XML parse error: {e}"))),
            _ => {}
        }
        buf.clear();
    }

    if !saw_channel {
        return Err(ReaderError::MissingData);
    }

    let title = channel_title.unwrap_or_else(|| "Unknown Feed".to_string());
    Ok(FeedSnapshot::new(title, entries))
}

fn assign_text(
    element: &str,
    text: String,
    current_entry: &mut Option<EntryBuilder>,
    channel_title: &mut Option<String>,
    in_image: bool,
) {
    if text.is_empty() {
        return;
    }

    if let Some(entry) = current_entry {
        match element {
            "title" => entry.title = Some(text),
            "link" => entry.link = Some(text),
            "description" => entry.summary = Some(text),
            "pubDate" => {
                entry.published = Some(match parse_timestamp(&text) {
                    Some(at) => EntryDate::Known(at),
                    None => EntryDate::Invalid,
                });
            }
            _ => {}
        }
    } else if element == "title" && !in_image && channel_title.is_none() {
        *channel_title = Some(text);
    }
}

#[derive(Default)]
struct EntryBuilder {
    title: Option<String>,
    link: Option<String>,
    summary: Option<String>,
    published: Option<EntryDate>,
}

impl EntryBuilder {
    fn build(self) -> FeedEntry {
        let fallback = FeedEntry::default();
        FeedEntry {
            title: self.title.unwrap_or(fallback.title),
            link: self.link.unwrap_or(fallback.link),
            summary: self.summary.unwrap_or(fallback.summary),
            published: self.published.unwrap_or(EntryDate::Missing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn feed_with_items(items: &str) -> String {
        format!(
            "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel>\
             <title>Test Feed</title><link>https://example.com/</link>{items}\
             </channel></rss>"
        )
    }

    #[test]
    fn full_item_is_parsed() {
        let xml = feed_with_items(
            "<item><title>Hello</title><link>https://example.com/a</link>\
             <description>World</description>\
             <pubDate>Fri, 07 Aug 2026 09:15:00 +0000</pubDate></item>",
        );
        let snapshot = parse_feed(xml.as_bytes(), &ReaderConfig::default()).unwrap();

        assert_eq!(snapshot.title, "Test Feed");
        assert_eq!(snapshot.entries.len(), 1);
        let entry = &snapshot.entries[0];
        assert_eq!(entry.title, "Hello");
        assert_eq!(entry.link, "https://example.com/a");
        assert_eq!(entry.summary, "World");
        assert_eq!(
            entry.published,
            EntryDate::Known(Utc.with_ymd_and_hms(2026, 8, 7, 9, 15, 0).unwrap())
        );
    }

    #[test]
    fn missing_fields_use_fallbacks() {
        let xml = feed_with_items("<item><description>Only a summary</description></item>");
        let snapshot = parse_feed(xml.as_bytes(), &ReaderConfig::default()).unwrap();

        let entry = &snapshot.entries[0];
        assert_eq!(entry.title, "No title");
        assert_eq!(entry.link, "#");
        assert_eq!(entry.summary, "Only a summary");
        assert_eq!(entry.published, EntryDate::Missing);
    }

    #[test]
    fn unparseable_pub_date_is_invalid() {
        let xml =
            feed_with_items("<item><title>A</title><pubDate>yesterday-ish</pubDate></item>");
        let snapshot = parse_feed(xml.as_bytes(), &ReaderConfig::default()).unwrap();
        assert_eq!(snapshot.entries[0].published, EntryDate::Invalid);
    }

    #[test]
    fn entry_cap_is_honored() {
        let items: String = (0..8)
            .map(|i| format!("<item><title>Item {i}</title></item>"))
            .collect();
        let snapshot = parse_feed(feed_with_items(&items).as_bytes(), &ReaderConfig::default())
            .unwrap();

        assert_eq!(snapshot.entries.len(), 5);
        assert_eq!(snapshot.entries[4].title, "Item 4");
    }

    #[test]
    fn image_title_does_not_shadow_channel_title() {
        let xml = "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel>\
                   <image><title>Logo</title></image><title>Real Title</title>\
                   </channel></rss>";
        let snapshot = parse_feed(xml.as_bytes(), &ReaderConfig::default()).unwrap();
        assert_eq!(snapshot.title, "Real Title");
    }

    #[test]
    fn missing_channel_title_falls_back() {
        let xml = "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel>\
                   <item><title>A</title></item></channel></rss>";
        let snapshot = parse_feed(xml.as_bytes(), &ReaderConfig::default()).unwrap();
        assert_eq!(snapshot.title, "Unknown Feed");
    }

    #[test]
    fn cdata_summary_is_kept_verbatim() {
        let xml = feed_with_items(
            "<item><title>A</title>\
             <description><![CDATA[With <b>markup</b> inside.]]></description></item>",
        );
        let snapshot = parse_feed(xml.as_bytes(), &ReaderConfig::default()).unwrap();
        assert_eq!(snapshot.entries[0].summary, "With <b>markup</b> inside.");
    }

    #[test]
    fn malformed_xml_rejects_the_whole_feed() {
        let xml = b"<?xml version=\"1.0\"?><rss><channel><title>Broken</badend>";
        let err = parse_feed(xml, &ReaderConfig::default()).unwrap_err();
        assert!(matches!(err, ReaderError::Parse(_)));
    }

    #[test]
    fn document_without_channel_is_missing_data() {
        let err = parse_feed(b"<html><body>not a feed</body></html>", &ReaderConfig::default())
            .unwrap_err();
        assert!(matches!(err, ReaderError::MissingData));
    }
}
