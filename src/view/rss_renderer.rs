use std::io::Cursor;

use chrono::{TimeZone, Utc};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::processor::RenderedPost;

/* Example
<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
<channel>
  <title>Aurelia Blog</title>
  <link>https://blog.example.com</link>
  <description>Aurelia Blog posts</description>
  <item>
    <title>Hello World</title>
    <link>https://blog.example.com/blog/2024/05/hello-world/</link>
    <guid isPermaLink="false">3f1c1f1e-7f5e-4f0e-9d59-0b9f7f7d1c2a</guid>
    <description><![CDATA[<p>This is the first paragraph.</p>]]></description>
    <pubDate>Wed, 1 May 2024 10:00:00 +0000</pubDate>
  </item>
</channel>
</rss>
*/

pub struct RssChannel<'a> {
    pub ch_title: &'a str,
    pub ch_link: &'a str,
    pub ch_desc: &'a str,
}

impl<'a> RssChannel<'a> {
    pub fn render(&self, posts: &[RenderedPost]) -> quick_xml::Result<Vec<u8>> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        let decl = Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None));
        writer.write_event(decl)?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        writer.write_event(Event::Start(rss))?;
        writer.write_event(Event::Start(BytesStart::new("channel")))?;

        push_text(&mut writer, "title", self.ch_title)?;
        push_text(&mut writer, "link", self.ch_link)?;
        push_text(&mut writer, "description", self.ch_desc)?;

        for rendered in posts {
            let metadata = &rendered.post.metadata;
            writer.write_event(Event::Start(BytesStart::new("item")))?;

            push_text(&mut writer, "title", &metadata.name)?;

            let link = full_link(self.ch_link, &rendered.link);
            push_text(&mut writer, "link", &link)?;

            // Posts published before ids existed fall back to their slug
            let guid = match metadata.id {
                Some(ref id) => id.0.as_str(),
                None => rendered.post.slug(),
            };
            let mut guid_elem = BytesStart::new("guid");
            guid_elem.push_attribute(("isPermaLink", "false"));
            writer.write_event(Event::Start(guid_elem))?;
            writer.write_event(Event::Text(BytesText::new(guid)))?;
            writer.write_event(Event::End(BytesEnd::new("guid")))?;

            let description = match metadata.description.as_deref() {
                Some(desc) if !desc.trim().is_empty() => desc,
                _ => rendered.summary.as_str(),
            };
            push_cdata(&mut writer, "description", description)?;

            if let Some(ref published_at) = metadata.published_at {
                let dt = Utc.from_utc_datetime(published_at);
                push_text(&mut writer, "pubDate", &dt.to_rfc2822())?;
            }

            writer.write_event(Event::End(BytesEnd::new("item")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        Ok(writer.into_inner().into_inner())
    }
}

fn full_link(base_url: &str, link: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    let link = link.trim_start_matches('/');
    if link.ends_with('/') {
        format!("{}/{}", base_url, link)
    } else {
        format!("{}/{}/", base_url, link)
    }
}

fn push_text(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn push_cdata(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    if text.contains("]]>") {
        let new_text = text.replace("]]>", "]] >");
        writer.write_event(Event::CData(BytesCData::new(&new_text)))?;
    } else {
        writer.write_event(Event::CData(BytesCData::new(text)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::str;

    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    use crate::content::{PostId, PostMetadata};
    use crate::post::Post;

    use super::*;

    fn create_post(id: &str, description: Option<&str>) -> RenderedPost {
        let dt = NaiveDateTime::new(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveTime::from_hms_opt(5, 6, 7).unwrap(),
        );
        RenderedPost {
            post: Post {
                src: PathBuf::from(format!("post-{}.md", id)),
                dest: PathBuf::from(format!("blog/2024/01/post-{}/index.html", id)),
                metadata: PostMetadata {
                    id: Some(PostId(id.to_string())),
                    name: format!("title-of-post-{}", id),
                    published_at: Some(dt),
                    updated_at: Some(dt),
                    slug: Some(format!("post-{}", id)),
                    description: description.map(|d| d.to_string()),
                    ..Default::default()
                },
                body: String::new(),
            },
            link: format!("blog/2024/01/post-{}/", id),
            content: format!("<p>content-of-post-{}</p>", id),
            summary: format!("<p>summary-of-post-{}</p>", id),
            summarized: true,
        }
    }

    #[test]
    fn render_xml() {
        let posts = vec![create_post("1", None), create_post("2", Some("Post & more"))];

        let rss = RssChannel {
            ch_title: "my feed",
            ch_link: "https://blog.example.com/",
            ch_desc: "My blog feed",
        };
        let xml = rss.render(&posts).unwrap();
        assert_eq!(str::from_utf8(&xml).unwrap(), EXPECTED);
    }

    #[test]
    fn render_guid_from_slug() {
        let mut post = create_post("3", None);
        post.post.metadata.id = None;
        let rss = RssChannel { ch_title: "t", ch_link: "https://blog.example.com", ch_desc: "d" };
        let xml = String::from_utf8(rss.render(&[post]).unwrap()).unwrap();
        assert!(xml.contains(r#"<guid isPermaLink="false">post-3</guid>"#));
    }

    #[test]
    fn render_escaped_cdata() {
        let mut post = create_post("4", None);
        post.summary = "<pre>a]]>b</pre>".to_string();
        let rss = RssChannel { ch_title: "t", ch_link: "https://blog.example.com", ch_desc: "d" };
        let xml = String::from_utf8(rss.render(&[post]).unwrap()).unwrap();
        assert!(xml.contains("<![CDATA[<pre>a]] >b</pre>]]>"));
    }

    #[test]
    fn test_full_link() {
        assert_eq!(full_link("https://a.com/", "/blog/x/"), "https://a.com/blog/x/");
        assert_eq!(full_link("https://a.com", "blog/x"), "https://a.com/blog/x/");
    }

    const EXPECTED: &str = r##"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>my feed</title><link>https://blog.example.com/</link><description>My blog feed</description><item><title>title-of-post-1</title><link>https://blog.example.com/blog/2024/01/post-1/</link><guid isPermaLink="false">1</guid><description><![CDATA[<p>summary-of-post-1</p>]]></description><pubDate>Tue, 2 Jan 2024 05:06:07 +0000</pubDate></item><item><title>title-of-post-2</title><link>https://blog.example.com/blog/2024/01/post-2/</link><guid isPermaLink="false">2</guid><description><![CDATA[Post & more]]></description><pubDate>Tue, 2 Jan 2024 05:06:07 +0000</pubDate></item></channel></rss>"##;
}
