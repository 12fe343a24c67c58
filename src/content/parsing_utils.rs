use lazy_static::lazy_static;
use regex::Regex;

/// Header entries and the offset at which the body starts.
#[derive(Debug, PartialEq)]
pub struct RawHeader<'a> {
    pub entries: Vec<(&'a str, &'a str)>,
    pub body_start: usize,
}

/// Reads the `[KEY]: # (value)` lines at the top of a post, optionally
/// wrapped in an HTML comment. Stops at the first line that is not a header
/// entry.
pub fn parse_header(content: &str) -> Result<RawHeader, String> {
    let mut lines = content.split_inclusive('\n').peekable();
    let mut offset = 0;
    let mut entries = vec![];

    // Skip optional HTML comment in the beginning
    let mut start_with_comment = false;
    while let Some(&line) = lines.peek() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            offset += line.len();
            lines.next();
            continue;
        }
        if trimmed == "<!--" {
            offset += line.len();
            lines.next();
            start_with_comment = true;
        }
        break;
    }

    while let Some(&line) = lines.peek() {
        if line.trim().is_empty() {
            offset += line.len();
            lines.next();
            continue;
        }
        match extract_header_entry(line) {
            Some(entry) => entries.push(entry),
            None => break,
        }
        offset += line.len();
        lines.next();
    }

    if start_with_comment {
        loop {
            let Some(line) = lines.next() else {
                return Err("End of comment in the header is missing".to_string());
            };
            offset += line.len();
            if line.trim() == "-->" {
                break;
            }
        }
    }

    Ok(RawHeader {
        entries,
        body_start: offset,
    })
}

fn extract_header_entry(line: &str) -> Option<(&str, &str)> {
    lazy_static! {
        static ref HEADER_REGEX: Regex = Regex::new(r"^\[(?P<key>\w+)\]: # \((?P<value>.*)\)\s*$").unwrap();
    }

    HEADER_REGEX.captures(line).and_then(|cap| {
        let key = cap.name("key").map(|key| key.as_str());
        let val = cap.name("value").map(|val| val.as_str());
        match (key, val) {
            (Some(key), Some(val)) => Some((key, val.trim())),
            _ => None,
        }
    })
}

/// Finds the first `# ` heading.
pub fn find_title(body: &str) -> Option<&str> {
    body.lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line[2..].trim())
        .filter(|title| !title.is_empty())
}

/// The body without its leading `# ` title line, when it starts with one.
pub fn strip_title(body: &str) -> &str {
    let rest = body.trim_start_matches(['\r', '\n']);
    if !rest.starts_with("# ") {
        return body;
    }
    match rest.find('\n') {
        Some(end) => &rest[end + 1..],
        None => "",
    }
}

pub fn extract_tags(tags_str: &str) -> Vec<String> {
    tags_str.split(' ')
        .filter(|x| !x.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Everything before `break_tag`, and whether the body was cut.
pub fn split_summary<'a>(body: &'a str, break_tag: &str) -> (&'a str, bool) {
    match body.find(break_tag) {
        Some(i) => (&body[..i], true),
        None => (body, false),
    }
}

pub fn remove_comments(md_post: &str) -> Result<String, String> {
    const START_COMMENT: &str = "<!--";
    const END_COMMENT: &str = "-->";

    let mut res = String::with_capacity(md_post.len());
    let mut block = md_post;

    while let Some(start) = block.find(START_COMMENT) {
        res.push_str(&block[..start]);
        let next = &block[start + START_COMMENT.len()..];
        match next.find(END_COMMENT) {
            Some(end) => block = &next[end + END_COMMENT.len()..],
            None => return Err("Error finding end of comment".to_string()),
        }
    }
    res.push_str(block);

    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_header_entry() {
        let res = extract_header_entry("[ID]: # (a63bd715-a3fe-4788-b0e1-2a3153778544)");
        assert_eq!(res, Some(("ID", "a63bd715-a3fe-4788-b0e1-2a3153778544")));
        let res = extract_header_entry("[PUBLISHED_AT]: # (2022-04-02 12:05:00.000)\n");
        assert_eq!(res, Some(("PUBLISHED_AT", "2022-04-02 12:05:00.000")));
        let res = extract_header_entry("[DESCRIPTION]: # (Notes (with parens))");
        assert_eq!(res, Some(("DESCRIPTION", "Notes (with parens)")));
        let res = extract_header_entry("[TAGS]: # ()");
        assert_eq!(res, Some(("TAGS", "")));

        let res = extract_header_entry("[AUTHOR]: (someone)");
        assert!(res.is_none());
        let res = extract_header_entry("# Title");
        assert!(res.is_none());
    }

    #[test]
    fn test_parse_header_in_comment() {
        let content = "

<!--

[ID]: # (21c1e9ad-4ebb-4168-a543-fbf77cc35a85)

[NAME]: # (Hello)

-->

# Hello
Body
";
        let header = parse_header(content).unwrap();
        assert_eq!(header.entries, vec![("ID", "21c1e9ad-4ebb-4168-a543-fbf77cc35a85"), ("NAME", "Hello")]);
        assert_eq!(&content[header.body_start..], "\n# Hello\nBody\n");
    }

    #[test]
    fn test_parse_header_without_comment() {
        let content = "[NAME]: # (Hello)\n[SLUG]: # (hi)\n\n# Hello\n";
        let header = parse_header(content).unwrap();
        assert_eq!(header.entries, vec![("NAME", "Hello"), ("SLUG", "hi")]);
        assert_eq!(&content[header.body_start..], "# Hello\n");
    }

    #[test]
    fn test_parse_no_header() {
        let content = "# Just a title\n\nText";
        let header = parse_header(content).unwrap();
        assert!(header.entries.is_empty());
        assert_eq!(header.body_start, 0);
    }

    #[test]
    fn test_parse_unterminated_comment() {
        let content = "<!--\n[NAME]: # (Hello)\n\n# Hello\n";
        assert_eq!(parse_header(content), Err("End of comment in the header is missing".to_string()));
    }

    #[test]
    fn test_find_title() {
        assert_eq!(find_title("\nintro\n# The title\n## sub"), Some("The title"));
        assert_eq!(find_title("## sub only"), None);
        assert_eq!(find_title("# "), None);
    }

    #[test]
    fn test_strip_title() {
        assert_eq!(strip_title("\n# Title\n\nText"), "\nText");
        assert_eq!(strip_title("# Title"), "");
        assert_eq!(strip_title("Intro\n# Title\n"), "Intro\n# Title\n");
        assert_eq!(strip_title("## Sub\n"), "## Sub\n");
    }

    #[test]
    fn test_extract_tags() {
        let tags = extract_tags("one two three   four");
        assert_eq!(tags, ["one", "two", "three", "four"]);
    }

    #[test]
    fn test_split_summary() {
        assert_eq!(split_summary("intro\n<!-- more -->\nrest", "<!-- more -->"), ("intro\n", true));
        assert_eq!(split_summary("no fold", "<!-- more -->"), ("no fold", false));
    }

    #[test]
    fn test_remove_comments() {
        assert_eq!(remove_comments("Some text.<!-- more -->Wo<!-- xyz -->rd").unwrap(), "Some text.Word");
        assert_eq!(remove_comments("Some text.Word").unwrap(), "Some text.Word");
        assert_eq!(remove_comments("").unwrap(), "");
        assert_eq!(remove_comments("<!-- more --><!-- xyz -->").unwrap(), "");
        assert!(remove_comments("text <!-- open").is_err());
    }
}
