use std::fmt::Write;

use chrono::{NaiveDateTime, SubsecRound, Utc};
use uuid::Uuid;

use crate::content::parsing_utils::{extract_tags, find_title, parse_header};
use crate::content::{PostId, PostMetadata, PostSource};
use crate::text_utils::{format_header_date, is_blank, parse_date_time, slugify};

/// Current UTC time at the precision stored in post headers.
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(3)
}

fn non_empty(val: &str) -> Option<String> {
    if val.is_empty() {
        None
    } else {
        Some(val.to_string())
    }
}

fn parse_date(key: &str, val: &str) -> Result<Option<NaiveDateTime>, String> {
    if val.is_empty() {
        return Ok(None);
    }
    parse_date_time(val)
        .map(Some)
        .map_err(|e| format!("{}: {}", key, e))
}

/// Splits a post file into its metadata and markdown body.
///
/// The post name comes from the `NAME` (or `TITLE`) entry, or from the first
/// `# ` heading of the body when the header has none.
pub fn get_metadata(content: &str) -> Result<PostSource, String> {
    let header = parse_header(content)?;
    let body = &content[header.body_start..];

    let mut metadata = PostMetadata::default();
    let mut name = None;

    for (key, val) in header.entries {
        match key.to_ascii_uppercase().as_str() {
            "ID" => metadata.id = non_empty(val).map(PostId),
            "NAME" | "TITLE" => name = non_empty(val),
            "PUBLISHED_AT" | "PUBLISHEDAT" | "DATE" => metadata.published_at = parse_date(key, val)?,
            "UPDATED_AT" | "UPDATEDAT" => metadata.updated_at = parse_date(key, val)?,
            "SLUG" => metadata.slug = non_empty(val),
            "DESCRIPTION" => metadata.description = non_empty(val),
            "AUTHOR" => metadata.author = non_empty(val),
            "TAGS" => metadata.tags = extract_tags(val),
            _ => metadata.extra.push((key.to_string(), val.to_string())),
        }
    }

    metadata.name = match name.as_deref().or_else(|| find_title(body)) {
        Some(name) => name.to_string(),
        None => return Err("Post has no name and no `# ` title".to_string()),
    };

    Ok(PostSource {
        metadata,
        body: body.to_string(),
    })
}

/// Fills in the publication metadata of a post about to be published.
///
/// `previous` is the header of the already published copy, when there is
/// one. Values already in `parsed` win, then values from `previous`, then
/// the defaults: `now` for both dates, the slugified name and a fresh id.
/// With `refresh_updated`, `updated_at` is always `now`.
pub fn normalize(previous: Option<&PostMetadata>, parsed: PostMetadata, refresh_updated: bool, now: NaiveDateTime) -> Result<PostMetadata, String> {
    let mut metadata = parsed;

    metadata.published_at = metadata.published_at
        .or_else(|| previous.and_then(|p| p.published_at))
        .or(Some(now));

    metadata.updated_at = if refresh_updated {
        Some(now)
    } else {
        metadata.updated_at
            .or_else(|| previous.and_then(|p| p.updated_at))
            .or(Some(now))
    };

    let slug = match metadata.slug.take().filter(|s| !s.trim().is_empty()) {
        Some(slug) => slug,
        None => match previous.and_then(|p| p.slug.clone()) {
            Some(slug) => slug,
            None => slugify(&metadata.name),
        },
    };
    if slug.is_empty() {
        return Err(format!("Cannot build a slug from the name `{}`", metadata.name));
    }
    metadata.slug = Some(slug);

    if is_blank(metadata.description.as_deref()) {
        metadata.description = previous
            .and_then(|p| p.description.clone())
            .filter(|d| !d.trim().is_empty());
    }

    metadata.id = metadata.id
        .or_else(|| previous.and_then(|p| p.id.clone()))
        .or_else(|| Some(PostId(Uuid::new_v4().to_string())));

    if metadata.author.is_none() {
        metadata.author = previous.and_then(|p| p.author.clone());
    }

    Ok(metadata)
}

/// Serializes `metadata` back into the header format read by
/// [`get_metadata`].
pub fn render_header(metadata: &PostMetadata) -> String {
    let mut buf = String::new();

    let _ = writeln!(&mut buf, "<!--");
    if let Some(ref id) = metadata.id {
        let _ = writeln!(&mut buf, "[ID]: # ({})", id);
    }
    let _ = writeln!(&mut buf, "[NAME]: # ({})", metadata.name);
    if let Some(ref published_at) = metadata.published_at {
        let _ = writeln!(&mut buf, "[PUBLISHED_AT]: # ({})", format_header_date(published_at));
    }
    if let Some(ref updated_at) = metadata.updated_at {
        let _ = writeln!(&mut buf, "[UPDATED_AT]: # ({})", format_header_date(updated_at));
    }
    if let Some(ref slug) = metadata.slug {
        let _ = writeln!(&mut buf, "[SLUG]: # ({})", slug);
    }
    if let Some(ref description) = metadata.description {
        let _ = writeln!(&mut buf, "[DESCRIPTION]: # ({})", description);
    }
    if let Some(ref author) = metadata.author {
        let _ = writeln!(&mut buf, "[AUTHOR]: # ({})", author);
    }
    if !metadata.tags.is_empty() {
        let _ = writeln!(&mut buf, "[TAGS]: # ({})", metadata.tags.join(" "));
    }
    for (key, val) in metadata.extra.iter() {
        let _ = writeln!(&mut buf, "[{}]: # ({})", key, val);
    }
    let _ = writeln!(&mut buf, "-->");
    buf
}
