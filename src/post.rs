use std::path::{Path, PathBuf};

use chrono::Datelike;

use crate::config::Config;
use crate::content::metadata::render_header;
use crate::content::PostMetadata;
use crate::error::{PublishError, Result};
use crate::files::write_file;

const PAGE_FILE_NAME: &str = "index.html";

/// One post going through a publish: where it was read from, where its page
/// goes (relative to the output directory) and its normalized metadata.
#[derive(Debug, Clone)]
pub struct Post {
    pub src: PathBuf,
    pub dest: PathBuf,
    pub metadata: PostMetadata,
    pub body: String,
}

impl Post {
    pub fn slug(&self) -> &str {
        self.metadata.slug.as_deref().unwrap_or_default()
    }
}

/// URL path of a post page relative to the site root, with a trailing `/`:
/// `<url_prefix>/<YYYY>/<MM>/<slug>/`.
pub fn post_link(config: &Config, metadata: &PostMetadata) -> Result<String> {
    let slug = match metadata.slug.as_deref() {
        Some(slug) if !slug.is_empty() => slug,
        _ => return Err(PublishError::Destination { reason: format!("post `{}` has no slug", metadata.name) }),
    };
    if slug.contains(['/', '\\']) || slug.starts_with('.') {
        return Err(PublishError::Destination { reason: format!("invalid slug `{}`", slug) });
    }
    let Some(published_at) = metadata.published_at else {
        return Err(PublishError::Destination { reason: format!("post `{}` has no publish date", metadata.name) });
    };

    let mut link = String::new();
    if !config.url_prefix().is_empty() {
        link.push_str(config.url_prefix());
        link.push('/');
    }
    link.push_str(&format!("{:04}/{:02}/{}/", published_at.year(), published_at.month(), slug));
    Ok(link)
}

/// Where the rendered page of a post goes, relative to the output directory.
pub fn calculate_blog_dest(config: &Config, metadata: &PostMetadata) -> Result<PathBuf> {
    let link = post_link(config, metadata)?;
    Ok(PathBuf::from(link).join(PAGE_FILE_NAME))
}

/// Writes the post source, header first, to `dest`.
pub async fn write_post(post: &Post, dest: &Path) -> Result<()> {
    let body = post.body.trim_start_matches(['\r', '\n']);
    let content = format!("{}\n{}", render_header(&post.metadata), body);
    write_file(dest, content).await
}
