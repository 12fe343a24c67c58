//! Site-wide rebuild: the paginated post index and the RSS feed, both built
//! from what is in the `published` folder.

use std::collections::HashMap;
use std::path::PathBuf;

use spdlog::{info, warn};

use crate::config::{Config, SourceFolder};
use crate::content::metadata::get_metadata;
use crate::error::{PublishError, Result};
use crate::files::{list_posts, read_file, remove_dir, write_file};
use crate::paginator::Paginator;
use crate::post::{calculate_blog_dest, Post};
use crate::processor::{BlogProcessor, ProcessorContext, RenderedPost};
use crate::text_utils::{is_blank, slugify};
use crate::view::page_renderer::{PageRenderer, FEED_FILE_NAME};
use crate::view::rss_renderer::RssChannel;

const PAGE_FILE_NAME: &str = "index.html";
const PAGES_DIR: &str = "page";

/// Every published post, rendered, newest first. Ties are ordered by slug.
pub async fn load_published(config: &Config) -> Result<Vec<RenderedPost>> {
    let mut ctx = ProcessorContext::for_rebuild(config);
    let mut posts = vec![];

    for path in list_posts(&config.folder(SourceFolder::Published)).await? {
        let content = read_file(&path).await?;
        let source = get_metadata(&content).map_err(|e| PublishError::metadata(&path, e))?;

        if source.metadata.published_at.is_none() {
            warn!("Skipping {}: it has no publish date", path.display());
            continue;
        }

        // Hand-placed posts may have no slug
        let mut metadata = source.metadata;
        if is_blank(metadata.slug.as_deref()) {
            metadata.slug = Some(slugify(&metadata.name));
        }

        let post = Post {
            dest: calculate_blog_dest(config, &metadata)?,
            src: path,
            metadata,
            body: source.body,
        };
        posts.push(BlogProcessor::new(post).process(&mut ctx)?.into_rendered());
    }

    posts.sort_by(|a, b| {
        let a_md = &a.post.metadata;
        let b_md = &b.post.metadata;
        b_md.published_at.cmp(&a_md.published_at)
            .then_with(|| a.post.slug().cmp(b.post.slug()))
    });
    Ok(posts)
}

/// Tags of all posts, most used first, then by name.
fn collect_tags(posts: &[RenderedPost]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tag in posts.iter().flat_map(|p| p.post.metadata.tags.iter()) {
        *counts.entry(tag.as_str()).or_default() += 1;
    }

    let mut tags: Vec<(&str, usize)> = counts.into_iter().collect();
    tags.sort_by(|(a_tag, a_count), (b_tag, b_count)| b_count.cmp(a_count).then_with(|| a_tag.cmp(b_tag)));
    tags.into_iter().map(|(tag, _)| tag.to_string()).collect()
}

fn blog_root(config: &Config) -> PathBuf {
    let prefix = config.url_prefix();
    if prefix.is_empty() {
        config.paths.out_dir.clone()
    } else {
        config.paths.out_dir.join(prefix)
    }
}

fn page_path(config: &Config, page: u32) -> PathBuf {
    match page {
        0 | 1 => blog_root(config).join(PAGE_FILE_NAME),
        n => blog_root(config).join(PAGES_DIR).join(n.to_string()).join(PAGE_FILE_NAME),
    }
}

/// Regenerates the paginated post index. Returns the written pages.
pub async fn write_pages(config: &Config) -> Result<Vec<PathBuf>> {
    let posts = load_published(config).await?;
    write_pages_from(config, &posts).await
}

/// Writes the index pages of `posts`, already sorted. Pages left over from a
/// larger post set are removed first.
pub async fn write_pages_from(config: &Config, posts: &[RenderedPost]) -> Result<Vec<PathBuf>> {
    let renderer = PageRenderer::load(config).await?;
    let tags = collect_tags(posts);

    remove_dir(&blog_root(config).join(PAGES_DIR)).await?;

    let paginator = Paginator::new(posts, config.page_size());
    let mut written = vec![];

    for (number, page_posts) in paginator.pages() {
        let html = renderer.render_list(page_posts, number, paginator.page_count(), &tags);
        let path = page_path(config, number);
        write_file(&path, html).await?;
        written.push(path);
    }

    info!("Wrote {} index pages for {} posts", written.len(), posts.len());
    Ok(written)
}

/// Regenerates the RSS feed. Returns its path.
pub async fn write_rss(config: &Config) -> Result<PathBuf> {
    let posts = load_published(config).await?;
    write_rss_from(config, &posts).await
}

/// Writes the feed with the newest of `posts`, already sorted.
pub async fn write_rss_from(config: &Config, posts: &[RenderedPost]) -> Result<PathBuf> {
    let count = posts.len().min(config.feed_item_count());

    let channel = RssChannel {
        ch_title: config.feed_title(),
        ch_link: &config.site.url,
        ch_desc: config.feed_description(),
    };
    let xml = channel.render(&posts[..count])?;

    let path = blog_root(config).join(FEED_FILE_NAME);
    write_file(&path, xml).await?;

    info!("Wrote feed {} with {} items", path.display(), count);
    Ok(path)
}

/// Index pages, then the feed, from one read of the `published` folder.
pub async fn rebuild(config: &Config) -> Result<()> {
    let posts = load_published(config).await?;
    write_pages_from(config, &posts).await?;
    write_rss_from(config, &posts).await?;
    Ok(())
}
