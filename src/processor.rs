//! The processing pipeline: a post goes in, a writer able to put its rendered
//! page on disk comes out.

use std::path::{Path, PathBuf};

use markdown::Options;
use spdlog::{debug, warn};

use crate::config::Config;
use crate::content::parsing_utils::{remove_comments, split_summary, strip_title};
use crate::error::{PublishError, Result};
use crate::files::write_file;
use crate::post::Post;
use crate::view::page_renderer::PageRenderer;

/// State shared by every step of one processing run.
pub struct ProcessorContext {
    break_tag: String,
    diagnostics: Vec<String>,
    quiet: bool,
}

impl ProcessorContext {
    pub fn new(config: &Config) -> Self {
        ProcessorContext {
            break_tag: config.summary_tag().to_string(),
            diagnostics: vec![],
            quiet: false,
        }
    }

    /// Context for re-rendering already published posts. Diagnostics are
    /// logged at debug level.
    pub fn for_rebuild(config: &Config) -> Self {
        ProcessorContext {
            quiet: true,
            ..ProcessorContext::new(config)
        }
    }

    pub fn warn(&mut self, message: String) {
        if self.quiet {
            debug!("{}", message);
        } else {
            warn!("{}", message);
        }
        self.diagnostics.push(message);
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }
}

/// A post with its body rendered to HTML.
#[derive(Debug, Clone)]
pub struct RenderedPost {
    pub post: Post,
    /// Site-relative URL path, `blog/2024/05/slug/`.
    pub link: String,
    pub content: String,
    pub summary: String,
    /// Whether `summary` stops before the end of the post.
    pub summarized: bool,
}

pub struct BlogProcessor {
    post: Post,
}

fn render_markdown(src: &Path, md_text: &str) -> Result<String> {
    let render_error = |reason: String| PublishError::Render {
        path: src.to_path_buf(),
        reason,
    };

    let buf = remove_comments(md_text).map_err(render_error)?;
    markdown::to_html_with_options(&buf, &Options::gfm()).map_err(|e| render_error(e.reason.to_string()))
}

/// `blog/2024/05/slug/index.html` becomes `blog/2024/05/slug/`.
fn link_from_dest(dest: &Path) -> String {
    let dir = dest.parent().unwrap_or(Path::new(""));
    let mut link = dir.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    link.push('/');
    link
}

impl BlogProcessor {
    pub fn new(post: Post) -> Self {
        BlogProcessor { post }
    }

    pub fn process(self, ctx: &mut ProcessorContext) -> Result<BlogWriter> {
        let post = self.post;
        let body = strip_title(&post.body);

        if body.trim().is_empty() {
            ctx.warn(format!("Post {} has an empty body", post.src.display()));
        }

        let (summary_md, summarized) = split_summary(body, &ctx.break_tag);
        if !summarized {
            ctx.warn(format!("Post {} has no `{}`, the whole post is its summary", post.src.display(), ctx.break_tag));
        }

        let content = render_markdown(&post.src, &body.replace(&ctx.break_tag, ""))?;
        let summary = render_markdown(&post.src, summary_md)?;

        Ok(BlogWriter {
            rendered: RenderedPost {
                link: link_from_dest(&post.dest),
                post,
                content,
                summary,
                summarized,
            },
        })
    }
}

/// Puts the page of a processed post on disk.
pub struct BlogWriter {
    rendered: RenderedPost,
}

impl BlogWriter {
    pub fn rendered(&self) -> &RenderedPost {
        &self.rendered
    }

    pub fn into_rendered(self) -> RenderedPost {
        self.rendered
    }

    /// Renders the post page and writes it below `out_dir`. Returns the path
    /// written.
    pub async fn write(&self, renderer: &PageRenderer, out_dir: &Path) -> Result<PathBuf> {
        let page = renderer.render_post(&self.rendered);
        let path = out_dir.join(&self.rendered.post.dest);
        write_file(&path, page).await?;
        Ok(path)
    }
}
