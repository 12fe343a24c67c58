use std::path::Path;

use ramhorns::Template;

use crate::config::Config;
use crate::error::{PublishError, Result};
use crate::files::read_file_if_exists;
use crate::processor::RenderedPost;
use crate::text_utils::format_date_time;

const POST_TEMPLATE: &str = "post.tpl";
const LIST_TEMPLATE: &str = "postlist.tpl";
const DEFAULT_POST_TEMPLATE: &str = include_str!("../../res/template/post.tpl");
const DEFAULT_LIST_TEMPLATE: &str = include_str!("../../res/template/postlist.tpl");

pub const FEED_FILE_NAME: &str = "rss.xml";

#[derive(ramhorns::Content)]
struct ViewTag<'a> {
    tag: &'a str,
}

#[derive(ramhorns::Content)]
struct ViewItem<'a> {
    site_title: &'a str,
    index_link: &'a str,
    feed_link: &'a str,
    permalink: &'a str,
    id: &'a str,
    author: &'a str,
    has_author: bool,
    tags: Vec<ViewTag<'a>>,
    published_date: &'a str,
    published_time: &'a str,
    updated_date: &'a str,
    was_updated: bool,
    post_title: &'a str,
    post_description: &'a str,
    has_description: bool,
    post_content: &'a str,
}

#[derive(ramhorns::Content)]
struct ListPage<'a> {
    site_title: &'a str,
    site_description: &'a str,
    index_link: &'a str,
    feed_link: &'a str,
    post_list: Vec<PostItem>,
    tags: Vec<ViewTag<'a>>,
    page_list: Vec<ViewPagination>,
    show_pagination: bool,
}

#[derive(ramhorns::Content)]
struct PostItem {
    date: String,
    time: String,
    link: String,
    title: String,
    summary: String,
    summarized: bool,
}

#[derive(ramhorns::Content)]
struct ViewPagination {
    current: bool,
    number: u32,
    link: String,
}

/// Renders post pages and index pages for one site.
pub struct PageRenderer {
    post_template: Template<'static>,
    list_template: Template<'static>,
    site_title: String,
    site_description: String,
    site_url: String,
    url_prefix: String,
}

async fn load_template(template_dir: Option<&Path>, name: &str, default: &'static str) -> Result<Template<'static>> {
    let source = match template_dir {
        Some(dir) => read_file_if_exists(&dir.join(name)).await?,
        None => None,
    };

    let template = match source {
        Some(src) => Template::new(src),
        None => Template::new(default),
    };

    template.map_err(|e| PublishError::Template {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

impl PageRenderer {
    /// Loads `post.tpl` and `postlist.tpl` from the template directory,
    /// falling back to the built-in templates for missing files.
    pub async fn load(config: &Config) -> Result<PageRenderer> {
        let template_dir = config.paths.template_dir.as_deref();
        let post_template = load_template(template_dir, POST_TEMPLATE, DEFAULT_POST_TEMPLATE).await?;
        let list_template = load_template(template_dir, LIST_TEMPLATE, DEFAULT_LIST_TEMPLATE).await?;

        Ok(PageRenderer {
            post_template,
            list_template,
            site_title: config.site.title.clone(),
            site_description: config.site.description.clone(),
            site_url: config.site.url.trim_end_matches('/').to_string(),
            url_prefix: config.url_prefix().to_string(),
        })
    }

    /// Site-relative link of a page below the blog root: `/<prefix>/<path>`.
    fn local_link(&self, path: &str) -> String {
        if self.url_prefix.is_empty() {
            format!("/{}", path)
        } else {
            format!("/{}/{}", self.url_prefix, path)
        }
    }

    pub fn index_link(&self) -> String {
        self.local_link("")
    }

    pub fn page_link(&self, number: u32) -> String {
        match number {
            0 | 1 => self.index_link(),
            n => self.local_link(&format!("page/{}/", n)),
        }
    }

    pub fn feed_link(&self) -> String {
        self.local_link(FEED_FILE_NAME)
    }

    pub fn render_post(&self, rendered: &RenderedPost) -> String {
        let metadata = &rendered.post.metadata;
        let tags: Vec<ViewTag> = metadata.tags.iter().map(|t| ViewTag { tag: t.as_str() }).collect();
        let (published_date, published_time) = metadata.published_at.as_ref().map(format_date_time).unwrap_or_default();
        let (updated_date, _) = metadata.updated_at.as_ref().map(format_date_time).unwrap_or_default();
        let permalink = format!("{}/{}", self.site_url, rendered.link);
        let author = metadata.author.as_deref().unwrap_or_default();
        let description = metadata.description.as_deref().unwrap_or_default();

        self.post_template.render(&ViewItem {
            site_title: &self.site_title,
            index_link: &self.index_link(),
            feed_link: &self.feed_link(),
            permalink: &permalink,
            id: metadata.id.as_ref().map(|id| id.0.as_str()).unwrap_or_default(),
            author,
            has_author: !author.is_empty(),
            tags,
            published_date: &published_date,
            published_time: &published_time,
            updated_date: &updated_date,
            was_updated: !updated_date.is_empty() && updated_date != published_date,
            post_title: &metadata.name,
            post_description: description,
            has_description: !description.is_empty(),
            post_content: &rendered.content,
        })
    }

    /// Renders index page `cur_page` (1 based) out of `page_count`.
    pub fn render_list(&self, posts: &[RenderedPost], cur_page: u32, page_count: u32, tags: &[String]) -> String {
        let post_list = posts.iter()
            .map(|rendered| {
                let (date, time) = rendered.post.metadata.published_at.as_ref().map(format_date_time).unwrap_or_default();
                PostItem {
                    date,
                    time,
                    link: format!("/{}", rendered.link),
                    title: rendered.post.metadata.name.clone(),
                    summary: rendered.summary.clone(),
                    summarized: rendered.summarized,
                }
            })
            .collect();

        let page_list = (1..=page_count)
            .map(|number| ViewPagination {
                current: number == cur_page,
                number,
                link: self.page_link(number),
            })
            .collect();

        self.list_template.render(&ListPage {
            site_title: &self.site_title,
            site_description: &self.site_description,
            index_link: &self.index_link(),
            feed_link: &self.feed_link(),
            post_list,
            tags: tags.iter().map(|t| ViewTag { tag: t.as_str() }).collect(),
            page_list,
            show_pagination: page_count > 1,
        })
    }
}
