//! Promotion of drafts into published posts, followed by the site rebuild.

use std::path::PathBuf;

use futures::future::try_join_all;
use spdlog::{debug, info};

use crate::config::{Config, SourceFolder};
use crate::content::metadata::{get_metadata, normalize, now};
use crate::error::{PublishError, Result};
use crate::files::{delete_file, read_dir, read_file, read_file_if_exists};
use crate::post::{calculate_blog_dest, write_post, Post};
use crate::processor::{BlogProcessor, ProcessorContext};
use crate::site::rebuild;
use crate::view::page_renderer::PageRenderer;

const ALL_FLAG: &str = "--all";
const NO_DATE_FLAG: &str = "--no-date";

#[derive(Debug, Clone, PartialEq)]
pub enum PublishTarget {
    All,
    File(String),
}

/// Whether publishing sets `updated_at` to now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateMode {
    Refresh,
    Preserve,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishArgs {
    pub target: PublishTarget,
    pub date_mode: DateMode,
}

impl PublishArgs {
    /// `[file | --all, [--no-date]]`. Anything other than `--no-date` in the
    /// second position keeps the default of refreshing `updated_at`.
    pub fn parse(args: &[String]) -> Result<PublishArgs> {
        let (which, date_flag) = match args {
            [] => return Err(PublishError::Args("expected a file name or `--all`".to_string())),
            [which] => (which, None),
            [which, flag] => (which, Some(flag)),
            _ => return Err(PublishError::Args(format!("too many arguments: {}", args.join(" ")))),
        };

        let target = if which == ALL_FLAG {
            PublishTarget::All
        } else if which.is_empty() || which.contains(['/', '\\']) {
            return Err(PublishError::Args(format!("`{}` is not a file name", which)));
        } else {
            PublishTarget::File(which.clone())
        };

        let date_mode = match date_flag.map(String::as_str) {
            Some(NO_DATE_FLAG) => DateMode::Preserve,
            _ => DateMode::Refresh,
        };

        Ok(PublishArgs { target, date_mode })
    }
}

/// Publishes `file_name` from `folder`.
///
/// The rendered page goes to the output directory, the post source with its
/// normalized header to the `published` folder. A source outside the
/// `published` folder is deleted once both writes are done.
pub async fn publish(config: &Config, renderer: &PageRenderer, folder: SourceFolder, file_name: &str, refresh: bool) -> Result<Post> {
    let src = config.folder(folder).join(file_name);
    let published_path = config.folder(SourceFolder::Published).join(file_name);
    info!("Publishing {}", src.display());

    let content = read_file(&src).await?;
    let source = get_metadata(&content).map_err(|e| PublishError::metadata(&src, e))?;

    let previous = if src == published_path {
        None
    } else {
        match read_file_if_exists(&published_path).await? {
            Some(content) => {
                let previous = get_metadata(&content).map_err(|e| PublishError::metadata(&published_path, e))?;
                Some(previous.metadata)
            }
            None => None,
        }
    };

    let metadata = normalize(previous.as_ref(), source.metadata, refresh, now())
        .map_err(|e| PublishError::metadata(&src, e))?;
    let dest = calculate_blog_dest(config, &metadata)?;
    debug!("Destination of {} is {}", src.display(), dest.display());

    let post = Post {
        src,
        dest,
        metadata,
        body: source.body,
    };

    let mut ctx = ProcessorContext::new(config);
    let writer = BlogProcessor::new(post).process(&mut ctx)?;
    writer.write(renderer, &config.paths.out_dir).await?;

    let post = writer.into_rendered().post;
    write_post(&post, &published_path).await?;

    if post.src != published_path {
        delete_file(&post.src).await?;
    }

    info!("Published {} as {}", published_path.display(), post.dest.display());
    Ok(post)
}

async fn list_folder(config: &Config, folder: SourceFolder) -> Result<Vec<String>> {
    match read_dir(&config.folder(folder)).await {
        Ok(names) => Ok(names),
        Err(e) if e.is_not_found() => Ok(vec![]),
        Err(e) => Err(e),
    }
}

/// Publishes the posts named by `args`, then rebuilds the index pages and
/// the feed. With `update` the posts are taken from the `published` folder
/// instead of `drafts`.
///
/// `--all` publishes every post of the folder concurrently. The first
/// failure ends the batch and nothing is rebuilt.
///
/// A file name is a plain name inside the source folder. Names with a path
/// separator, such as `sub/post.md`, are rejected with [`PublishError::Args`].
pub async fn publish_blog(config: &Config, update: bool, args: &[String]) -> Result<Vec<PathBuf>> {
    let args = PublishArgs::parse(args)?;
    let folder = if update { SourceFolder::Published } else { SourceFolder::Drafts };
    let refresh = args.date_mode == DateMode::Refresh;
    let renderer = PageRenderer::load(config).await?;

    let posts = match args.target {
        PublishTarget::All => {
            let names = list_folder(config, folder).await?;
            info!("Publishing {} posts from {}", names.len(), folder);
            try_join_all(names.iter().map(|name| publish(config, &renderer, folder, name, refresh))).await?
        }
        PublishTarget::File(ref name) => vec![publish(config, &renderer, folder, name, refresh).await?],
    };

    rebuild(config).await?;

    Ok(posts.into_iter().map(|post| config.paths.out_dir.join(post.dest)).collect())
}
