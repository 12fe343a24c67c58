use std::fmt::Write;
use std::path::PathBuf;

use spdlog::info;
use uuid::Uuid;

use crate::config::{Config, SourceFolder};
use crate::error::{PublishError, Result};
use crate::files::create_file;
use crate::text_utils::slugify;
use crate::util::os_helper::get_name;

fn render_header(id: &str, title: &str, author: &str, break_tag: &str) -> String {
    let mut buf = String::new();

    let _ = writeln!(&mut buf, "<!--");
    let _ = writeln!(&mut buf, "[ID]: # ({})", id);
    let _ = writeln!(&mut buf, "[NAME]: # ({})", title);
    let _ = writeln!(&mut buf, "[AUTHOR]: # ({})", author);
    let _ = writeln!(&mut buf, "[TAGS]: # ()");
    let _ = writeln!(&mut buf, "-->");
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "# {}", title);
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "This is a body example");
    let _ = writeln!(&mut buf, "Please remove it and replace with your content");
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "{}", break_tag);
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "And this is the rest of your post");
    buf
}

/// Creates `<blog_src>/drafts/<slug>.md` for a new post. An existing draft
/// with the same slug is left alone and reported as an error.
pub async fn create_draft(config: &Config, title: &str, author: Option<&str>) -> Result<PathBuf> {
    let title = title.trim();
    let slug = slugify(title);
    if slug.is_empty() {
        return Err(PublishError::Args(format!("cannot build a file name from the title `{}`", title)));
    }

    let author = match author {
        Some(name) => name.to_string(),
        None => get_name(),
    };

    let path = config.folder(SourceFolder::Drafts).join(format!("{}.md", slug));
    let content = render_header(&Uuid::new_v4().to_string(), title, &author, config.summary_tag());
    create_file(&path, content).await?;

    info!("Created draft {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use crate::config::parse_config;
    use crate::content::metadata::get_metadata;
    use crate::test_data::{CONFIG_DATA, NEW_DRAFT_DATA};

    use super::*;

    #[test]
    fn test_render_header() {
        let header = render_header("bcfc427f-f9f3-4442-bfc2-deca95db96d5", "This is a title", "Jane", "<!-- more -->");
        assert_eq!(header, NEW_DRAFT_DATA);
    }

    #[tokio::test]
    async fn test_create_draft() {
        let dir = tempfile::tempdir().unwrap();
        let config = parse_config(CONFIG_DATA, dir.path()).unwrap();

        let path = create_draft(&config, "Post title of mine ábaco", Some("Jane")).await.unwrap();
        assert_eq!(path, dir.path().join("blog/src/drafts/post-title-of-mine-abaco.md"));

        let source = get_metadata(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(source.metadata.name, "Post title of mine ábaco");
        assert_eq!(source.metadata.author.as_deref(), Some("Jane"));
        assert!(source.metadata.id.is_some());
        assert!(source.metadata.published_at.is_none());
        assert!(source.body.contains("<!-- more -->"));

        let err = create_draft(&config, "Post title of mine ábaco", None).await.unwrap_err();
        assert!(matches!(err, PublishError::Io { .. }));
        assert!(matches!(create_draft(&config, "???", None).await, Err(PublishError::Args(_))));
    }
}
