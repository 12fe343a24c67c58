use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::{env, fmt, fs, io};

use serde::Deserialize;
use thiserror::Error;

pub const CFG_FILE_NAME: &str = "aurelia-docs.toml";

const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_SUMMARY_TAG: &str = "<!-- more -->";
const DEFAULT_URL_PREFIX: &str = "blog";
const DEFAULT_FEED_ITEMS: u32 = 20;

#[derive(Deserialize, Debug, Clone)]
pub struct Site {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Paths {
    pub blog_src: PathBuf,
    pub out_dir: PathBuf,
    pub template_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Defaults {
    pub page_size: Option<u32>,
    pub summary_tag: Option<String>,
    pub url_prefix: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RssFeed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub item_count: Option<u32>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Copy, Clone)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Project configuration. Every operation receives it explicitly.
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub site: Site,
    pub paths: Paths,
    #[serde(default)]
    pub defaults: Defaults,
    pub rss_feed: Option<RssFeed>,
    pub log: Option<Log>,
}

/// The two folders posts live in under `paths.blog_src`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SourceFolder {
    Drafts,
    Published,
}

impl SourceFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFolder::Drafts => "drafts",
            SourceFolder::Published => "published",
        }
    }
}

impl Display for SourceFolder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error opening configuration file `{0}`: {1}")]
    Io(PathBuf, #[source] io::Error),

    #[error("Error parsing configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

impl Config {
    pub fn folder(&self, folder: SourceFolder) -> PathBuf {
        self.paths.blog_src.join(folder.as_str())
    }

    pub fn page_size(&self) -> u32 {
        self.defaults.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn summary_tag(&self) -> &str {
        self.defaults.summary_tag.as_deref().unwrap_or(DEFAULT_SUMMARY_TAG)
    }

    /// Directory under `out_dir` holding posts, index pages and the feed.
    pub fn url_prefix(&self) -> &str {
        self.defaults
            .url_prefix
            .as_deref()
            .unwrap_or(DEFAULT_URL_PREFIX)
            .trim_matches('/')
    }

    pub fn feed_title(&self) -> &str {
        self.rss_feed
            .as_ref()
            .and_then(|f| f.title.as_deref())
            .unwrap_or(&self.site.title)
    }

    pub fn feed_description(&self) -> &str {
        self.rss_feed
            .as_ref()
            .and_then(|f| f.description.as_deref())
            .unwrap_or(&self.site.description)
    }

    pub fn feed_item_count(&self) -> usize {
        self.rss_feed
            .as_ref()
            .and_then(|f| f.item_count)
            .unwrap_or(DEFAULT_FEED_ITEMS) as usize
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size() == 0 {
            return Err(ConfigError::Validation("defaults.page_size must be at least 1".to_string()));
        }
        if self.site.url.trim().is_empty() {
            return Err(ConfigError::Validation("site.url cannot be empty".to_string()));
        }
        if self.url_prefix().split('/').any(|part| part == "..") {
            return Err(ConfigError::Validation(format!("defaults.url_prefix cannot contain `..`: {}", self.url_prefix())));
        }
        Ok(())
    }
}

fn parse_path(path: PathBuf, base_dir: &Path) -> Result<PathBuf, ConfigError> {
    let path = if path.starts_with("${exe_dir}") {
        let cur_exe = env::current_exe().map_err(|e| ConfigError::Io(path.clone(), e))?;
        let exe_dir = cur_exe.parent().unwrap_or(Path::new("."));
        let str_path = path.to_string_lossy();
        PathBuf::from(str_path.replace("${exe_dir}", &exe_dir.to_string_lossy()))
    } else {
        path
    };

    if path.is_relative() {
        Ok(base_dir.join(path))
    } else {
        Ok(path)
    }
}

/// Parses a configuration, resolving relative paths against `base_dir`.
pub fn parse_config(cfg_content: &str, base_dir: &Path) -> Result<Config, ConfigError> {
    let mut cfg: Config = toml::from_str(cfg_content)?;

    cfg.paths = Paths {
        blog_src: parse_path(cfg.paths.blog_src, base_dir)?,
        out_dir: parse_path(cfg.paths.out_dir, base_dir)?,
        template_dir: cfg.paths.template_dir.map(|p| parse_path(p, base_dir)).transpose()?,
    };

    if let Some(mut log) = cfg.log.take() {
        log.location = log.location.map(|p| parse_path(p, base_dir)).transpose()?;
        cfg.log = Some(log);
    }

    cfg.validate()?;
    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> Result<Config, ConfigError> {
    let cfg_content = fs::read_to_string(cfg_path).map_err(|e| ConfigError::Io(cfg_path.to_path_buf(), e))?;
    let base_dir = cfg_path.parent().unwrap_or(Path::new("."));
    parse_config(&cfg_content, base_dir)
}

#[cfg(test)]
mod tests {
    use crate::test_data::CONFIG_DATA;

    use super::*;

    #[test]
    fn test_parse_config() {
        let cfg = parse_config(CONFIG_DATA, Path::new("/srv/site")).unwrap();
        assert_eq!(cfg.site.title, "Aurelia Blog");
        assert_eq!(cfg.paths.blog_src, PathBuf::from("/srv/site/blog/src"));
        assert_eq!(cfg.paths.out_dir, PathBuf::from("/srv/site/public"));
        assert_eq!(cfg.paths.template_dir, None);
        assert_eq!(cfg.folder(SourceFolder::Drafts), PathBuf::from("/srv/site/blog/src/drafts"));
        assert_eq!(cfg.folder(SourceFolder::Published), PathBuf::from("/srv/site/blog/src/published"));
        assert_eq!(cfg.page_size(), 2);
        assert_eq!(cfg.summary_tag(), "<!-- more -->");
        assert_eq!(cfg.url_prefix(), "blog");
        assert_eq!(cfg.feed_title(), "Aurelia feed");
        assert_eq!(cfg.feed_description(), "Aurelia Blog posts");
        assert_eq!(cfg.feed_item_count(), 20);
    }

    #[test]
    fn test_absolute_paths_kept() {
        let toml_str = r##"
[site]
title = "t"
url = "https://example.com"

[paths]
blog_src = "/abs/src"
out_dir = "out"
template_dir = "/abs/template"

[defaults]
url_prefix = "/posts/"
"##;
        let cfg = parse_config(toml_str, Path::new("/base")).unwrap();
        assert_eq!(cfg.paths.blog_src, PathBuf::from("/abs/src"));
        assert_eq!(cfg.paths.out_dir, PathBuf::from("/base/out"));
        assert_eq!(cfg.paths.template_dir, Some(PathBuf::from("/abs/template")));
        assert_eq!(cfg.url_prefix(), "posts");
        assert_eq!(cfg.feed_title(), "t");
        assert_eq!(cfg.page_size(), 10);
    }

    #[test]
    fn test_sample_config() {
        let cfg = parse_config(include_str!("../res/aurelia-docs.toml"), Path::new("/srv/site")).unwrap();
        assert_eq!(cfg.paths.blog_src, PathBuf::from("/srv/site/blog"));
        assert_eq!(cfg.feed_title(), "My blog posts");
        assert_eq!(cfg.feed_description(), "Notes about programming");
        assert!(matches!(cfg.log.map(|l| l.level), Some(LogLevel::Info)));
    }

    #[test]
    fn test_invalid_config() {
        let toml_str = r##"
[site]
title = "t"
url = "https://example.com"

[paths]
blog_src = "src"
out_dir = "out"

[defaults]
page_size = 0
"##;
        let err = parse_config(toml_str, Path::new("/base")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = parse_config("[site]\ntitle = 1", Path::new("/base")).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = read_config(Path::new("/does/not/exist/aurelia-docs.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_, _)));
    }
}
