pub mod page_renderer;
pub mod rss_renderer;
