pub mod config;
pub mod logger;
pub mod error;
pub mod publish;
pub mod site;
pub mod draft;
pub mod post;
pub mod processor;
pub mod files;
pub mod content;
pub mod text_utils;
pub mod util;
pub mod view;
mod paginator;
mod test_data;
