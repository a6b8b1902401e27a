pub mod feed;
pub mod margins;
pub mod settings;
pub mod template;
