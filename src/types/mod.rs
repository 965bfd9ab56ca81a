pub mod clip;
pub mod config;
pub mod error;
pub mod history;
pub mod project;
pub mod selection;
pub mod session;
pub mod timeline;
pub mod track;
