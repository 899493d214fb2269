//! Folio
//!
//! Client-side article handling for an AI article generator: formatting and
//! export of generated articles, rich clipboard copy, a per-category cache of
//! trending articles, the saved-article library, and article history with
//! favorites.

pub mod article;
pub mod category;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod library;
pub mod storage;
pub mod trending;

pub use article::Article;
pub use category::CategoryKey;
pub use error::{Error, Result};
