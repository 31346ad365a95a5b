//! math-glossary - A REST API for a categorized math glossary
//!
//! This crate serves create/list endpoints for five math categories
//! (geometry, algebra, combinatorics, trigonometry, arithmetic) with:
//! - One SQLite table per category, accessed through parameterized statements
//! - Optional image attachments for geometry entries, stored on disk under
//!   collision-free names and served back via /uploads
//! - Legacy-compatible routes, field aliases, and response messages

pub mod api;
pub mod attachments;
pub mod category;
pub mod config;
pub mod storage;

use std::sync::Arc;

use config::Config;
use storage::Database;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub attachments: Arc<dyn attachments::AttachmentStore>,
}
