use serde::{Deserialize, Serialize};

/// One stored glossary entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Assigned by the database, never by the client.
    pub id: i64,
    pub title: String,
    pub definition: String,
    /// Stored attachment filename. Only geometry entries ever carry one.
    #[serde(default)]
    pub attachment: Option<String>,
}
