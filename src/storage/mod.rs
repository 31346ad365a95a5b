pub mod db;
pub mod models;
mod records;

pub use db::{Database, DatabaseError};
