mod admin;
mod records;
mod uploads;

pub use admin::{admin_purge, health};
pub use records::{
    create_geometry_record, create_record, list_geometry_records, list_records,
};
pub use uploads::serve_attachment;
