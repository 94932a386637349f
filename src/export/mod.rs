//! Output writers: comment blocks for tags and the failure report

pub mod comment;
pub mod report;

pub use comment::{build_payload, serialize_record};
pub use report::write_report;
