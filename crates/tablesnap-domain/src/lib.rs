//! tablesnap-domain
//!
//! Type-erased row model shared by capture and replay.
//! No I/O, no database access. Only the record, value and artifact-format types.

pub mod artifact;
pub mod record;
pub mod value;

pub use artifact::ArtifactFormat;
pub use record::Record;
pub use value::{ColumnValue, TEMPORAL_FORMAT};
