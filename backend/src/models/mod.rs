pub mod record;

pub use record::{Field, Record, RecordFields};
