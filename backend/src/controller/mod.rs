pub mod form;
pub mod list;

pub use form::{FormController, FormMode, FormState, SubmitOutcome};
pub use list::{ListEvent, ListState, ListStatus, RecordListController, WriteOutcome};
