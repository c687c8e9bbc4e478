mod category;
mod record;
mod retention;
mod selection;

pub use category::Category;
pub use record::{Page, Record, RecordKey, RecordValue};
pub use retention::{RetentionWindow, Verdict, should_delete};
pub use selection::{CategoryFlags, select_categories};
