mod day_group;
mod entry;
mod insulin;
mod record;

pub use day_group::DayGroup;
pub use entry::{Entry, MAX_BREAD_UNITS, MAX_COMMENT_CHARS, MAX_INSULIN_UNITS, MAX_SUGAR};
pub use insulin::{Insulin, InsulinKind};
pub use record::{DayRecord, EntryRecord};
