mod global_ban;
mod modlog_entry;
mod rater_assignment;
mod server_record;

pub use global_ban::GlobalBan;
pub use modlog_entry::{ModAction, ModlogEntry};
pub use rater_assignment::RaterAssignment;
pub use server_record::{ServerClass, ServerRecord};
