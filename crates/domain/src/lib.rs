pub mod date;
mod reminder;
mod shared;
mod today_set;

pub use reminder::{InvalidPayloadKind, PayloadKind, Reminder};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use today_set::TodaySet;
