pub mod property;

pub use property::{MissingFieldPolicy, PropertyRecord, RecordField};
