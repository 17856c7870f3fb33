mod record;
pub mod users;

pub use record::UserRecord;
