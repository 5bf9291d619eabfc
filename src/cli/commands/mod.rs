mod records;
mod user;

pub use records::cmd_records;
pub use user::cmd_user;
