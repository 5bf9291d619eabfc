pub mod prelude;

pub mod report_records;
pub mod users;
