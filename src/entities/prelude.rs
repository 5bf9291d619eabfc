pub use super::report_records::Entity as ReportRecords;
pub use super::users::Entity as Users;
