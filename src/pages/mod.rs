pub mod admin_dashboard;
pub mod book;
pub mod dashboard;
pub mod login;
