pub mod assistant;
pub mod auth;
pub mod calendar;
pub mod init;
pub mod reports;
pub mod validation;
