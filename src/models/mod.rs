pub mod application;
pub mod document;
pub mod employer;
pub mod job;
pub mod upload;
pub mod user;
pub mod worker;
