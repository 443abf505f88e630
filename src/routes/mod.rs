pub mod admin;
pub mod applications;
pub mod auth;
pub mod documents;
pub mod employers;
pub mod health;
pub mod jobs;
pub mod upload;
pub mod workers;
