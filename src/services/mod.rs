pub mod admin_service;
pub mod application_service;
pub mod document_service;
pub mod employer_service;
pub mod job_service;
pub mod otp_service;
pub mod sms_service;
pub mod upload_service;
pub mod user_service;
pub mod worker_service;
