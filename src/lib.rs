pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::time::Instant;

use sqlx::PgPool;

use crate::services::{
    admin_service::AdminService, application_service::ApplicationService,
    document_service::DocumentService, employer_service::EmployerService, job_service::JobService,
    otp_service::OtpService, sms_service::SmsService, upload_service::UploadService,
    user_service::UserService, worker_service::WorkerService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub users: UserService,
    pub otp: OtpService,
    pub sms: SmsService,
    pub workers: WorkerService,
    pub employers: EmployerService,
    pub jobs: JobService,
    pub applications: ApplicationService,
    pub documents: DocumentService,
    pub uploads: UploadService,
    pub admin: AdminService,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserService::new(pool.clone()),
            otp: OtpService::new(pool.clone()),
            sms: SmsService::new(),
            workers: WorkerService::new(pool.clone()),
            employers: EmployerService::new(pool.clone()),
            jobs: JobService::new(pool.clone()),
            applications: ApplicationService::new(pool.clone()),
            documents: DocumentService::new(pool.clone()),
            uploads: UploadService::new(pool.clone()),
            admin: AdminService::new(pool.clone()),
            pool,
            started_at: Instant::now(),
        }
    }
}
