pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    application_service::ApplicationService, feedback_service::FeedbackService,
    job_service::JobService, notification_service::NotificationService,
    stats_service::StatsService, user_service::UserService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub user_service: UserService,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub feedback_service: FeedbackService,
    pub notification_service: NotificationService,
    pub stats_service: StatsService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let user_service = UserService::new(pool.clone());
        let job_service = JobService::new(pool.clone());
        let application_service = ApplicationService::new(pool.clone());
        let feedback_service = FeedbackService::new(pool.clone());
        let notification_service = NotificationService::new(pool.clone());
        let stats_service = StatsService::new(pool.clone());

        Self {
            pool,
            user_service,
            job_service,
            application_service,
            feedback_service,
            notification_service,
            stats_service,
        }
    }
}
