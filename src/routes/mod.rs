use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};

use crate::{
    config::get_config,
    middleware::{
        auth::{authenticate, optional_auth, require_staff},
        rate_limit::{rps_middleware, RateLimiter},
    },
    AppState,
};

pub mod admin;
pub mod applications;
pub mod auth;
pub mod feedback;
pub mod health;
pub mod jobs;
pub mod users;

/// Every `/api` route with its auth and rate-limit layers. Groups that share a path
/// (job list/detail vs. job writes) are merged into one method router.
pub fn api_router(state: AppState) -> Router {
    let rps = get_config().api_rps;

    let public_api = Router::new()
        .route("/api/health", get(health::health))
        .route("/api/stats/dashboard", get(health::public_stats))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/token/refresh", post(auth::refresh))
        .route("/api/jobs/categories", get(jobs::categories))
        .route("/api/feedback/categories", get(feedback::categories))
        .layer(from_fn_with_state(RateLimiter::new(rps), rps_middleware));

    let browse_api = Router::new()
        .route("/api/jobs", get(jobs::list_jobs))
        .route("/api/jobs/latest", get(jobs::latest_jobs))
        .route("/api/jobs/hot", get(jobs::hot_jobs))
        .route("/api/jobs/:id", get(jobs::get_job))
        .route_layer(from_fn_with_state(state.clone(), optional_auth))
        .layer(from_fn_with_state(RateLimiter::new(rps), rps_middleware));

    let user_api = Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/users/me", get(users::me).patch(users::update_me))
        .route("/api/users/me/avatar", post(users::upload_avatar))
        .route(
            "/api/users/me/job-intention",
            get(users::get_job_intention).put(users::put_job_intention),
        )
        .route(
            "/api/users/me/resumes",
            get(users::list_resumes).post(users::upload_resume),
        )
        .route(
            "/api/users/me/resumes/:id",
            get(users::download_resume).delete(users::delete_resume),
        )
        .route(
            "/api/users/student-profiles",
            get(users::list_student_profiles),
        )
        .route(
            "/api/users/student-profiles/me",
            axum::routing::patch(users::update_student_profile),
        )
        .route(
            "/api/users/enterprise-profiles",
            get(users::list_enterprise_profiles),
        )
        .route(
            "/api/users/enterprise-profiles/me",
            axum::routing::put(users::upsert_enterprise_profile),
        )
        .route("/api/users/roles", get(users::list_roles))
        .route("/api/jobs", post(jobs::create_job))
        .route("/api/jobs/favorites", get(jobs::favorites))
        .route("/api/jobs/enterprise", get(jobs::enterprise_jobs))
        .route(
            "/api/jobs/:id",
            axum::routing::patch(jobs::update_job).delete(jobs::delete_job),
        )
        .route(
            "/api/jobs/:id/favorite",
            post(jobs::favorite_job).delete(jobs::unfavorite_job),
        )
        .route(
            "/api/applications",
            get(applications::list_applications).post(applications::apply),
        )
        .route(
            "/api/applications/interviews",
            get(applications::list_interviews),
        )
        .route(
            "/api/applications/interviews/:id",
            axum::routing::patch(applications::update_interview),
        )
        .route(
            "/api/applications/:id",
            get(applications::get_application).patch(applications::update_application),
        )
        .route("/api/applications/:id/approve", post(applications::approve))
        .route("/api/applications/:id/reject", post(applications::reject))
        .route("/api/applications/:id/withdraw", post(applications::withdraw))
        .route("/api/applications/:id/logs", get(applications::status_logs))
        .route(
            "/api/applications/:id/interviews",
            post(applications::schedule_interview),
        )
        .route(
            "/api/feedback",
            get(feedback::my_feedback).post(feedback::submit),
        )
        .route("/api/feedback/notifications", get(feedback::notifications))
        .route(
            "/api/feedback/notifications/unread-count",
            get(feedback::unread_count),
        )
        .route(
            "/api/feedback/notifications/mark-read",
            post(feedback::mark_all_read),
        )
        .route(
            "/api/feedback/notifications/:id/read",
            post(feedback::mark_read),
        )
        .route("/api/feedback/:id", get(feedback::detail))
        .route("/api/feedback/:id/reply", post(feedback::reply))
        .route_layer(from_fn_with_state(state.clone(), authenticate))
        .layer(from_fn_with_state(RateLimiter::new(rps), rps_middleware));

    let admin_api = Router::new()
        .route("/api/admin/dashboard/stats", get(admin::dashboard_stats))
        .route("/api/admin/users", get(admin::list_users))
        .route(
            "/api/admin/users/:id/toggle-status",
            post(admin::toggle_user_status),
        )
        .route(
            "/api/admin/users/:id/reset-password",
            post(admin::reset_password),
        )
        .route("/api/admin/jobs", get(admin::list_jobs))
        .route("/api/admin/jobs/:id/status", post(admin::change_job_status))
        .route(
            "/api/admin/jobs/:id/applications",
            get(admin::job_applications),
        )
        .route("/api/admin/feedbacks", get(admin::list_feedbacks))
        .route(
            "/api/admin/feedbacks/:id/reply",
            post(admin::reply_feedback),
        )
        .route(
            "/api/admin/feedbacks/:id/status",
            post(admin::change_feedback_status),
        )
        .route(
            "/api/admin/system/settings",
            get(admin::get_settings).post(admin::update_settings),
        )
        .route_layer(from_fn(require_staff))
        .route_layer(from_fn_with_state(state.clone(), authenticate))
        .layer(from_fn_with_state(RateLimiter::new(rps), rps_middleware));

    public_api
        .merge(browse_api)
        .merge(user_api)
        .merge(admin_api)
        .with_state(state)
}
