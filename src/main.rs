use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{delete, get, patch, post},
    Router,
};
use labourlink_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware::{auth, rate_limit},
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let require_auth = axum::middleware::from_fn_with_state(app_state.clone(), auth::auth);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let auth_api = Router::new()
        .route("/api/auth/set-password", post(routes::auth::set_password))
        .route(
            "/api/auth/change-password",
            post(routes::auth::change_password),
        )
        .route("/api/auth/me", get(routes::auth::me))
        .route("/api/auth/logout", post(routes::auth::logout))
        .layer(require_auth.clone())
        .route("/api/auth/otp/send", post(routes::auth::send_otp))
        .route("/api/auth/otp/verify", post(routes::auth::verify_otp))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/refresh-token", post(routes::auth::refresh_token))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::new_limiter(config.rate_limit_max, config.rate_limit_window_secs),
            rate_limit::rate_limit_middleware,
        ));

    // Profile and job routers mix public and authenticated methods on the
    // same paths, so they authenticate through the AuthUser extractor
    // instead of a router-wide layer.
    let worker_api = Router::new()
        .route(
            "/api/workers",
            get(routes::workers::list_workers).post(routes::workers::upsert_worker),
        )
        .route(
            "/api/workers/:id",
            get(routes::workers::get_worker)
                .put(routes::workers::update_worker)
                .delete(routes::workers::delete_worker),
        )
        .route(
            "/api/workers/:id/availability",
            patch(routes::workers::set_availability),
        )
        .route("/api/workers/:id/jobs", get(routes::workers::job_history));

    let employer_api = Router::new()
        .route(
            "/api/employers",
            get(routes::employers::list_employers).post(routes::employers::upsert_employer),
        )
        .route(
            "/api/employers/:id",
            get(routes::employers::get_employer)
                .put(routes::employers::update_employer)
                .delete(routes::employers::delete_employer),
        )
        .route(
            "/api/employers/:id/jobs",
            get(routes::employers::employer_jobs),
        );

    let job_api = Router::new()
        .route(
            "/api/jobs",
            get(routes::jobs::list_jobs).post(routes::jobs::create_job),
        )
        .route(
            "/api/jobs/urgent/all",
            get(routes::jobs::urgent_jobs),
        )
        .route("/api/jobs/employer/my-jobs", get(routes::jobs::my_jobs))
        .route("/api/jobs/stats/overview", get(routes::jobs::job_stats))
        .route(
            "/api/jobs/:id",
            get(routes::jobs::get_job)
                .patch(routes::jobs::update_job)
                .delete(routes::jobs::delete_job),
        );

    let application_api = Router::new()
        .route(
            "/api/applications",
            get(routes::applications::list_applications).post(routes::applications::apply),
        )
        .route(
            "/api/applications/stats/overview",
            get(routes::applications::application_stats),
        )
        .route(
            "/api/applications/:id",
            get(routes::applications::get_application)
                .delete(routes::applications::delete_application),
        )
        .route(
            "/api/applications/:id/status",
            patch(routes::applications::update_status),
        )
        .route(
            "/api/applications/:id/withdraw",
            patch(routes::applications::withdraw),
        )
        .layer(require_auth.clone());

    let document_api = Router::new()
        .route(
            "/api/documents/upload",
            post(routes::documents::upload_document),
        )
        .route(
            "/api/documents/my-documents",
            get(routes::documents::my_documents),
        )
        .route(
            "/api/documents/stats/overview",
            get(routes::documents::document_stats),
        )
        .route(
            "/api/documents/:id",
            get(routes::documents::get_document)
                .put(routes::documents::update_document)
                .delete(routes::documents::delete_document),
        )
        .route(
            "/api/documents/:id/verify",
            patch(routes::documents::verify_document),
        )
        .layer(require_auth.clone());

    let upload_api = Router::new()
        .route("/api/upload/single", post(routes::upload::upload_single))
        .route(
            "/api/upload/profile-picture",
            post(routes::upload::upload_profile_picture),
        )
        .route(
            "/api/upload/company-logo",
            post(routes::upload::upload_company_logo),
        )
        .route("/api/upload/my-files", get(routes::upload::my_files))
        .route("/api/upload/:id", delete(routes::upload::delete_file))
        .layer(require_auth.clone());

    let admin_api = Router::new()
        .route("/api/admin/overview", get(routes::admin::overview))
        .route("/api/admin/users", get(routes::admin::list_users))
        .route("/api/admin/users/:id", get(routes::admin::get_user))
        .route(
            "/api/admin/users/:id/status",
            patch(routes::admin::set_user_status),
        )
        .route("/api/admin/workers", get(routes::admin::list_workers))
        .route("/api/admin/employers", get(routes::admin::list_employers))
        .route("/api/admin/jobs", get(routes::admin::list_jobs))
        .layer(require_auth);

    let api = Router::new()
        .merge(worker_api)
        .merge(employer_api)
        .merge(job_api)
        .merge(application_api)
        .merge(document_api)
        .merge(upload_api)
        .merge(admin_api)
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::new_limiter(config.rate_limit_max, config.rate_limit_window_secs),
            rate_limit::rate_limit_middleware,
        ));

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>()?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    let app = base_routes
        .merge(auth_api)
        .merge(api)
        .nest_service(
            "/uploads",
            tower_http::services::ServeDir::new(&config.uploads_dir),
        )
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}
