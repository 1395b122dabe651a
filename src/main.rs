use actix_web::{http, web, App, HttpServer};
use actix_cors::Cors;
use dotenv::dotenv;
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use course_platform_backend::auth_service::EmailListAuthorizer;
use course_platform_backend::gateway::{DocumentStore, MemoryStore};
use course_platform_backend::storage::BlobStore;
use course_platform_backend::{handlers, AppState};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    // The hosted document store is wired by swapping this implementation;
    // the in-memory store serves development and CI.
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    warn!("using in-memory document store; data will not survive restarts");

    let authorizer = Arc::new(EmailListAuthorizer::from_env());

    // Object storage is optional: without an endpoint the upload routes
    // answer 503 and everything else keeps working.
    let blobs = match std::env::var("MINIO_ENDPOINT") {
        Ok(endpoint) => {
            info!("connecting to object storage at {}", endpoint);
            let blobs = BlobStore::from_env().await;
            blobs.ensure_bucket().await;
            Some(blobs)
        }
        Err(_) => {
            warn!("MINIO_ENDPOINT not set; upload routes disabled");
            None
        }
    };

    let app_state = Arc::new(Mutex::new(AppState::new(store, authorizer, blobs)));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5050".to_string());
    info!("Starting HTTP server on {}", bind_addr);
    HttpServer::new(move || {
        let allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
            .supports_credentials();

        for origin in allowed_origins.split(',') {
            cors = cors.allowed_origin(origin.trim());
        }

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(app_state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
