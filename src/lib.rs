use std::sync::Arc;

pub mod auth_service;
pub mod certificates;
pub mod courses;
pub mod enrollment;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod instructors;
pub mod keys;
pub mod models;
pub mod ratings;
pub mod storage;

use crate::auth_service::{AuthService, Authorizer};
use crate::certificates::CertificateWorkflow;
use crate::courses::CourseService;
use crate::enrollment::EnrollmentStore;
use crate::gateway::DocumentStore;
use crate::instructors::InstructorService;
use crate::ratings::RatingAggregator;
use crate::storage::BlobStore;

pub struct AppState {
    pub authorizer: Arc<dyn Authorizer>,
    pub auth: AuthService,
    pub courses: CourseService,
    pub enrollments: EnrollmentStore,
    pub ratings: RatingAggregator,
    pub certificates: CertificateWorkflow,
    pub instructors: InstructorService,
    /// Absent when no object storage endpoint is configured; upload routes
    /// answer 503 in that case.
    pub blobs: Option<BlobStore>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        authorizer: Arc<dyn Authorizer>,
        blobs: Option<BlobStore>,
    ) -> Self {
        AppState {
            authorizer,
            auth: AuthService::new(store.clone()),
            courses: CourseService::new(store.clone()),
            enrollments: EnrollmentStore::new(store.clone()),
            ratings: RatingAggregator::new(store.clone()),
            certificates: CertificateWorkflow::new(store.clone()),
            instructors: InstructorService::new(store),
            blobs,
        }
    }
}
