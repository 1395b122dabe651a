use std::sync::Arc;

use chrono::Utc;
use log::warn;
use serde_json::json;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::gateway::{decode, DocumentStore, StoreError};
use crate::keys;
use crate::models::{Instructor, NewInstructor};

/// Instructor directory, a flat top-level collection managed from the admin
/// console.
pub struct InstructorService {
    store: Arc<dyn DocumentStore>,
}

impl InstructorService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        InstructorService { store }
    }

    /// Newest first; records predating the `createdAt` field sort last
    /// instead of failing the whole listing.
    pub async fn list(&self) -> ServiceResult<Vec<Instructor>> {
        let docs = self.store.list(&keys::instructors()).await?;
        let mut instructors = Vec::with_capacity(docs.len());
        for (id, doc) in docs {
            match decode::<Instructor>(doc) {
                Ok(mut instructor) => {
                    if instructor.id.is_empty() {
                        instructor.id = id;
                    }
                    instructors.push(instructor);
                }
                Err(e) => warn!("skipping malformed instructor record {}: {}", id, e),
            }
        }
        instructors.sort_by(|a, b| match (&a.created_at, &b.created_at) {
            (Some(a), Some(b)) => b.cmp(a),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        Ok(instructors)
    }

    pub async fn add(&self, new_instructor: NewInstructor) -> ServiceResult<Instructor> {
        if new_instructor.name.trim().is_empty() {
            return Err(ServiceError::InvalidInput("instructor name is required".to_string()));
        }
        if new_instructor.specialty.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "instructor specialty is required".to_string(),
            ));
        }

        let now = Utc::now().to_rfc3339();
        let instructor = Instructor {
            id: Uuid::new_v4().to_string(),
            name: new_instructor.name.trim().to_string(),
            specialty: new_instructor.specialty.trim().to_string(),
            bio: new_instructor.bio,
            experience: new_instructor.experience,
            institution: new_instructor.institution,
            courses: new_instructor.courses,
            social_links: new_instructor.social_links,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };
        let path = keys::instructors().doc(&instructor.id);
        self.store
            .set(
                &path,
                serde_json::to_value(&instructor).map_err(|e| ServiceError::Backend(e.to_string()))?,
            )
            .await?;
        Ok(instructor)
    }

    pub async fn update(&self, instructor_id: &str, fields: serde_json::Value) -> ServiceResult<()> {
        let mut fields = match fields {
            serde_json::Value::Object(map) => map,
            _ => {
                return Err(ServiceError::InvalidInput(
                    "instructor update must be an object".to_string(),
                ))
            }
        };
        fields.insert("updatedAt".to_string(), json!(Utc::now().to_rfc3339()));

        let path = keys::instructors().doc(instructor_id);
        self.store
            .update(&path, serde_json::Value::Object(fields))
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => ServiceError::NotFound("instructor"),
                other => other.into(),
            })
    }

    pub async fn delete(&self, instructor_id: &str) -> ServiceResult<()> {
        let path = keys::instructors().doc(instructor_id);
        self.store.delete(&path).await?;
        Ok(())
    }
}
