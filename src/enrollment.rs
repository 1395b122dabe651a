use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::error::{ServiceError, ServiceResult};
use crate::gateway::{decode, DocumentStore};
use crate::keys::{self, CourseId, UserId, VideoId};
use crate::models::{Enrollment, ProgressView};

/// Progress percentage for a completed/total pair. Total of zero yields zero
/// rather than dividing; the result can only exceed 100 if the caller passes
/// a completed count above the total.
pub fn percent(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

/// Per-course, per-user enrollment records under
/// `courses/{courseId}/enrollments/{userId}`.
pub struct EnrollmentStore {
    store: Arc<dyn DocumentStore>,
}

impl EnrollmentStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        EnrollmentStore { store }
    }

    pub async fn enroll(&self, user: &UserId, course: &CourseId) -> ServiceResult<Enrollment> {
        let path = keys::enrollment_doc(course, user);
        if self.store.get(&path).await?.is_some() {
            return Err(ServiceError::AlreadyEnrolled);
        }

        let enrollment = Enrollment {
            user_id: user.as_str().to_string(),
            course_id: course.as_str().to_string(),
            enrolled_at: Utc::now().to_rfc3339(),
            completed_videos: Vec::new(),
            progress: 0,
            last_updated: None,
        };
        self.store
            .set(
                &path,
                serde_json::to_value(&enrollment).map_err(|e| ServiceError::Backend(e.to_string()))?,
            )
            .await?;
        Ok(enrollment)
    }

    pub async fn is_enrolled(&self, user: &UserId, course: &CourseId) -> ServiceResult<bool> {
        let doc = self.store.get(&keys::enrollment_doc(course, user)).await?;
        Ok(doc.is_some())
    }

    /// Zero-value defaults when no record exists.
    pub async fn progress(&self, user: &UserId, course: &CourseId) -> ServiceResult<ProgressView> {
        match self.store.get(&keys::enrollment_doc(course, user)).await? {
            Some(doc) => {
                let enrollment: Enrollment = decode(doc)?;
                Ok(ProgressView {
                    completed_videos: enrollment.completed_videos,
                    progress: enrollment.progress,
                })
            }
            None => Ok(ProgressView {
                completed_videos: Vec::new(),
                progress: 0,
            }),
        }
    }

    /// Appends the video to the completed set and recomputes the percentage
    /// against the caller-supplied total. Idempotent: an already-completed
    /// video returns the stored progress without writing.
    pub async fn mark_video_completed(
        &self,
        user: &UserId,
        course: &CourseId,
        video: &VideoId,
        total_videos: usize,
    ) -> ServiceResult<u32> {
        let path = keys::enrollment_doc(course, user);
        let doc = self.store.get(&path).await?.ok_or(ServiceError::NotEnrolled)?;
        let enrollment: Enrollment = decode(doc)?;

        if enrollment.completed_videos.iter().any(|v| v == video.as_str()) {
            return Ok(enrollment.progress);
        }

        let mut completed = enrollment.completed_videos;
        completed.push(video.as_str().to_string());
        let progress = percent(completed.len(), total_videos);

        self.store
            .update(
                &path,
                json!({
                    "completedVideos": completed,
                    "progress": progress,
                    "lastUpdated": Utc::now().to_rfc3339(),
                }),
            )
            .await?;
        Ok(progress)
    }

    /// Student count recomputed from the authoritative enrollments
    /// sub-collection. The store has no multi-document transactions, so there
    /// is no denormalized counter that could drift from the records.
    pub async fn student_count(&self, course: &CourseId) -> ServiceResult<usize> {
        let docs = self.store.list(&keys::enrollments(course)).await?;
        Ok(docs.len())
    }
}
