use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::gateway::{decode, DocumentStore, StoreError};
use crate::keys::{self, CourseId, VideoId};
use crate::models::{Course, NewCourse, NewVideo, Video, VideoSource};

/// Total running time of a course, summed from its video list on read.
pub fn total_duration(videos: &[Video]) -> u32 {
    videos.iter().map(|v| v.duration).sum()
}

/// Fills in ids for legacy video records that were stored without one. The
/// synthesized id is a pure function of the course id and list position, so
/// repeated loads agree. Data-quality workaround, not an invariant the store
/// enforces.
pub fn normalize_videos(course_id: &str, videos: &mut [Video]) {
    for (index, video) in videos.iter_mut().enumerate() {
        if video.id.as_deref().map_or(true, |id| id.is_empty()) {
            video.id = Some(format!("{}-video-{}", course_id, index));
        }
    }
}

/// Admin-facing course catalog: course documents with an embedded video
/// list, mutated through single-document atomic array operations.
pub struct CourseService {
    store: Arc<dyn DocumentStore>,
}

impl CourseService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        CourseService { store }
    }

    pub async fn create(&self, new_course: NewCourse) -> ServiceResult<Course> {
        if new_course.title.trim().is_empty() {
            return Err(ServiceError::InvalidInput("course title is required".to_string()));
        }

        let id = new_course
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let path = keys::course_doc(&CourseId::new(id.clone()));
        if self.store.get(&path).await?.is_some() {
            return Err(ServiceError::InvalidInput(format!("course {} already exists", id)));
        }

        let course = Course {
            id,
            title: new_course.title.trim().to_string(),
            description: new_course.description,
            category: new_course.category,
            level: new_course.level,
            videos: Vec::new(),
            finished: false,
            finished_at: None,
            payment_enabled: new_course.payment_enabled,
            price: new_course.price.filter(|_| new_course.payment_enabled),
            created_at: Some(Utc::now().to_rfc3339()),
        };
        self.store
            .set(
                &path,
                serde_json::to_value(&course).map_err(|e| ServiceError::Backend(e.to_string()))?,
            )
            .await?;
        Ok(course)
    }

    pub async fn get(&self, course_id: &CourseId) -> ServiceResult<Course> {
        let doc = self
            .store
            .get(&keys::course_doc(course_id))
            .await?
            .ok_or(ServiceError::NotFound("course"))?;
        let mut course: Course = decode(doc)?;
        if course.id.is_empty() {
            course.id = course_id.as_str().to_string();
        }
        normalize_videos(course_id.as_str(), &mut course.videos);
        Ok(course)
    }

    pub async fn list(&self) -> ServiceResult<Vec<Course>> {
        let docs = self.store.list(&keys::courses()).await?;
        let mut courses = Vec::with_capacity(docs.len());
        for (id, doc) in docs {
            let mut course: Course = decode(doc)?;
            if course.id.is_empty() {
                course.id = id.clone();
            }
            normalize_videos(&id, &mut course.videos);
            courses.push(course);
        }
        Ok(courses)
    }

    pub async fn videos(&self, course_id: &CourseId) -> ServiceResult<Vec<Video>> {
        Ok(self.get(course_id).await?.videos)
    }

    /// Validates before touching the store, then appends atomically. The
    /// total duration is not written anywhere; it is recomputed from the
    /// list on read.
    pub async fn add_video(&self, course_id: &CourseId, new_video: NewVideo) -> ServiceResult<Video> {
        if new_video.title.trim().is_empty() {
            return Err(ServiceError::InvalidInput("video title is required".to_string()));
        }
        if new_video.duration == 0 {
            return Err(ServiceError::InvalidInput(
                "video duration must be greater than zero".to_string(),
            ));
        }
        if new_video.url.trim().is_empty() {
            return Err(ServiceError::InvalidInput("video URL is required".to_string()));
        }
        if new_video.video_type == VideoSource::Youtube
            && !new_video.url.contains("youtube.com")
            && !new_video.url.contains("youtu.be")
        {
            return Err(ServiceError::InvalidInput(
                "URL does not look like a YouTube link".to_string(),
            ));
        }

        let course = self.get(course_id).await?;
        let video = Video {
            id: Some(Uuid::new_v4().to_string()),
            title: new_video.title.trim().to_string(),
            url: new_video.url.trim().to_string(),
            video_type: new_video.video_type,
            duration: new_video.duration,
            comment: new_video.comment.filter(|c| !c.trim().is_empty()),
            order: course.videos.len() as u32 + 1,
            added_at: Some(Utc::now().to_rfc3339()),
        };

        self.store
            .array_union(
                &keys::course_doc(course_id),
                "videos",
                serde_json::to_value(&video).map_err(|e| ServiceError::Backend(e.to_string()))?,
            )
            .await
            .map_err(Self::map_missing)?;
        Ok(video)
    }

    /// Removal matches on the raw stored element, so legacy records whose id
    /// only exists synthesized are still removable by that id.
    pub async fn remove_video(&self, course_id: &CourseId, video_id: &VideoId) -> ServiceResult<Video> {
        let path = keys::course_doc(course_id);
        let doc = self
            .store
            .get(&path)
            .await?
            .ok_or(ServiceError::NotFound("course"))?;
        let raw_videos = doc
            .get("videos")
            .and_then(serde_json::Value::as_array)
            .cloned()
            .unwrap_or_default();

        for (index, raw) in raw_videos.iter().enumerate() {
            let mut video: Video = decode(raw.clone())?;
            let id = video
                .id
                .clone()
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| format!("{}-video-{}", course_id.as_str(), index));
            if id == video_id.as_str() {
                self.store
                    .array_remove(&path, "videos", raw.clone())
                    .await
                    .map_err(Self::map_missing)?;
                video.id = Some(id);
                return Ok(video);
            }
        }
        Err(ServiceError::NotFound("video"))
    }

    /// Reversible lifecycle flag: "in progress" <-> "finished".
    pub async fn set_finished(&self, course_id: &CourseId, finished: bool) -> ServiceResult<()> {
        let finished_at = if finished {
            json!(Utc::now().to_rfc3339())
        } else {
            json!(null)
        };
        self.store
            .update(
                &keys::course_doc(course_id),
                json!({ "finished": finished, "finishedAt": finished_at }),
            )
            .await
            .map_err(Self::map_missing)
    }

    fn map_missing(err: StoreError) -> ServiceError {
        match err {
            StoreError::NotFound(_) => ServiceError::NotFound("course"),
            other => other.into(),
        }
    }
}
