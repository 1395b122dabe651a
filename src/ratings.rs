use std::sync::Arc;

use chrono::Utc;

use crate::error::{ServiceError, ServiceResult};
use crate::gateway::{decode, DocumentStore};
use crate::keys::{self, CourseId, UserId};
use crate::models::{Rating, RatingSummary};

/// One star rating per (user, course), stored at
/// `courses/{courseId}/ratings/{userId}`. The average is recomputed from the
/// rating documents on every read; nothing is cached or denormalized.
pub struct RatingAggregator {
    store: Arc<dyn DocumentStore>,
}

impl RatingAggregator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        RatingAggregator { store }
    }

    /// First submission wins; later attempts surface `AlreadyRated` so the
    /// caller can treat them as a no-op. The write itself is a set at a
    /// fixed key, so two racing first-time submissions resolve by
    /// last-write-wins rather than rejection.
    pub async fn submit(&self, user: &UserId, course: &CourseId, stars: u8) -> ServiceResult<Rating> {
        if !(1..=5).contains(&stars) {
            return Err(ServiceError::InvalidInput(
                "rating must be between 1 and 5 stars".to_string(),
            ));
        }

        let path = keys::rating_doc(course, user);
        if self.store.get(&path).await?.is_some() {
            return Err(ServiceError::AlreadyRated);
        }

        let rating = Rating {
            user_id: user.as_str().to_string(),
            course_id: course.as_str().to_string(),
            rating: stars,
            created_at: Utc::now().to_rfc3339(),
        };
        self.store
            .set(
                &path,
                serde_json::to_value(&rating).map_err(|e| ServiceError::Backend(e.to_string()))?,
            )
            .await?;
        Ok(rating)
    }

    pub async fn aggregate(&self, course: &CourseId) -> ServiceResult<RatingSummary> {
        let docs = self.store.list(&keys::ratings(course)).await?;
        let mut total: u64 = 0;
        let mut count: usize = 0;
        for (_, doc) in docs {
            let rating: Rating = decode(doc)?;
            total += rating.rating as u64;
            count += 1;
        }
        let average = if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        };
        Ok(RatingSummary { average, count })
    }

    pub async fn user_rating(&self, user: &UserId, course: &CourseId) -> ServiceResult<Option<u8>> {
        match self.store.get(&keys::rating_doc(course, user)).await? {
            Some(doc) => {
                let rating: Rating = decode(doc)?;
                Ok(Some(rating.rating))
            }
            None => Ok(None),
        }
    }

    /// All ratings for the course, newest first; records without a timestamp
    /// sort last.
    pub async fn list(&self, course: &CourseId) -> ServiceResult<Vec<Rating>> {
        let docs = self.store.list(&keys::ratings(course)).await?;
        let mut ratings = Vec::with_capacity(docs.len());
        for (_, doc) in docs {
            ratings.push(decode::<Rating>(doc)?);
        }
        ratings.sort_by(|a, b| match (a.created_at.is_empty(), b.created_at.is_empty()) {
            (true, true) => std::cmp::Ordering::Equal,
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
            (false, false) => b.created_at.cmp(&a.created_at),
        });
        Ok(ratings)
    }
}
