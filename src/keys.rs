use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque user identifier (the identity provider's uid).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseId(String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoId(String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                $name(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(UserId);
string_id!(CourseId);
string_id!(VideoId);

/// Composite key for documents that exist at most once per (user, course)
/// pair: certificate requests and issued certificates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(user: &UserId, course: &CourseId) -> Self {
        RequestId(format!("{}_{}", user.as_str(), course.as_str()))
    }

    /// Wraps an id received back from a client (admin console routes carry
    /// the raw composite key).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        RequestId(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Slash-joined path to a collection in the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionPath(String);

/// Slash-joined path to a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocPath(String);

impl CollectionPath {
    pub fn top(name: &str) -> Self {
        CollectionPath(name.to_string())
    }

    pub fn doc(&self, id: &str) -> DocPath {
        DocPath(format!("{}/{}", self.0, id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DocPath {
    /// Sub-collection scoped under this document.
    pub fn collection(&self, name: &str) -> CollectionPath {
        CollectionPath(format!("{}/{}", self.0, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment, i.e. the document id.
    pub fn id(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn courses() -> CollectionPath {
    CollectionPath::top("courses")
}

pub fn course_doc(course: &CourseId) -> DocPath {
    courses().doc(course.as_str())
}

pub fn enrollments(course: &CourseId) -> CollectionPath {
    course_doc(course).collection("enrollments")
}

pub fn enrollment_doc(course: &CourseId, user: &UserId) -> DocPath {
    enrollments(course).doc(user.as_str())
}

pub fn ratings(course: &CourseId) -> CollectionPath {
    course_doc(course).collection("ratings")
}

pub fn rating_doc(course: &CourseId, user: &UserId) -> DocPath {
    ratings(course).doc(user.as_str())
}

pub fn certificate_requests() -> CollectionPath {
    CollectionPath::top("certificateRequests")
}

pub fn certificates() -> CollectionPath {
    CollectionPath::top("certificates")
}

pub fn users() -> CollectionPath {
    CollectionPath::top("users")
}

pub fn user_doc(user: &UserId) -> DocPath {
    users().doc(user.as_str())
}

pub fn instructors() -> CollectionPath {
    CollectionPath::top("instructors")
}

pub fn password_resets() -> CollectionPath {
    CollectionPath::top("passwordResets")
}
