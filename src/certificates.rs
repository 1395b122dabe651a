use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::error::{ServiceError, ServiceResult};
use crate::gateway::{decode, DocumentStore, StoreError};
use crate::keys::{self, CourseId, RequestId, UserId};
use crate::models::{
    Certificate, CertificateRequest, CertificateStatus, CourseSnapshot, RequestOutcome, UserSnapshot,
};

/// Certificate request workflow keyed by `{userId}_{courseId}`, so at most
/// one request exists per pair.
///
/// States: pending -> approved -> sent, pending -> rejected. `rejected` and
/// `sent` are terminal; there is no transition out of `rejected`.
pub struct CertificateWorkflow {
    store: Arc<dyn DocumentStore>,
}

impl CertificateWorkflow {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        CertificateWorkflow { store }
    }

    /// Creates a `pending` request, capturing the display fields as they are
    /// right now. An existing request is returned as-is with
    /// `already_exists = true`; repeating the call is a read, not an error.
    ///
    /// The 100%-progress precondition is the caller's responsibility.
    pub async fn request(
        &self,
        user: &UserId,
        course: &CourseId,
        course_snapshot: &CourseSnapshot,
        user_snapshot: &UserSnapshot,
    ) -> ServiceResult<RequestOutcome> {
        let request_id = RequestId::new(user, course);
        let path = keys::certificate_requests().doc(request_id.as_str());

        if let Some(doc) = self.store.get(&path).await? {
            let existing: CertificateRequest = decode(doc)?;
            return Ok(RequestOutcome {
                request_id: request_id.as_str().to_string(),
                already_exists: true,
                status: existing.status,
                request: existing,
            });
        }

        let request = CertificateRequest {
            id: request_id.as_str().to_string(),
            user_id: user.as_str().to_string(),
            user_name: user_snapshot.name.clone(),
            user_email: user_snapshot.email.clone(),
            course_id: course.as_str().to_string(),
            course_title: course_snapshot.title.clone(),
            course_duration: course_snapshot.duration,
            course_category: course_snapshot.category.clone(),
            course_level: course_snapshot.level.clone(),
            status: CertificateStatus::Pending,
            requested_at: Utc::now().to_rfc3339(),
            approved_at: None,
            rejected_at: None,
            sent_at: None,
            rejection_reason: None,
        };
        self.store
            .set(
                &path,
                serde_json::to_value(&request).map_err(|e| ServiceError::Backend(e.to_string()))?,
            )
            .await?;

        Ok(RequestOutcome {
            request_id: request_id.as_str().to_string(),
            already_exists: false,
            status: CertificateStatus::Pending,
            request,
        })
    }

    pub async fn status(&self, user: &UserId, course: &CourseId) -> ServiceResult<Option<CertificateRequest>> {
        let request_id = RequestId::new(user, course);
        let path = keys::certificate_requests().doc(request_id.as_str());
        match self.store.get(&path).await? {
            Some(doc) => Ok(Some(decode(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn has_request(&self, user: &UserId, course: &CourseId) -> ServiceResult<bool> {
        Ok(self.status(user, course).await?.is_some())
    }

    /// All requests, newest first. Admin console listing.
    pub async fn list_all(&self) -> ServiceResult<Vec<CertificateRequest>> {
        let docs = self.store.list(&keys::certificate_requests()).await?;
        let mut requests = Vec::with_capacity(docs.len());
        for (_, doc) in docs {
            requests.push(decode::<CertificateRequest>(doc)?);
        }
        requests.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        Ok(requests)
    }

    pub async fn list_for_user(&self, user: &UserId) -> ServiceResult<Vec<CertificateRequest>> {
        let mut requests = self.list_all().await?;
        requests.retain(|r| r.user_id == user.as_str());
        Ok(requests)
    }

    /// Stamps `approvedAt`; the status switches to `approved` only from
    /// `pending`, so a repeat approval on a request that was since sent
    /// re-stamps the timestamp without reverting the status.
    pub async fn approve(&self, request_id: &RequestId) -> ServiceResult<CertificateRequest> {
        let (path, request) = self.load(request_id).await?;
        let mut fields = json!({ "approvedAt": Utc::now().to_rfc3339() });
        if request.status == CertificateStatus::Pending {
            fields["status"] = json!(CertificateStatus::Approved);
        }
        self.store.update(&path, fields).await.map_err(Self::map_missing)?;
        self.load(request_id).await.map(|(_, r)| r)
    }

    /// Marks the certificate as dispatched. Applies from any state; the
    /// workflow does not verify the request was approved first.
    pub async fn mark_sent(&self, request_id: &RequestId) -> ServiceResult<CertificateRequest> {
        let (path, _) = self.load(request_id).await?;
        self.store
            .update(
                &path,
                json!({
                    "status": CertificateStatus::Sent,
                    "sentAt": Utc::now().to_rfc3339(),
                }),
            )
            .await
            .map_err(Self::map_missing)?;
        self.load(request_id).await.map(|(_, r)| r)
    }

    /// Stamps `rejectedAt` and the optional reason; the status switches to
    /// `rejected` only from `pending`.
    pub async fn reject(&self, request_id: &RequestId, reason: Option<&str>) -> ServiceResult<CertificateRequest> {
        let (path, request) = self.load(request_id).await?;
        let mut fields = json!({
            "rejectedAt": Utc::now().to_rfc3339(),
            "rejectionReason": reason.unwrap_or(""),
        });
        if request.status == CertificateStatus::Pending {
            fields["status"] = json!(CertificateStatus::Rejected);
        }
        self.store.update(&path, fields).await.map_err(Self::map_missing)?;
        self.load(request_id).await.map(|(_, r)| r)
    }

    /// Idempotent creation of the issued-certificate record, with a
    /// verification code derived from the composite key.
    pub async fn issue(
        &self,
        user: &UserId,
        course: &CourseId,
        course_snapshot: &CourseSnapshot,
        user_snapshot: &UserSnapshot,
    ) -> ServiceResult<Certificate> {
        let certificate_id = RequestId::new(user, course);
        let path = keys::certificates().doc(certificate_id.as_str());

        if let Some(doc) = self.store.get(&path).await? {
            return Ok(decode(doc)?);
        }

        let certificate = Certificate {
            id: certificate_id.as_str().to_string(),
            user_id: user.as_str().to_string(),
            course_id: course.as_str().to_string(),
            course_title: course_snapshot.title.clone(),
            course_duration: course_snapshot.duration,
            course_category: course_snapshot.category.clone(),
            course_level: course_snapshot.level.clone(),
            student_name: user_snapshot.name.clone(),
            student_email: user_snapshot.email.clone(),
            issued_at: Utc::now().to_rfc3339(),
            verification_code: verification_code(certificate_id.as_str()),
        };
        self.store
            .set(
                &path,
                serde_json::to_value(&certificate).map_err(|e| ServiceError::Backend(e.to_string()))?,
            )
            .await?;
        Ok(certificate)
    }

    pub async fn certificate(&self, certificate_id: &RequestId) -> ServiceResult<Certificate> {
        let doc = self
            .store
            .get(&keys::certificates().doc(certificate_id.as_str()))
            .await?
            .ok_or(ServiceError::NotFound("certificate"))?;
        Ok(decode(doc)?)
    }

    pub async fn list_certificates_for_user(&self, user: &UserId) -> ServiceResult<Vec<Certificate>> {
        let docs = self.store.list(&keys::certificates()).await?;
        let mut certificates = Vec::new();
        for (_, doc) in docs {
            let certificate: Certificate = decode(doc)?;
            if certificate.user_id == user.as_str() {
                certificates.push(certificate);
            }
        }
        certificates.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(certificates)
    }

    pub async fn has_certificate(&self, user: &UserId, course: &CourseId) -> ServiceResult<bool> {
        let certificate_id = RequestId::new(user, course);
        let doc = self
            .store
            .get(&keys::certificates().doc(certificate_id.as_str()))
            .await?;
        Ok(doc.is_some())
    }

    async fn load(&self, request_id: &RequestId) -> ServiceResult<(crate::keys::DocPath, CertificateRequest)> {
        let path = keys::certificate_requests().doc(request_id.as_str());
        let doc = self
            .store
            .get(&path)
            .await?
            .ok_or(ServiceError::NotFound("certificate request"))?;
        let request = decode(doc)?;
        Ok((path, request))
    }

    fn map_missing(err: StoreError) -> ServiceError {
        match err {
            StoreError::NotFound(_) => ServiceError::NotFound("certificate request"),
            other => other.into(),
        }
    }
}

/// Deterministic 8-character verification code: a djb2-style hash of the
/// certificate id rendered in base 36.
pub fn verification_code(certificate_id: &str) -> String {
    let mut hash: i32 = 0;
    for c in certificate_id.chars() {
        hash = hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(c as i32);
    }
    let mut n = hash.unsigned_abs();
    let mut code = String::new();
    if n == 0 {
        code.push('0');
    }
    while n > 0 {
        let digit = (n % 36) as u8;
        let c = if digit < 10 {
            (b'0' + digit) as char
        } else {
            (b'A' + digit - 10) as char
        };
        code.insert(0, c);
        n /= 36;
    }
    code.truncate(8);
    format!("BRC-{}", code)
}
