use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse, Responder};
use log::{error, info, warn};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::auth_service::{verify_token, AdminAction};
use crate::courses::total_duration;
use crate::error::ServiceError;
use crate::keys::{CourseId, RequestId, UserId, VideoId};
use crate::models::{
    Claims, CompleteVideoRequest, CourseSnapshot, LoginRequest, NewCourse, NewInstructor, NewVideo,
    RateRequest, RegisterRequest, RejectRequest, ResetPasswordRequest, SetFinishedRequest,
    UpdateNameRequest, User, UserSnapshot,
};
use crate::AppState;

fn error_response(err: &ServiceError) -> HttpResponse {
    match err {
        ServiceError::InvalidInput(_) => HttpResponse::BadRequest().json(json!({ "error": err.to_string() })),
        ServiceError::InvalidCredentials => HttpResponse::Unauthorized().json(json!({ "error": err.to_string() })),
        ServiceError::Unauthorized => HttpResponse::Forbidden().json(json!({ "error": err.to_string() })),
        ServiceError::NotFound(_) => HttpResponse::NotFound().json(json!({ "error": err.to_string() })),
        ServiceError::AlreadyEnrolled | ServiceError::AlreadyRated | ServiceError::NotEnrolled => {
            HttpResponse::Conflict().json(json!({ "error": err.to_string() }))
        }
        ServiceError::Backend(msg) => {
            error!("backend error: {}", msg);
            HttpResponse::InternalServerError().json(json!({ "error": "Internal server error" }))
        }
    }
}

// Extract and verify the bearer token from the Authorization header.
fn bearer_claims(req: &HttpRequest) -> Option<Claims> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .and_then(verify_token)
}

fn authenticate(req: &HttpRequest) -> Result<Claims, HttpResponse> {
    bearer_claims(req).ok_or_else(|| {
        HttpResponse::Unauthorized().json(json!({
            "error": "Unauthorized: invalid or missing token"
        }))
    })
}

fn require_admin(state: &AppState, req: &HttpRequest, action: AdminAction) -> Result<Claims, HttpResponse> {
    let claims = authenticate(req)?;
    if !state.authorizer.is_authorized(&claims, action) {
        return Err(HttpResponse::Forbidden().json(json!({
            "error": "Forbidden: admin access required"
        })));
    }
    Ok(claims)
}

fn user_json(user: &User) -> serde_json::Value {
    json!({
        "uid": user.uid,
        "email": user.email,
        "fullName": user.full_name
    })
}

// Display name for certificate snapshots: full name, or the email local
// part when the profile never got one.
fn snapshot_name(user: &User) -> String {
    if !user.full_name.trim().is_empty() {
        user.full_name.trim().to_string()
    } else {
        user.email.split('@').next().unwrap_or("Student").to_string()
    }
}

#[get("/api/status")]
async fn status() -> impl Responder {
    web::Json(json!({ "status": "running" }))
}

#[post("/api/auth/register")]
async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<Arc<Mutex<AppState>>>,
) -> HttpResponse {
    let state = state.lock().await;
    match state.auth.register(&req.email, &req.password, &req.full_name).await {
        Ok((user, token)) => HttpResponse::Ok().json(json!({
            "message": "User registered successfully",
            "user": user_json(&user),
            "token": token
        })),
        Err(e) => error_response(&e),
    }
}

#[post("/api/auth/login")]
async fn login(req: web::Json<LoginRequest>, state: web::Data<Arc<Mutex<AppState>>>) -> HttpResponse {
    let state = state.lock().await;
    match state.auth.login(&req.email, &req.password).await {
        Ok((user, token)) => HttpResponse::Ok().json(json!({
            "message": "Login successful",
            "user": user_json(&user),
            "token": token
        })),
        Err(e) => error_response(&e),
    }
}

// Token disposal happens client-side; the endpoint exists so the front-end
// has a uniform call for every auth transition.
#[post("/api/auth/logout")]
async fn logout() -> impl Responder {
    web::Json(json!({ "message": "Logout successful" }))
}

#[get("/api/auth/me")]
async fn me(http_req: HttpRequest, state: web::Data<Arc<Mutex<AppState>>>) -> HttpResponse {
    let claims = match authenticate(&http_req) {
        Ok(claims) => claims,
        Err(resp) => return resp,
    };
    let state = state.lock().await;
    match state.auth.user(&UserId::new(claims.user_id)).await {
        Ok(user) => HttpResponse::Ok().json(json!({ "user": user_json(&user) })),
        Err(e) => error_response(&e),
    }
}

#[put("/api/auth/profile/name")]
async fn update_profile_name(
    http_req: HttpRequest,
    req: web::Json<UpdateNameRequest>,
    state: web::Data<Arc<Mutex<AppState>>>,
) -> HttpResponse {
    let claims = match authenticate(&http_req) {
        Ok(claims) => claims,
        Err(resp) => return resp,
    };
    let state = state.lock().await;
    match state
        .auth
        .update_full_name(&UserId::new(claims.user_id), &req.full_name)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(json!({ "message": "Name updated" })),
        Err(e) => error_response(&e),
    }
}

#[post("/api/auth/reset-password")]
async fn reset_password(
    req: web::Json<ResetPasswordRequest>,
    state: web::Data<Arc<Mutex<AppState>>>,
) -> HttpResponse {
    let state = state.lock().await;
    match state.auth.request_password_reset(&req.email).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "message": "Password reset email sent" })),
        Err(e) => error_response(&e),
    }
}

#[get("/api/courses")]
async fn list_courses(state: web::Data<Arc<Mutex<AppState>>>) -> HttpResponse {
    let state = state.lock().await;
    match state.courses.list().await {
        Ok(courses) => HttpResponse::Ok().json(courses),
        Err(e) => error_response(&e),
    }
}

#[get("/api/courses/{id}")]
async fn get_course(path: web::Path<String>, state: web::Data<Arc<Mutex<AppState>>>) -> HttpResponse {
    let state = state.lock().await;
    let course_id = CourseId::new(path.into_inner());
    let course = match state.courses.get(&course_id).await {
        Ok(course) => course,
        Err(e) => return error_response(&e),
    };

    // Counting enrollments can be denied by half-rolled-out security rules;
    // the catalog view degrades to zero rather than failing the page.
    let students = match state.enrollments.student_count(&course_id).await {
        Ok(count) => count,
        Err(ServiceError::Unauthorized) => {
            warn!("student count for {} denied by backend rules", course_id);
            0
        }
        Err(e) => return error_response(&e),
    };

    let duration = total_duration(&course.videos);
    HttpResponse::Ok().json(json!({
        "course": course,
        "totalDuration": duration,
        "students": students
    }))
}

#[get("/api/courses/{id}/videos")]
async fn get_course_videos(path: web::Path<String>, state: web::Data<Arc<Mutex<AppState>>>) -> HttpResponse {
    let state = state.lock().await;
    let course_id = CourseId::new(path.into_inner());
    match state.courses.videos(&course_id).await {
        Ok(videos) => HttpResponse::Ok().json(videos),
        Err(e) => error_response(&e),
    }
}

#[get("/api/courses/{id}/students")]
async fn get_course_students(path: web::Path<String>, state: web::Data<Arc<Mutex<AppState>>>) -> HttpResponse {
    let state = state.lock().await;
    let course_id = CourseId::new(path.into_inner());
    match state.enrollments.student_count(&course_id).await {
        Ok(count) => HttpResponse::Ok().json(json!({ "students": count })),
        Err(ServiceError::Unauthorized) => {
            warn!("student count for {} denied by backend rules", course_id);
            HttpResponse::Ok().json(json!({ "students": 0 }))
        }
        Err(e) => error_response(&e),
    }
}

#[post("/api/courses")]
async fn create_course(
    http_req: HttpRequest,
    req: web::Json<NewCourse>,
    state: web::Data<Arc<Mutex<AppState>>>,
) -> HttpResponse {
    let state = state.lock().await;
    if let Err(resp) = require_admin(&state, &http_req, AdminAction::ManageCourses) {
        return resp;
    }
    match state.courses.create(req.into_inner()).await {
        Ok(course) => HttpResponse::Ok().json(course),
        Err(e) => error_response(&e),
    }
}

#[post("/api/courses/{id}/videos")]
async fn add_video(
    http_req: HttpRequest,
    path: web::Path<String>,
    req: web::Json<NewVideo>,
    state: web::Data<Arc<Mutex<AppState>>>,
) -> HttpResponse {
    let state = state.lock().await;
    if let Err(resp) = require_admin(&state, &http_req, AdminAction::ManageCourses) {
        return resp;
    }
    let course_id = CourseId::new(path.into_inner());
    match state.courses.add_video(&course_id, req.into_inner()).await {
        Ok(video) => HttpResponse::Ok().json(video),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/courses/{id}/videos/{video_id}")]
async fn remove_video(
    http_req: HttpRequest,
    path: web::Path<(String, String)>,
    state: web::Data<Arc<Mutex<AppState>>>,
) -> HttpResponse {
    let state = state.lock().await;
    if let Err(resp) = require_admin(&state, &http_req, AdminAction::ManageCourses) {
        return resp;
    }
    let (course_id, video_id) = path.into_inner();
    match state
        .courses
        .remove_video(&CourseId::new(course_id), &VideoId::new(video_id))
        .await
    {
        Ok(video) => HttpResponse::Ok().json(json!({ "message": "Video removed", "video": video })),
        Err(e) => error_response(&e),
    }
}

#[put("/api/courses/{id}/finished")]
async fn set_course_finished(
    http_req: HttpRequest,
    path: web::Path<String>,
    req: web::Json<SetFinishedRequest>,
    state: web::Data<Arc<Mutex<AppState>>>,
) -> HttpResponse {
    let state = state.lock().await;
    if let Err(resp) = require_admin(&state, &http_req, AdminAction::ManageCourses) {
        return resp;
    }
    let course_id = CourseId::new(path.into_inner());
    match state.courses.set_finished(&course_id, req.finished).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "finished": req.finished })),
        Err(e) => error_response(&e),
    }
}

#[post("/api/courses/{id}/enroll")]
async fn enroll(
    http_req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<Arc<Mutex<AppState>>>,
) -> HttpResponse {
    let claims = match authenticate(&http_req) {
        Ok(claims) => claims,
        Err(resp) => return resp,
    };
    let state = state.lock().await;
    let course_id = CourseId::new(path.into_inner());
    match state
        .enrollments
        .enroll(&UserId::new(claims.user_id), &course_id)
        .await
    {
        Ok(enrollment) => HttpResponse::Ok().json(json!({
            "message": "Enrolled successfully",
            "enrollment": enrollment
        })),
        Err(e) => error_response(&e),
    }
}

#[get("/api/courses/{id}/enrollment")]
async fn enrollment_status(
    http_req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<Arc<Mutex<AppState>>>,
) -> HttpResponse {
    let state = state.lock().await;
    let course_id = CourseId::new(path.into_inner());

    // Anonymous visitors are simply not enrolled; no error.
    let claims = match bearer_claims(&http_req) {
        Some(claims) => claims,
        None => {
            return HttpResponse::Ok().json(json!({
                "enrolled": false,
                "completedVideos": [],
                "progress": 0
            }))
        }
    };
    let user_id = UserId::new(claims.user_id);

    let enrolled = match state.enrollments.is_enrolled(&user_id, &course_id).await {
        Ok(enrolled) => enrolled,
        Err(e) => return error_response(&e),
    };
    match state.enrollments.progress(&user_id, &course_id).await {
        Ok(progress) => HttpResponse::Ok().json(json!({
            "enrolled": enrolled,
            "completedVideos": progress.completed_videos,
            "progress": progress.progress
        })),
        Err(e) => error_response(&e),
    }
}

#[post("/api/courses/{id}/videos/{video_id}/complete")]
async fn complete_video(
    http_req: HttpRequest,
    path: web::Path<(String, String)>,
    req: web::Json<CompleteVideoRequest>,
    state: web::Data<Arc<Mutex<AppState>>>,
) -> HttpResponse {
    let claims = match authenticate(&http_req) {
        Ok(claims) => claims,
        Err(resp) => return resp,
    };
    let state = state.lock().await;
    let (course_id, video_id) = path.into_inner();
    match state
        .enrollments
        .mark_video_completed(
            &UserId::new(claims.user_id),
            &CourseId::new(course_id),
            &VideoId::new(video_id),
            req.total_videos,
        )
        .await
    {
        Ok(progress) => HttpResponse::Ok().json(json!({ "progress": progress })),
        Err(e) => error_response(&e),
    }
}

#[post("/api/courses/{id}/ratings")]
async fn submit_rating(
    http_req: HttpRequest,
    path: web::Path<String>,
    req: web::Json<RateRequest>,
    state: web::Data<Arc<Mutex<AppState>>>,
) -> HttpResponse {
    let claims = match authenticate(&http_req) {
        Ok(claims) => claims,
        Err(resp) => return resp,
    };
    let state = state.lock().await;
    let course_id = CourseId::new(path.into_inner());
    match state
        .ratings
        .submit(&UserId::new(claims.user_id), &course_id, req.rating)
        .await
    {
        Ok(rating) => HttpResponse::Ok().json(rating),
        Err(e) => error_response(&e),
    }
}

#[get("/api/courses/{id}/ratings")]
async fn get_ratings(
    http_req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<Arc<Mutex<AppState>>>,
) -> HttpResponse {
    let state = state.lock().await;
    let course_id = CourseId::new(path.into_inner());

    let summary = match state.ratings.aggregate(&course_id).await {
        Ok(summary) => summary,
        Err(ServiceError::Unauthorized) => {
            // Review panel renders as "no ratings yet" when rules deny reads.
            warn!("ratings for {} denied by backend rules", course_id);
            return HttpResponse::Ok().json(json!({
                "average": 0.0,
                "count": 0,
                "ratings": [],
                "userRating": null
            }));
        }
        Err(e) => return error_response(&e),
    };
    let ratings = match state.ratings.list(&course_id).await {
        Ok(ratings) => ratings,
        Err(e) => return error_response(&e),
    };

    let user_rating = match bearer_claims(&http_req) {
        Some(claims) => match state
            .ratings
            .user_rating(&UserId::new(claims.user_id), &course_id)
            .await
        {
            Ok(rating) => rating,
            Err(e) => return error_response(&e),
        },
        None => None,
    };

    HttpResponse::Ok().json(json!({
        "average": summary.average,
        "count": summary.count,
        "ratings": ratings,
        "userRating": user_rating
    }))
}

#[post("/api/courses/{id}/certificate-request")]
async fn request_certificate(
    http_req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<Arc<Mutex<AppState>>>,
) -> HttpResponse {
    let claims = match authenticate(&http_req) {
        Ok(claims) => claims,
        Err(resp) => return resp,
    };
    let state = state.lock().await;
    let course_id = CourseId::new(path.into_inner());
    let user_id = UserId::new(claims.user_id);

    let course = match state.courses.get(&course_id).await {
        Ok(course) => course,
        Err(e) => return error_response(&e),
    };
    let progress = match state.enrollments.progress(&user_id, &course_id).await {
        Ok(progress) => progress,
        Err(e) => return error_response(&e),
    };
    if progress.progress < 100 {
        return HttpResponse::Conflict().json(json!({
            "error": "course not completed",
            "progress": progress.progress
        }));
    }

    let user = match state.auth.user(&user_id).await {
        Ok(user) => user,
        Err(e) => return error_response(&e),
    };
    let course_snapshot = CourseSnapshot {
        title: course.title.clone(),
        duration: total_duration(&course.videos),
        category: course.category.clone(),
        level: course.level.clone(),
    };
    let user_snapshot = UserSnapshot {
        name: snapshot_name(&user),
        email: user.email.clone(),
    };

    match state
        .certificates
        .request(&user_id, &course_id, &course_snapshot, &user_snapshot)
        .await
    {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => error_response(&e),
    }
}

#[get("/api/courses/{id}/certificate-request")]
async fn certificate_request_status(
    http_req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<Arc<Mutex<AppState>>>,
) -> HttpResponse {
    let claims = match authenticate(&http_req) {
        Ok(claims) => claims,
        Err(resp) => return resp,
    };
    let state = state.lock().await;
    let course_id = CourseId::new(path.into_inner());
    match state
        .certificates
        .status(&UserId::new(claims.user_id), &course_id)
        .await
    {
        Ok(Some(request)) => HttpResponse::Ok().json(json!({
            "status": request.status,
            "request": request
        })),
        Ok(None) => HttpResponse::Ok().json(json!({ "status": null, "request": null })),
        Err(e) => error_response(&e),
    }
}

#[get("/api/certificate-requests")]
async fn my_certificate_requests(http_req: HttpRequest, state: web::Data<Arc<Mutex<AppState>>>) -> HttpResponse {
    let claims = match authenticate(&http_req) {
        Ok(claims) => claims,
        Err(resp) => return resp,
    };
    let state = state.lock().await;
    match state
        .certificates
        .list_for_user(&UserId::new(claims.user_id))
        .await
    {
        Ok(requests) => HttpResponse::Ok().json(requests),
        Err(e) => error_response(&e),
    }
}

#[get("/api/certificates")]
async fn my_certificates(http_req: HttpRequest, state: web::Data<Arc<Mutex<AppState>>>) -> HttpResponse {
    let claims = match authenticate(&http_req) {
        Ok(claims) => claims,
        Err(resp) => return resp,
    };
    let state = state.lock().await;
    match state
        .certificates
        .list_certificates_for_user(&UserId::new(claims.user_id))
        .await
    {
        Ok(certificates) => HttpResponse::Ok().json(certificates),
        Err(e) => error_response(&e),
    }
}

#[get("/api/admin/certificate-requests")]
async fn list_certificate_requests(http_req: HttpRequest, state: web::Data<Arc<Mutex<AppState>>>) -> HttpResponse {
    let state = state.lock().await;
    if let Err(resp) = require_admin(&state, &http_req, AdminAction::ManageCertificates) {
        return resp;
    }
    match state.certificates.list_all().await {
        Ok(requests) => HttpResponse::Ok().json(requests),
        Err(e) => error_response(&e),
    }
}

#[post("/api/admin/certificate-requests/{id}/approve")]
async fn approve_certificate_request(
    http_req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<Arc<Mutex<AppState>>>,
) -> HttpResponse {
    let state = state.lock().await;
    if let Err(resp) = require_admin(&state, &http_req, AdminAction::ManageCertificates) {
        return resp;
    }
    let request_id = RequestId::from_raw(path.into_inner());
    match state.certificates.approve(&request_id).await {
        Ok(request) => HttpResponse::Ok().json(request),
        Err(e) => error_response(&e),
    }
}

#[post("/api/admin/certificate-requests/{id}/reject")]
async fn reject_certificate_request(
    http_req: HttpRequest,
    path: web::Path<String>,
    req: web::Json<RejectRequest>,
    state: web::Data<Arc<Mutex<AppState>>>,
) -> HttpResponse {
    let state = state.lock().await;
    if let Err(resp) = require_admin(&state, &http_req, AdminAction::ManageCertificates) {
        return resp;
    }
    let request_id = RequestId::from_raw(path.into_inner());
    match state.certificates.reject(&request_id, req.reason.as_deref()).await {
        Ok(request) => HttpResponse::Ok().json(request),
        Err(e) => error_response(&e),
    }
}

#[post("/api/admin/certificate-requests/{id}/sent")]
async fn mark_certificate_sent(
    http_req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<Arc<Mutex<AppState>>>,
) -> HttpResponse {
    let state = state.lock().await;
    if let Err(resp) = require_admin(&state, &http_req, AdminAction::ManageCertificates) {
        return resp;
    }
    let request_id = RequestId::from_raw(path.into_inner());
    let request = match state.certificates.mark_sent(&request_id).await {
        Ok(request) => request,
        Err(e) => return error_response(&e),
    };

    // Dispatch also materializes the issued-certificate record from the
    // denormalized snapshot captured at request time.
    let course_snapshot = CourseSnapshot {
        title: request.course_title.clone(),
        duration: request.course_duration,
        category: request.course_category.clone(),
        level: request.course_level.clone(),
    };
    let user_snapshot = UserSnapshot {
        name: request.user_name.clone(),
        email: request.user_email.clone(),
    };
    match state
        .certificates
        .issue(
            &UserId::new(request.user_id.clone()),
            &CourseId::new(request.course_id.clone()),
            &course_snapshot,
            &user_snapshot,
        )
        .await
    {
        Ok(certificate) => HttpResponse::Ok().json(json!({
            "request": request,
            "certificate": certificate
        })),
        Err(e) => error_response(&e),
    }
}

#[get("/api/instructors")]
async fn list_instructors(state: web::Data<Arc<Mutex<AppState>>>) -> HttpResponse {
    let state = state.lock().await;
    match state.instructors.list().await {
        Ok(instructors) => HttpResponse::Ok().json(instructors),
        Err(e) => error_response(&e),
    }
}

#[post("/api/instructors")]
async fn add_instructor(
    http_req: HttpRequest,
    req: web::Json<NewInstructor>,
    state: web::Data<Arc<Mutex<AppState>>>,
) -> HttpResponse {
    let state = state.lock().await;
    if let Err(resp) = require_admin(&state, &http_req, AdminAction::ManageInstructors) {
        return resp;
    }
    match state.instructors.add(req.into_inner()).await {
        Ok(instructor) => HttpResponse::Ok().json(instructor),
        Err(e) => error_response(&e),
    }
}

#[put("/api/instructors/{id}")]
async fn update_instructor(
    http_req: HttpRequest,
    path: web::Path<String>,
    req: web::Json<serde_json::Value>,
    state: web::Data<Arc<Mutex<AppState>>>,
) -> HttpResponse {
    let state = state.lock().await;
    if let Err(resp) = require_admin(&state, &http_req, AdminAction::ManageInstructors) {
        return resp;
    }
    match state.instructors.update(&path.into_inner(), req.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "message": "Instructor updated" })),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/instructors/{id}")]
async fn delete_instructor(
    http_req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<Arc<Mutex<AppState>>>,
) -> HttpResponse {
    let state = state.lock().await;
    if let Err(resp) = require_admin(&state, &http_req, AdminAction::ManageInstructors) {
        return resp;
    }
    match state.instructors.delete(&path.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "message": "Instructor removed" })),
        Err(e) => error_response(&e),
    }
}

#[post("/api/admin/uploads/{key}")]
async fn upload_blob(
    http_req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
    state: web::Data<Arc<Mutex<AppState>>>,
) -> HttpResponse {
    let state = state.lock().await;
    if let Err(resp) = require_admin(&state, &http_req, AdminAction::UploadContent) {
        return resp;
    }
    let blobs = match &state.blobs {
        Some(blobs) => blobs,
        None => {
            return HttpResponse::ServiceUnavailable().json(json!({
                "error": "object storage is not configured"
            }))
        }
    };

    let key = format!("course-videos/{}", path.into_inner());
    let result = blobs
        .upload_with_progress(&key, body, |fraction| {
            info!("upload {}: {:.0}%", key, fraction * 100.0);
        })
        .await;
    match result {
        Ok(url) => HttpResponse::Ok().json(json!({ "key": key, "url": url })),
        Err(e) => error_response(&e),
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(status)
        .service(register)
        .service(login)
        .service(logout)
        .service(me)
        .service(update_profile_name)
        .service(reset_password)
        .service(list_courses)
        .service(create_course)
        .service(get_course)
        .service(get_course_videos)
        .service(get_course_students)
        .service(add_video)
        .service(remove_video)
        .service(set_course_finished)
        .service(enroll)
        .service(enrollment_status)
        .service(complete_video)
        .service(submit_rating)
        .service(get_ratings)
        .service(request_certificate)
        .service(certificate_request_status)
        .service(my_certificate_requests)
        .service(my_certificates)
        .service(list_certificate_requests)
        .service(approve_certificate_request)
        .service(reject_certificate_request)
        .service(mark_certificate_sent)
        .service(list_instructors)
        .service(add_instructor)
        .service(update_instructor)
        .service(delete_instructor)
        .service(upload_blob);
}
