use actix_web::{test, web, App};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use course_platform_backend::auth_service::EmailListAuthorizer;
use course_platform_backend::certificates::verification_code;
use course_platform_backend::gateway::{DocumentStore, MemoryStore};
use course_platform_backend::{handlers, AppState};

async fn setup_test_app() -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let authorizer = Arc::new(EmailListAuthorizer::new(vec!["admin@example.com".to_string()]));
    let app_state = Arc::new(Mutex::new(AppState::new(store, authorizer, None)));

    test::init_service(
        App::new()
            .app_data(web::Data::new(app_state))
            .configure(handlers::configure_routes),
    )
    .await
}

async fn register<S>(app: &S, email: &str) -> (String, String)
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": email,
            "password": "password123",
            "fullName": "Test Student"
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success());
    let body = test::read_body(resp).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (
        json["token"].as_str().unwrap().to_string(),
        json["user"]["uid"].as_str().unwrap().to_string(),
    )
}

fn unique_email() -> String {
    let unique_id = Uuid::new_v4().to_string();
    format!("student_{}@example.com", &unique_id[..8])
}

/// Registers a student, builds a four-video course, enrolls the student
/// and completes `complete` of the videos. Returns what the caller needs
/// to drive the certificate flow.
async fn enrolled_student<S>(app: &S, admin_token: &str, complete: usize) -> (String, String, String, String)
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let (student_token, student_uid) = register(app, &unique_email()).await;

    let req = test::TestRequest::post()
        .uri("/api/courses")
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .set_json(json!({
            "title": "Distributed Systems",
            "category": "programming",
            "level": "advanced"
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success());
    let body = test::read_body(resp).await;
    let course: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let course_id = course["id"].as_str().unwrap().to_string();

    let mut video_ids = Vec::new();
    for i in 0..4 {
        let req = test::TestRequest::post()
            .uri(&format!("/api/courses/{}/videos", course_id))
            .insert_header(("Authorization", format!("Bearer {}", admin_token)))
            .set_json(json!({
                "title": format!("Lecture {}", i + 1),
                "url": format!("https://cdn.example.com/lecture-{}.mp4", i + 1),
                "videoType": "url",
                "duration": 15
            }))
            .to_request();
        let resp = test::call_service(app, req).await;
        assert!(resp.status().is_success());
        let body = test::read_body(resp).await;
        let video: serde_json::Value = serde_json::from_slice(&body).unwrap();
        video_ids.push(video["id"].as_str().unwrap().to_string());
    }

    let enroll = test::TestRequest::post()
        .uri(&format!("/api/courses/{}/enroll", course_id))
        .insert_header(("Authorization", format!("Bearer {}", student_token)))
        .to_request();
    assert!(test::call_service(app, enroll).await.status().is_success());

    for video_id in video_ids.iter().take(complete) {
        let req = test::TestRequest::post()
            .uri(&format!("/api/courses/{}/videos/{}/complete", course_id, video_id))
            .insert_header(("Authorization", format!("Bearer {}", student_token)))
            .set_json(json!({ "totalVideos": 4 }))
            .to_request();
        assert!(test::call_service(app, req).await.status().is_success());
    }

    let request_id = format!("{}_{}", student_uid, course_id);
    (student_token, student_uid, course_id, request_id)
}

#[actix_web::test]
async fn test_request_requires_full_completion() {
    let app = setup_test_app().await;
    let (admin_token, _) = register(&app, "admin@example.com").await;
    let (student_token, _, course_id, _) = enrolled_student(&app, &admin_token, 2).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/courses/{}/certificate-request", course_id))
        .insert_header(("Authorization", format!("Bearer {}", student_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 409);
    let body = test::read_body(resp).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], json!("course not completed"));
    assert_eq!(json["progress"], json!(50));

    // No request record was created.
    let status_req = test::TestRequest::get()
        .uri(&format!("/api/courses/{}/certificate-request", course_id))
        .insert_header(("Authorization", format!("Bearer {}", student_token)))
        .to_request();
    let status_resp = test::call_service(&app, status_req).await;
    let status_body = test::read_body(status_resp).await;
    let status_json: serde_json::Value = serde_json::from_slice(&status_body).unwrap();
    assert_eq!(status_json["status"], json!(null));
}

#[actix_web::test]
async fn test_request_is_idempotent_per_user_and_course() {
    let app = setup_test_app().await;
    let (admin_token, _) = register(&app, "admin@example.com").await;
    let (student_token, student_uid, course_id, request_id) =
        enrolled_student(&app, &admin_token, 4).await;

    let first = test::TestRequest::post()
        .uri(&format!("/api/courses/{}/certificate-request", course_id))
        .insert_header(("Authorization", format!("Bearer {}", student_token)))
        .to_request();
    let first_resp = test::call_service(&app, first).await;
    assert!(first_resp.status().is_success());
    let first_body = test::read_body(first_resp).await;
    let first_json: serde_json::Value = serde_json::from_slice(&first_body).unwrap();
    assert_eq!(first_json["requestId"].as_str().unwrap(), request_id);
    assert_eq!(first_json["alreadyExists"], json!(false));
    assert_eq!(first_json["status"], json!("pending"));
    assert_eq!(first_json["request"]["userId"].as_str().unwrap(), student_uid);
    assert_eq!(first_json["request"]["courseTitle"], json!("Distributed Systems"));
    assert_eq!(first_json["request"]["courseDuration"], json!(60));

    let second = test::TestRequest::post()
        .uri(&format!("/api/courses/{}/certificate-request", course_id))
        .insert_header(("Authorization", format!("Bearer {}", student_token)))
        .to_request();
    let second_resp = test::call_service(&app, second).await;
    assert!(second_resp.status().is_success());
    let second_body = test::read_body(second_resp).await;
    let second_json: serde_json::Value = serde_json::from_slice(&second_body).unwrap();
    assert_eq!(second_json["alreadyExists"], json!(true));
    assert_eq!(second_json["status"], json!("pending"));
    assert_eq!(
        second_json["request"]["requestedAt"],
        first_json["request"]["requestedAt"]
    );

    let list_req = test::TestRequest::get()
        .uri("/api/admin/certificate-requests")
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .to_request();
    let list_resp = test::call_service(&app, list_req).await;
    let list_body = test::read_body(list_resp).await;
    let list_json: serde_json::Value = serde_json::from_slice(&list_body).unwrap();
    assert_eq!(list_json.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_approve_then_sent_issues_certificate() {
    let app = setup_test_app().await;
    let (admin_token, _) = register(&app, "admin@example.com").await;
    let (student_token, _, course_id, request_id) = enrolled_student(&app, &admin_token, 4).await;

    let create = test::TestRequest::post()
        .uri(&format!("/api/courses/{}/certificate-request", course_id))
        .insert_header(("Authorization", format!("Bearer {}", student_token)))
        .to_request();
    assert!(test::call_service(&app, create).await.status().is_success());

    let approve = test::TestRequest::post()
        .uri(&format!("/api/admin/certificate-requests/{}/approve", request_id))
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .to_request();
    let approve_resp = test::call_service(&app, approve).await;
    assert!(approve_resp.status().is_success());
    let approve_body = test::read_body(approve_resp).await;
    let approve_json: serde_json::Value = serde_json::from_slice(&approve_body).unwrap();
    assert_eq!(approve_json["status"], json!("approved"));
    assert!(approve_json["approvedAt"].as_str().is_some());

    let sent = test::TestRequest::post()
        .uri(&format!("/api/admin/certificate-requests/{}/sent", request_id))
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .to_request();
    let sent_resp = test::call_service(&app, sent).await;
    assert!(sent_resp.status().is_success());
    let sent_body = test::read_body(sent_resp).await;
    let sent_json: serde_json::Value = serde_json::from_slice(&sent_body).unwrap();
    assert_eq!(sent_json["request"]["status"], json!("sent"));
    assert!(sent_json["request"]["sentAt"].as_str().is_some());
    let code = sent_json["certificate"]["verificationCode"].as_str().unwrap();
    assert!(code.starts_with("BRC-"));
    assert_eq!(code, verification_code(sent_json["certificate"]["id"].as_str().unwrap()));

    // The student now sees the issued certificate.
    let certs_req = test::TestRequest::get()
        .uri("/api/certificates")
        .insert_header(("Authorization", format!("Bearer {}", student_token)))
        .to_request();
    let certs_resp = test::call_service(&app, certs_req).await;
    let certs_body = test::read_body(certs_resp).await;
    let certs_json: serde_json::Value = serde_json::from_slice(&certs_body).unwrap();
    let certs = certs_json.as_array().unwrap();
    assert_eq!(certs.len(), 1);
    assert_eq!(certs[0]["courseTitle"], json!("Distributed Systems"));

    // Approving after delivery stamps the timestamp but never rewinds the
    // status from sent.
    let late_approve = test::TestRequest::post()
        .uri(&format!("/api/admin/certificate-requests/{}/approve", request_id))
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .to_request();
    let late_resp = test::call_service(&app, late_approve).await;
    assert!(late_resp.status().is_success());
    let late_body = test::read_body(late_resp).await;
    let late_json: serde_json::Value = serde_json::from_slice(&late_body).unwrap();
    assert_eq!(late_json["status"], json!("sent"));
}

#[actix_web::test]
async fn test_reject_records_reason() {
    let app = setup_test_app().await;
    let (admin_token, _) = register(&app, "admin@example.com").await;
    let (student_token, _, course_id, request_id) = enrolled_student(&app, &admin_token, 4).await;

    let create = test::TestRequest::post()
        .uri(&format!("/api/courses/{}/certificate-request", course_id))
        .insert_header(("Authorization", format!("Bearer {}", student_token)))
        .to_request();
    assert!(test::call_service(&app, create).await.status().is_success());

    let reject = test::TestRequest::post()
        .uri(&format!("/api/admin/certificate-requests/{}/reject", request_id))
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .set_json(json!({ "reason": "name on account does not match" }))
        .to_request();
    let reject_resp = test::call_service(&app, reject).await;
    assert!(reject_resp.status().is_success());
    let reject_body = test::read_body(reject_resp).await;
    let reject_json: serde_json::Value = serde_json::from_slice(&reject_body).unwrap();
    assert_eq!(reject_json["status"], json!("rejected"));
    assert_eq!(reject_json["rejectionReason"], json!("name on account does not match"));
    assert!(reject_json["rejectedAt"].as_str().is_some());

    // Rejection is terminal; a later approve does not flip it back.
    let approve = test::TestRequest::post()
        .uri(&format!("/api/admin/certificate-requests/{}/approve", request_id))
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .to_request();
    let approve_resp = test::call_service(&app, approve).await;
    let approve_body = test::read_body(approve_resp).await;
    let approve_json: serde_json::Value = serde_json::from_slice(&approve_body).unwrap();
    assert_eq!(approve_json["status"], json!("rejected"));

    let status_req = test::TestRequest::get()
        .uri(&format!("/api/courses/{}/certificate-request", course_id))
        .insert_header(("Authorization", format!("Bearer {}", student_token)))
        .to_request();
    let status_resp = test::call_service(&app, status_req).await;
    let status_body = test::read_body(status_resp).await;
    let status_json: serde_json::Value = serde_json::from_slice(&status_body).unwrap();
    assert_eq!(status_json["status"], json!("rejected"));
}

#[actix_web::test]
async fn test_admin_endpoints_reject_non_admins() {
    let app = setup_test_app().await;
    let (student_token, _) = register(&app, &unique_email()).await;

    let list = test::TestRequest::get()
        .uri("/api/admin/certificate-requests")
        .insert_header(("Authorization", format!("Bearer {}", student_token)))
        .to_request();
    assert_eq!(test::call_service(&app, list).await.status().as_u16(), 403);

    let approve = test::TestRequest::post()
        .uri("/api/admin/certificate-requests/u_c/approve")
        .insert_header(("Authorization", format!("Bearer {}", student_token)))
        .to_request();
    assert_eq!(test::call_service(&app, approve).await.status().as_u16(), 403);
}

#[actix_web::test]
async fn test_verification_code_is_deterministic() {
    let a = verification_code("cert-123");
    let b = verification_code("cert-123");
    let c = verification_code("cert-124");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.starts_with("BRC-"));
    assert!(a.len() <= "BRC-".len() + 8);
}
