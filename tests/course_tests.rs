use actix_web::{test, web, App};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use course_platform_backend::auth_service::EmailListAuthorizer;
use course_platform_backend::gateway::{DocumentStore, MemoryStore};
use course_platform_backend::keys::{self, CourseId};
use course_platform_backend::{handlers, AppState};

async fn setup_test_app() -> (
    impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    Arc<MemoryStore>,
) {
    let mem = Arc::new(MemoryStore::new());
    let store: Arc<dyn DocumentStore> = mem.clone();
    let authorizer = Arc::new(EmailListAuthorizer::new(vec!["admin@example.com".to_string()]));
    let app_state = Arc::new(Mutex::new(AppState::new(store, authorizer, None)));

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state))
            .configure(handlers::configure_routes),
    )
    .await;
    (app, mem)
}

async fn register<S>(app: &S, email: &str) -> String
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
            "fullName": "Course Admin"
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success());
    let body = test::read_body(resp).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    json["token"].as_str().unwrap().to_string()
}

fn unique_email() -> String {
    let unique_id = Uuid::new_v4().to_string();
    format!("user_{}@example.com", &unique_id[..8])
}

#[actix_web::test]
async fn test_course_creation_requires_admin() {
    let (app, _) = setup_test_app().await;
    let student_token = register(&app, &unique_email()).await;

    let req = test::TestRequest::post()
        .uri("/api/courses")
        .insert_header(("Authorization", format!("Bearer {}", student_token)))
        .set_json(json!({ "title": "Shadow Course" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 403);

    let anon_req = test::TestRequest::post()
        .uri("/api/courses")
        .set_json(json!({ "title": "Shadow Course" }))
        .to_request();
    assert_eq!(test::call_service(&app, anon_req).await.status().as_u16(), 401);
}

#[actix_web::test]
async fn test_course_and_video_validation() {
    let (app, _) = setup_test_app().await;
    let admin_token = register(&app, "admin@example.com").await;

    let empty_title = test::TestRequest::post()
        .uri("/api/courses")
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .set_json(json!({ "title": "   " }))
        .to_request();
    assert_eq!(test::call_service(&app, empty_title).await.status().as_u16(), 400);

    let create = test::TestRequest::post()
        .uri("/api/courses")
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .set_json(json!({ "title": "Valid Course" }))
        .to_request();
    let create_resp = test::call_service(&app, create).await;
    assert!(create_resp.status().is_success());
    let body = test::read_body(create_resp).await;
    let course: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let course_id = course["id"].as_str().unwrap().to_string();

    let bad_videos = [
        json!({ "title": "", "url": "https://x.example/v.mp4", "videoType": "url", "duration": 5 }),
        json!({ "title": "No duration", "url": "https://x.example/v.mp4", "videoType": "url", "duration": 0 }),
        json!({ "title": "No url", "url": "", "videoType": "url", "duration": 5 }),
        json!({ "title": "Fake yt", "url": "https://vimeo.com/123", "videoType": "youtube", "duration": 5 }),
    ];
    for payload in bad_videos {
        let req = test::TestRequest::post()
            .uri(&format!("/api/courses/{}/videos", course_id))
            .insert_header(("Authorization", format!("Bearer {}", admin_token)))
            .set_json(payload.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400, "accepted: {}", payload);
    }

    let ok_req = test::TestRequest::post()
        .uri(&format!("/api/courses/{}/videos", course_id))
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .set_json(json!({
            "title": "Intro",
            "url": "https://www.youtube.com/watch?v=abc123",
            "videoType": "youtube",
            "duration": 12
        }))
        .to_request();
    let ok_resp = test::call_service(&app, ok_req).await;
    assert!(ok_resp.status().is_success());
    let ok_body = test::read_body(ok_resp).await;
    let video: serde_json::Value = serde_json::from_slice(&ok_body).unwrap();
    assert!(video["id"].as_str().is_some());
    assert_eq!(video["order"], json!(1));
}

#[actix_web::test]
async fn test_get_course_computes_total_duration() {
    let (app, _) = setup_test_app().await;
    let admin_token = register(&app, "admin@example.com").await;

    let create = test::TestRequest::post()
        .uri("/api/courses")
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .set_json(json!({ "title": "Timed Course" }))
        .to_request();
    let create_resp = test::call_service(&app, create).await;
    let body = test::read_body(create_resp).await;
    let course: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let course_id = course["id"].as_str().unwrap().to_string();

    for duration in [10u32, 25, 7] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/courses/{}/videos", course_id))
            .insert_header(("Authorization", format!("Bearer {}", admin_token)))
            .set_json(json!({
                "title": format!("Part {}", duration),
                "url": "https://cdn.example.com/part.mp4",
                "videoType": "url",
                "duration": duration
            }))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());
    }

    let get_req = test::TestRequest::get()
        .uri(&format!("/api/courses/{}", course_id))
        .to_request();
    let get_resp = test::call_service(&app, get_req).await;
    assert!(get_resp.status().is_success());
    let get_body = test::read_body(get_resp).await;
    let get_json: serde_json::Value = serde_json::from_slice(&get_body).unwrap();
    assert_eq!(get_json["totalDuration"], json!(42));
    assert_eq!(get_json["students"], json!(0));
    assert_eq!(get_json["course"]["videos"].as_array().unwrap().len(), 3);
}

#[actix_web::test]
async fn test_remove_video_and_finished_flag() {
    let (app, _) = setup_test_app().await;
    let admin_token = register(&app, "admin@example.com").await;

    let create = test::TestRequest::post()
        .uri("/api/courses")
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .set_json(json!({ "title": "Mutable Course" }))
        .to_request();
    let create_resp = test::call_service(&app, create).await;
    let body = test::read_body(create_resp).await;
    let course: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let course_id = course["id"].as_str().unwrap().to_string();

    let add = test::TestRequest::post()
        .uri(&format!("/api/courses/{}/videos", course_id))
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .set_json(json!({
            "title": "Removable",
            "url": "https://cdn.example.com/removable.mp4",
            "videoType": "url",
            "duration": 9
        }))
        .to_request();
    let add_resp = test::call_service(&app, add).await;
    let add_body = test::read_body(add_resp).await;
    let video: serde_json::Value = serde_json::from_slice(&add_body).unwrap();
    let video_id = video["id"].as_str().unwrap().to_string();

    let remove = test::TestRequest::delete()
        .uri(&format!("/api/courses/{}/videos/{}", course_id, video_id))
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .to_request();
    let remove_resp = test::call_service(&app, remove).await;
    assert!(remove_resp.status().is_success());

    let videos_req = test::TestRequest::get()
        .uri(&format!("/api/courses/{}/videos", course_id))
        .to_request();
    let videos_resp = test::call_service(&app, videos_req).await;
    let videos_body = test::read_body(videos_resp).await;
    let videos: serde_json::Value = serde_json::from_slice(&videos_body).unwrap();
    assert_eq!(videos.as_array().unwrap().len(), 0);

    // Removing again reports the video as gone.
    let missing = test::TestRequest::delete()
        .uri(&format!("/api/courses/{}/videos/{}", course_id, video_id))
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .to_request();
    assert_eq!(test::call_service(&app, missing).await.status().as_u16(), 404);

    let finish = test::TestRequest::put()
        .uri(&format!("/api/courses/{}/finished", course_id))
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .set_json(json!({ "finished": true }))
        .to_request();
    assert!(test::call_service(&app, finish).await.status().is_success());

    let get_req = test::TestRequest::get()
        .uri(&format!("/api/courses/{}", course_id))
        .to_request();
    let get_resp = test::call_service(&app, get_req).await;
    let get_body = test::read_body(get_resp).await;
    let get_json: serde_json::Value = serde_json::from_slice(&get_body).unwrap();
    assert_eq!(get_json["course"]["finished"], json!(true));
    assert!(get_json["course"]["finishedAt"].as_str().is_some());

    let reopen = test::TestRequest::put()
        .uri(&format!("/api/courses/{}/finished", course_id))
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .set_json(json!({ "finished": false }))
        .to_request();
    assert!(test::call_service(&app, reopen).await.status().is_success());
}

#[actix_web::test]
async fn test_legacy_videos_get_deterministic_ids() {
    let (app, store) = setup_test_app().await;

    // A record written before videos carried ids.
    let course_id = CourseId::new("legacy-course".to_string());
    store
        .set(
            &keys::course_doc(&course_id),
            json!({
                "title": "Archive Course",
                "videos": [
                    { "title": "Old lesson one", "url": "https://cdn.example.com/1.mp4", "videoType": "url", "duration": 10 },
                    { "title": "Old lesson two", "url": "https://cdn.example.com/2.mp4", "videoType": "url", "duration": 20 }
                ]
            }),
        )
        .await
        .unwrap();

    let videos_req = test::TestRequest::get()
        .uri("/api/courses/legacy-course/videos")
        .to_request();
    let videos_resp = test::call_service(&app, videos_req).await;
    assert!(videos_resp.status().is_success());
    let videos_body = test::read_body(videos_resp).await;
    let videos: serde_json::Value = serde_json::from_slice(&videos_body).unwrap();
    let videos = videos.as_array().unwrap();
    assert_eq!(videos[0]["id"], json!("legacy-course-video-0"));
    assert_eq!(videos[1]["id"], json!("legacy-course-video-1"));

    // Synthesized ids are stable across loads and usable for removal.
    let repeat_req = test::TestRequest::get()
        .uri("/api/courses/legacy-course/videos")
        .to_request();
    let repeat_resp = test::call_service(&app, repeat_req).await;
    let repeat_body = test::read_body(repeat_resp).await;
    let repeat: serde_json::Value = serde_json::from_slice(&repeat_body).unwrap();
    assert_eq!(repeat.as_array().unwrap()[0]["id"], json!("legacy-course-video-0"));

    let get_req = test::TestRequest::get()
        .uri("/api/courses/legacy-course")
        .to_request();
    let get_resp = test::call_service(&app, get_req).await;
    let get_body = test::read_body(get_resp).await;
    let get_json: serde_json::Value = serde_json::from_slice(&get_body).unwrap();
    // The missing id field is backfilled from the document key.
    assert_eq!(get_json["course"]["id"], json!("legacy-course"));
    assert_eq!(get_json["totalDuration"], json!(30));

    let admin_token = register(&app, "admin@example.com").await;
    let remove = test::TestRequest::delete()
        .uri("/api/courses/legacy-course/videos/legacy-course-video-0")
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .to_request();
    let remove_resp = test::call_service(&app, remove).await;
    assert!(remove_resp.status().is_success());

    let after_req = test::TestRequest::get()
        .uri("/api/courses/legacy-course/videos")
        .to_request();
    let after_resp = test::call_service(&app, after_req).await;
    let after_body = test::read_body(after_resp).await;
    let after: serde_json::Value = serde_json::from_slice(&after_body).unwrap();
    let after = after.as_array().unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0]["title"], json!("Old lesson two"));
}

#[actix_web::test]
async fn test_course_payment_fields() {
    let (app, _) = setup_test_app().await;
    let admin_token = register(&app, "admin@example.com").await;

    let paid = test::TestRequest::post()
        .uri("/api/courses")
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .set_json(json!({
            "title": "Paid Course",
            "paymentEnabled": true,
            "price": 500
        }))
        .to_request();
    let paid_resp = test::call_service(&app, paid).await;
    assert!(paid_resp.status().is_success());
    let paid_body = test::read_body(paid_resp).await;
    let paid_course: serde_json::Value = serde_json::from_slice(&paid_body).unwrap();
    assert_eq!(paid_course["paymentEnabled"], json!(true));
    assert_eq!(paid_course["price"], json!(500));

    let get_req = test::TestRequest::get()
        .uri(&format!("/api/courses/{}", paid_course["id"].as_str().unwrap()))
        .to_request();
    let get_resp = test::call_service(&app, get_req).await;
    let get_body = test::read_body(get_resp).await;
    let get_json: serde_json::Value = serde_json::from_slice(&get_body).unwrap();
    assert_eq!(get_json["course"]["paymentEnabled"], json!(true));
    assert_eq!(get_json["course"]["price"], json!(500));

    // Courses default to free, and a price without the flag is dropped.
    let free = test::TestRequest::post()
        .uri("/api/courses")
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .set_json(json!({ "title": "Free Course", "price": 200 }))
        .to_request();
    let free_resp = test::call_service(&app, free).await;
    assert!(free_resp.status().is_success());
    let free_body = test::read_body(free_resp).await;
    let free_course: serde_json::Value = serde_json::from_slice(&free_body).unwrap();
    assert_eq!(free_course["paymentEnabled"], json!(false));
    assert_eq!(free_course["price"], json!(null));
}

#[actix_web::test]
async fn test_unknown_course_is_404() {
    let (app, _) = setup_test_app().await;
    let req = test::TestRequest::get().uri("/api/courses/nope").to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 404);
}
