//! Integration tests for the REST routes, driven through the router
//! in-process with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use api_lib::adapters::JsonDb;
use api_lib::config::Config;
use api_lib::web::{api_router, state::AppState};

/// A router over a fresh seeded database in a scratch directory.
fn test_app() -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonDb::open(dir.path().join("db.json")).unwrap());
    let config = Arc::new(Config::from_env().unwrap());
    let app = Router::new().nest("/api", api_router(Arc::new(AppState { store, config })));
    (dir, app)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn login_returns_the_user_without_its_password() {
    let (_dir, app) = test_app();

    let response = app
        .oneshot(post_json(
            "/api/auth/login",
            json!({ "username": "123456", "password": "123456", "role": "student" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let user = body_json(response).await;
    assert_eq!(user["id"], "student_123456");
    assert_eq!(user["role"], "student");
    assert!(user.get("password").is_none());
}

#[tokio::test]
async fn a_bad_login_answers_the_combined_message() {
    let (_dir, app) = test_app();

    let response = app
        .oneshot(post_json(
            "/api/auth/login",
            json!({ "username": "123456", "password": "wrong", "role": "student" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "用户名、密码或角色错误");
}

#[tokio::test]
async fn registration_is_scoped_per_role_and_rejects_duplicates() {
    let (_dir, app) = test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/register",
            json!({ "username": "xiaoli", "password": "pw", "email": "x@hitedu.com", "role": "student" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let student = body_json(response).await;

    // The same username registers fine under the other role.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/register",
            json!({ "username": "xiaoli", "password": "pw", "email": "x@hitedu.com", "role": "teacher" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let teacher = body_json(response).await;
    assert_ne!(student["id"], teacher["id"]);

    // A second student registration is a duplicate.
    let response = app
        .oneshot(post_json(
            "/api/auth/register",
            json!({ "username": "xiaoli", "password": "pw", "email": "x@hitedu.com", "role": "student" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "用户已存在");
}

#[tokio::test]
async fn avatar_update_answers_404_for_unknown_users() {
    let (_dir, app) = test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/users/student_123456/avatar",
            json!({ "avatar": "https://example.com/a.png" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let user = body_json(response).await;
    assert_eq!(user["avatar"], "https://example.com/a.png");
    assert!(user.get("password").is_none());

    let response = app
        .oneshot(post_json(
            "/api/users/ghost/avatar",
            json!({ "avatar": "https://example.com/a.png" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn the_seeded_video_catalog_is_served() {
    let (_dir, app) = test_app();

    let response = app.oneshot(get("/api/videos")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let videos = body_json(response).await;
    let videos = videos.as_array().unwrap();
    assert_eq!(videos.len(), 4);
    assert_eq!(videos[0]["id"], "v1");
    assert_eq!(videos[0]["durationSec"], 600);
    assert_eq!(videos[0]["chapters"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn progress_defaults_to_zero_and_upserts() {
    let (_dir, app) = test_app();

    let response = app
        .clone()
        .oneshot(get("/api/users/u1/progress/v1"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, json!({ "timestamp": 0.0 }));

    for position in [30.0, 45.0] {
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/users/u1/progress",
                json!({ "videoId": "v1", "timestamp": position }),
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await, json!({ "success": true }));
    }

    let response = app
        .oneshot(get("/api/users/u1/progress/v1"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, json!({ "timestamp": 45.0 }));
}

#[tokio::test]
async fn schedule_saves_replace_the_previous_list() {
    let (_dir, app) = test_app();

    let first = json!([{ "id": "s1", "day": "周一", "timeSlot": "08:00-09:40", "courseName": "高等数学" }]);
    let second = json!([{ "id": "s2", "day": "周二", "timeSlot": "10:00-11:40", "courseName": "大学物理", "location": "教学楼B201" }]);

    for body in [first, second.clone()] {
        let response = app
            .clone()
            .oneshot(post_json("/api/users/u1/schedule", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(get("/api/users/u1/schedule")).await.unwrap();
    assert_eq!(body_json(response).await, second);
}

#[tokio::test]
async fn mistakes_are_listed_newest_first() {
    let (_dir, app) = test_app();

    let mistake = |text: &str, answer: Value| {
        json!({
            "question": {
                "id": "q1",
                "type": "multiple_choice",
                "question": text,
                "options": ["甲", "乙"],
                "correctAnswer": 0,
                "explanation": "略"
            },
            "wrongAnswer": answer,
            "topic": "数学"
        })
    };

    for body in [mistake("第一题", json!(1)), mistake("第二题", json!("答错了"))] {
        let response = app
            .clone()
            .oneshot(post_json("/api/users/u1/mistakes", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(get("/api/users/u1/mistakes")).await.unwrap();
    let mistakes = body_json(response).await;
    let mistakes = mistakes.as_array().unwrap();
    assert_eq!(mistakes.len(), 2);
    assert_eq!(mistakes[0]["question"]["question"], "第二题");
    assert_eq!(mistakes[0]["wrongAnswer"], "答错了");
    assert_eq!(mistakes[1]["question"]["question"], "第一题");
    assert_eq!(mistakes[1]["wrongAnswer"], 1);
}

#[tokio::test]
async fn stats_keep_their_shape_across_reads() {
    let (_dir, app) = test_app();

    let response = app
        .clone()
        .oneshot(get("/api/users/u1/stats"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stats = body_json(response).await;
    assert!(stats["totalStudyHours"].is_u64());
    assert_eq!(stats["weakPoints"].as_array().unwrap().len(), 2);
    assert_eq!(stats["learningTrend"].as_array().unwrap().len(), 7);
}
