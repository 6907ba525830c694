use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use coursehub::build_app;
use coursehub::config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let (_, app) = build_app(Config::for_tests()).await.expect("Failed to build app");
    app
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Registers a user and returns `(token, id)`.
async fn register(app: &Router, name: &str, role: &str) -> (String, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({
            "email": format!("{}@example.com", name.to_lowercase()),
            "password": "secret123",
            "name": name,
            "role": role,
            "phoneNumber": "+1 555 0100",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

async fn create_course(app: &Router, token: &str, max_students: Option<i64>) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/courses",
        Some(token),
        Some(json!({
            "title": "Rust for Beginners",
            "category": "Technology",
            "price": 49.0,
            "maxStudents": max_students,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_string()
}

async fn enroll(app: &Router, token: &str, course_id: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/api/enrollments",
        Some(token),
        Some(json!({
            "courseId": course_id,
            "fullName": "Ann Lee",
            "phoneNumber": "+1 555 0100",
        })),
    )
    .await
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, _) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_login_profile() {
    let app = app().await;
    let (token, id) = register(&app, "Ann", "student").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({"email": "ann@example.com", "password": "secret123", "name": "Ann", "role": "student"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User already exists");

    let (status, body) = send(&app, Method::POST, "/api/register", None, Some(json!({"email": "x@example.com"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "All fields are required");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({"email": "ann@example.com", "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({"email": "ann@example.com", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, body) = send(&app, Method::GET, "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_token_errors() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Access token required");
    assert_eq!(body["error"], "401 Unauthorized");

    let (status, body) = send(&app, Method::GET, "/api/profile", Some("not.a.token"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn test_course_catalog() {
    let app = app().await;
    let (teacher, _) = register(&app, "Tina", "teacher").await;
    let (student, _) = register(&app, "Ann", "student").await;

    let course_id = create_course(&app, &teacher, Some(20)).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/courses",
        Some(&student),
        Some(json!({"title": "Nope", "price": 1.0})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, Method::GET, "/api/courses?q=rust&category=all", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["teacher"], "Tina");
    assert_eq!(body[0]["status"], "in-progress");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/courses/{course_id}"),
        Some(&teacher),
        Some(json!({"price": 59.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], 59.0);
    assert_eq!(body["maxStudents"], 20);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/courses/{course_id}"), Some(&teacher), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, Method::GET, &format!("/api/courses/{course_id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Course not found");
}

#[tokio::test]
async fn test_enrollment_capacity_and_progress() {
    let app = app().await;
    let (teacher, _) = register(&app, "Tina", "teacher").await;
    let (ann, _) = register(&app, "Ann", "student").await;
    let (ben, _) = register(&app, "Ben", "student").await;
    let course_id = create_course(&app, &teacher, Some(1)).await;

    let mut lesson_ids = Vec::new();
    for title in ["Intro", "Ownership"] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/lessons",
            Some(&teacher),
            Some(json!({"courseId": course_id, "title": title})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        lesson_ids.push(body["id"].as_str().unwrap().to_string());
    }

    let (status, enrollment) = enroll(&app, &ann, &course_id).await;
    assert_eq!(status, StatusCode::CREATED);
    let enrollment_id = enrollment["id"].as_str().unwrap().to_string();

    let (status, body) = enroll(&app, &ann, &course_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Already enrolled in this course");

    let (status, body) = enroll(&app, &ben, &course_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Course is full");

    let (_, body) = send(&app, Method::GET, &format!("/api/enrollments/check/{course_id}"), Some(&ann), None).await;
    assert_eq!(body["isEnrolled"], true);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/enrollments/{enrollment_id}/lessons/{}/toggle", lesson_ids[0]),
        Some(&ann),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["progress"], 50);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/enrollments/{enrollment_id}"), Some(&ann), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, course) = send(&app, Method::GET, &format!("/api/courses/{course_id}"), None, None).await;
    assert_eq!(course["students"], 0);
}

#[tokio::test]
async fn test_favorites() {
    let app = app().await;
    let (teacher, _) = register(&app, "Tina", "teacher").await;
    let (ann, _) = register(&app, "Ann", "student").await;
    let course_id = create_course(&app, &teacher, None).await;

    let (status, body) = send(&app, Method::POST, "/api/favorites", Some(&ann), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Course ID is required");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/favorites",
        Some(&ann),
        Some(json!({"courseId": course_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Course added to favorites");
    assert_eq!(body["favorites"], json!([course_id]));

    let (_, body) = send(&app, Method::GET, &format!("/api/favorites/{course_id}"), Some(&ann), None).await;
    assert_eq!(body["isFavorite"], true);

    let (status, body) = send(&app, Method::DELETE, &format!("/api/favorites/{course_id}"), Some(&ann), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["favorites"], json!([]));

    let (status, body) = send(&app, Method::DELETE, &format!("/api/favorites/{course_id}"), Some(&ann), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Course not in favorites");
}

#[tokio::test]
async fn test_reviews_homework_and_payments() {
    let app = app().await;
    let (teacher, _) = register(&app, "Tina", "teacher").await;
    let (ann, _) = register(&app, "Ann", "student").await;
    let course_id = create_course(&app, &teacher, None).await;
    let (_, lesson) = send(
        &app,
        Method::POST,
        "/api/lessons",
        Some(&teacher),
        Some(json!({"courseId": course_id, "title": "Intro"})),
    )
    .await;
    let (_, enrollment) = enroll(&app, &ann, &course_id).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/courseReviews",
        Some(&ann),
        Some(json!({"courseId": course_id, "rating": 4, "review": "Great pace"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, course) = send(&app, Method::GET, &format!("/api/courses/{course_id}"), None, None).await;
    assert_eq!(course["rating"], 4.0);
    assert_eq!(course["reviews"], 1);

    let (status, homework) = send(
        &app,
        Method::POST,
        "/api/homework",
        Some(&ann),
        Some(json!({
            "enrollmentId": enrollment["id"],
            "lessonId": lesson["id"],
            "githubLink": "https://github.com/ann/intro",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, graded) = send(
        &app,
        Method::PUT,
        &format!("/api/homework/{}/grade", homework["id"].as_str().unwrap()),
        Some(&teacher),
        Some(json!({"grade": 88, "feedback": "Solid"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(graded["status"], "graded");
    assert_eq!(graded["gradedBy"], "Tina");

    let (status, payment) = send(
        &app,
        Method::POST,
        "/api/payments",
        Some(&ann),
        Some(json!({"courseId": course_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(payment["amount"], 49.0);
    assert_eq!(payment["paymentMethod"], "qr_code");

    let (status, summary) = send(&app, Method::GET, "/api/payments/summary", Some(&teacher), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totalRevenue"], 49.0);
    assert_eq!(summary["pendingPayments"], 0);
}

#[tokio::test]
async fn test_students_see_only_their_payments() {
    let app = app().await;
    let (teacher, _) = register(&app, "Tina", "teacher").await;
    let (ann, ann_id) = register(&app, "Ann", "student").await;
    let (ben, ben_id) = register(&app, "Ben", "student").await;
    let course_id = create_course(&app, &teacher, None).await;

    let (_, anns) = send(&app, Method::POST, "/api/payments", Some(&ann), Some(json!({"courseId": course_id}))).await;
    send(&app, Method::POST, "/api/payments", Some(&ben), Some(json!({"courseId": course_id}))).await;

    let (status, list) = send(&app, Method::GET, "/api/payments", Some(&ann), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["studentId"], ann_id.as_str());

    // asking for someone else's payments still returns only your own
    let (_, list) = send(&app, Method::GET, &format!("/api/payments?studentId={ben_id}"), Some(&ann), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["studentId"], ann_id.as_str());

    let payment_uri = format!("/api/payments/{}", anns["id"].as_str().unwrap());
    let (status, _) = send(&app, Method::GET, &payment_uri, Some(&ben), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, Method::GET, &payment_uri, Some(&teacher), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = send(&app, Method::GET, &format!("/api/payments?courseId={course_id}"), Some(&teacher), None).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_application_approval() {
    let app = app().await;
    let (teacher, _) = register(&app, "Tina", "teacher").await;
    let (ann, ann_id) = register(&app, "Ann", "student").await;
    let course_id = create_course(&app, &teacher, Some(2)).await;

    let (status, application) = send(
        &app,
        Method::POST,
        "/api/courseApplications",
        Some(&ann),
        Some(json!({"courseId": course_id, "message": "Please let me in"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(application["status"], "pending");
    assert_eq!(application["studentEmail"], "ann@example.com");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/courseApplications",
        Some(&ann),
        Some(json!({"courseId": course_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "You have already applied to this course");

    let review_uri = format!("/api/courseApplications/{}/review", application["id"].as_str().unwrap());
    let (status, reviewed) = send(
        &app,
        Method::PUT,
        &review_uri,
        Some(&teacher),
        Some(json!({"status": "approved", "teacherResponse": "Welcome"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviewed["status"], "approved");

    let (_, enrollments) = send(
        &app,
        Method::GET,
        &format!("/api/enrollments?studentId={ann_id}"),
        Some(&ann),
        None,
    )
    .await;
    assert_eq!(enrollments.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::PUT,
        &review_uri,
        Some(&teacher),
        Some(json!({"status": "rejected"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_teacher_profile() {
    let app = app().await;
    let (teacher, teacher_id) = register(&app, "Tina", "teacher").await;
    let (ann, _) = register(&app, "Ann", "student").await;
    create_course(&app, &teacher, None).await;

    let (status, profile) = send(
        &app,
        Method::PUT,
        "/api/teacherProfiles/me",
        Some(&teacher),
        Some(json!({"bio": "Systems programmer", "expertise": ["Rust", ""]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["teacherId"], teacher_id.as_str());
    assert_eq!(profile["expertise"], json!(["Rust"]));
    assert_eq!(profile["coursesTaught"], 1);

    let (status, _) = send(&app, Method::PUT, "/api/teacherProfiles/me", Some(&ann), Some(json!({}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, listed) = send(
        &app,
        Method::GET,
        &format!("/api/teacherProfiles?teacherId={teacher_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}
