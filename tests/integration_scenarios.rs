mod common;

use axum::http::StatusCode;
use common::TestWorld;
use serde_json::json;

#[tokio::test]
async fn test_admin_creates_class_in_own_school() {
    let w = TestWorld::new().await;

    let (status, body) = w
        .post("/api/classes", &w.principal_1, json!({ "name": "Grade 8A" }))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Grade 8A");
    assert_eq!(body["school_id"], json!(w.school_1.id));
}

#[tokio::test]
async fn test_admin_cannot_create_assignment_in_other_school() {
    let w = TestWorld::new().await;

    let (status, _) = w
        .post(
            "/api/subject-assignments",
            &w.principal_1,
            json!({
                "class_id": w.other_class.id,
                "subject_id": w.physics.id,
                "teacher_id": w.other_teacher.profile.id,
                "academic_year": "2025/2026",
                "term": "First"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_creates_assignment_in_own_school() {
    let w = TestWorld::new().await;

    let (status, body) = w
        .post(
            "/api/subject-assignments",
            &w.principal_1,
            json!({
                "class_id": w.class_c.id,
                "subject_id": w.maths.id,
                "teacher_id": w.class_teacher.profile.id,
                "academic_year": "2025/2026",
                "term": "First"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "ACTIVE");
}

#[tokio::test]
async fn test_duplicate_assignment_is_rejected() {
    let w = TestWorld::new().await;

    let (status, _) = w
        .post(
            "/api/subject-assignments",
            &w.principal_1,
            json!({
                "class_id": w.class_c.id,
                "subject_id": w.maths.id,
                "teacher_id": w.subject_teacher.profile.id,
                "academic_year": "2025/2026",
                "term": "First"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

fn attendance_batch(w: &TestWorld, status: &str) -> serde_json::Value {
    json!({
        "class_id": w.class_c.id,
        "date": "2025-09-01",
        "entries": [
            { "student_id": w.student.profile.id, "status": status },
            { "student_id": w.classmate.profile.id, "status": "PRESENT" }
        ]
    })
}

#[tokio::test]
async fn test_class_teacher_records_and_subject_teacher_views() {
    let w = TestWorld::new().await;

    let (status, body) = w
        .post("/api/attendance", &w.class_teacher.user, attendance_batch(&w, "PRESENT"))
        .await;
    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["recorded_by"], json!(w.class_teacher.profile.id));

    let (status, _) = w
        .post("/api/attendance", &w.subject_teacher.user, attendance_batch(&w, "ABSENT"))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let id = records[0]["id"].as_str().unwrap();
    let (status, body) = w
        .get(&format!("/api/attendance/{}", id), &w.subject_teacher.user)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);

    let (status, body) = w
        .get(
            &format!("/api/classes/{}/attendance?date=2025-09-01", w.class_c.id),
            &w.subject_teacher.user,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_admin_records_attendance_without_recorder() {
    let w = TestWorld::new().await;

    let (status, body) = w
        .post("/api/attendance", &w.principal_1, attendance_batch(&w, "LATE"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body[0]["recorded_by"].is_null());

    let (status, _) = w
        .post("/api/attendance", &w.principal_2, attendance_batch(&w, "LATE"))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_attendance_for_student_outside_class_is_rejected() {
    let w = TestWorld::new().await;

    let (status, _) = w
        .post(
            "/api/attendance",
            &w.class_teacher.user,
            json!({
                "class_id": w.class_c.id,
                "date": "2025-09-01",
                "entries": [{ "student_id": w.other_student.profile.id, "status": "PRESENT" }]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_student_views_own_marks_only() {
    let w = TestWorld::new().await;

    let (status, body) = w
        .get(
            &format!("/api/students/{}/marks", w.student.profile.id),
            &w.student.user,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = w
        .get(
            &format!("/api/students/{}/marks", w.classmate.profile.id),
            &w.student.user,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
