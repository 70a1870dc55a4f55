mod common;

use axum::http::StatusCode;
use common::TestWorld;
use serde_json::{Value, json};

fn mark_body(w: &TestWorld, student: &common::TestStudent, score: f64) -> Value {
    json!({
        "student_id": student.profile.id,
        "assignment_id": w.assignment.id,
        "assessment_type": "Quiz",
        "score": score,
        "max_score": 10.0,
        "assessed_on": "2025-10-01"
    })
}

#[tokio::test]
async fn test_subject_teacher_enters_mark() {
    let w = TestWorld::new().await;

    let (status, body) = w
        .post("/api/marks", &w.subject_teacher.user, mark_body(&w, &w.student, 8.5))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["recorded_by"], json!(w.subject_teacher.profile.id));

    let uri = format!("/api/marks/{}", body["id"].as_str().unwrap());
    let (status, _) = w.get(&uri, &w.student.user).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = w.get(&uri, &w.classmate.user).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = w
        .get(
            &format!("/api/subject-assignments/{}/marks", w.assignment.id),
            &w.class_teacher.user,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_mark_guards() {
    let w = TestWorld::new().await;

    let (status, body) = w
        .post("/api/marks", &w.subject_teacher.user, mark_body(&w, &w.student, 12.0))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Score must be between 0 and 10");

    let (status, _) = w
        .post(
            "/api/marks",
            &w.subject_teacher.user,
            mark_body(&w, &w.other_student, 5.0),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = w
        .post("/api/marks", &w.other_teacher.user, mark_body(&w, &w.student, 5.0))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_and_delete_mark() {
    let w = TestWorld::new().await;
    let (_, body) = w
        .post("/api/marks", &w.class_teacher.user, mark_body(&w, &w.student, 6.0))
        .await;
    let uri = format!("/api/marks/{}", body["id"].as_str().unwrap());

    let (status, body) = w
        .put(&uri, &w.subject_teacher.user, json!({ "score": 9.0 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 9.0);

    let (status, _) = w.put(&uri, &w.student.user, json!({ "score": 10.0 })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = w.put(&uri, &w.principal_1, json!({ "score": 11.0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = w.delete(&uri, &w.principal_2).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = w.delete(&uri, &w.principal_1).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = w.get(&uri, &w.principal_1).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn submit_feedback(w: &TestWorld) -> String {
    let (status, body) = w
        .post(
            "/api/feedback",
            &w.subject_teacher.user,
            json!({
                "student_id": w.student.profile.id,
                "assignment_id": w.assignment.id,
                "content": "Great progress on fractions"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_read"], false);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_only_assignment_teacher_submits_feedback() {
    let w = TestWorld::new().await;
    submit_feedback(&w).await;

    let (status, _) = w
        .post(
            "/api/feedback",
            &w.class_teacher.user,
            json!({
                "student_id": w.student.profile.id,
                "assignment_id": w.assignment.id,
                "content": "Class teacher note"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_class_teacher_marks_feedback_read() {
    let w = TestWorld::new().await;
    let id = submit_feedback(&w).await;
    let uri = format!("/api/feedback/{}/read", id);

    let (status, _) = w.put(&uri, &w.subject_teacher.user, json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = w.put(&uri, &w.class_teacher.user, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_read"], true);
}

#[tokio::test]
async fn test_student_feedback_listing() {
    let w = TestWorld::new().await;
    let id = submit_feedback(&w).await;
    let uri = format!("/api/students/{}/feedback", w.student.profile.id);

    let (status, body) = w.get(&uri, &w.student.user).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], id);

    let (status, _) = w.get(&uri, &w.classmate.user).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = w.get(&uri, &w.principal_1).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = w.get(&uri, &w.other_teacher.user).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_class_wide_task_is_visible_to_enrolled_students() {
    let w = TestWorld::new().await;

    let (status, body) = w
        .post(
            "/api/tasks",
            &w.subject_teacher.user,
            json!({ "title": "Read chapter 3", "class_id": w.class_c.id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/tasks/{}", body["id"].as_str().unwrap());

    let (status, _) = w.get(&uri, &w.classmate.user).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = w.get(&uri, &w.other_student.user).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = w.get("/api/tasks", &w.classmate.user).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = w.get("/api/tasks", &w.subject_teacher.user).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_task_creation_rules() {
    let w = TestWorld::new().await;

    let (status, _) = w
        .post(
            "/api/tasks",
            &w.principal_1,
            json!({ "title": "Essay", "student_id": w.student.profile.id }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = w
        .post(
            "/api/tasks",
            &w.principal_1,
            json!({
                "title": "Essay",
                "student_id": w.student.profile.id,
                "teacher_id": w.class_teacher.profile.id
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["teacher_id"], json!(w.class_teacher.profile.id));

    let (status, _) = w
        .post(
            "/api/tasks",
            &w.other_teacher.user,
            json!({ "title": "Essay", "student_id": w.student.profile.id }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = w
        .post(
            "/api/tasks",
            &w.class_teacher.user,
            json!({
                "title": "Essay",
                "student_id": w.other_student.profile.id,
                "class_id": w.class_c.id
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let payload = json!({ "title": "Self study", "student_id": w.student.profile.id });
    let (status, _) = w.post("/api/tasks", &w.student.user, payload.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = w.post("/api/tasks", &w.parent, payload).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_ne!(
        body["error"],
        "teacher_id is required when an administrator assigns a task"
    );
}

#[tokio::test]
async fn test_only_assigner_edits_task() {
    let w = TestWorld::new().await;
    let (_, body) = w
        .post(
            "/api/tasks",
            &w.class_teacher.user,
            json!({ "title": "Essay", "student_id": w.student.profile.id }),
        )
        .await;
    let uri = format!("/api/tasks/{}", body["id"].as_str().unwrap());

    let (status, _) = w
        .put(&uri, &w.subject_teacher.user, json!({ "title": "Longer essay" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = w
        .put(&uri, &w.class_teacher.user, json!({ "title": "Longer essay" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Longer essay");

    let (status, body) = w
        .get(
            &format!("/api/students/{}/tasks", w.student.profile.id),
            &w.subject_teacher.user,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = w.delete(&uri, &w.class_teacher.user).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_task_visibility_follows_active_assignments() {
    let w = TestWorld::new().await;
    let (status, body) = w
        .post(
            "/api/tasks",
            &w.class_teacher.user,
            json!({ "title": "Reading log", "student_id": w.student.profile.id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let by_class_teacher = format!("/api/tasks/{}", body["id"].as_str().unwrap());

    let (status, _) = w.get(&by_class_teacher, &w.subject_teacher.user).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = w.get(&by_class_teacher, &w.other_teacher.user).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = w
        .post(
            "/api/tasks",
            &w.subject_teacher.user,
            json!({ "title": "Fractions drill", "student_id": w.student.profile.id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let by_subject_teacher = format!("/api/tasks/{}", body["id"].as_str().unwrap());

    let (status, _) = w.get(&by_subject_teacher, &w.subject_teacher.user).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = w.get(&by_subject_teacher, &w.class_teacher.user).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let student_tasks = format!("/api/students/{}/tasks", w.student.profile.id);
    let (status, body) = w.get(&student_tasks, &w.subject_teacher.user).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    let (status, _) = w.get(&student_tasks, &w.class_teacher.user).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_transferred_student_records_follow_new_class_teacher() {
    let w = TestWorld::new().await;
    let (status, body) = w
        .post("/api/marks", &w.subject_teacher.user, mark_body(&w, &w.student, 7.0))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let mark_uri = format!("/api/marks/{}", body["id"].as_str().unwrap());
    submit_feedback(&w).await;

    let (status, body) = w
        .post(
            "/api/users/teachers",
            &w.principal_1,
            json!({
                "first_name": "Grace",
                "last_name": "Hopper",
                "email": "grace@test.com",
                "password": "password123",
                "role": "TEACHER"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let new_teacher: schoolhub_models::User = serde_json::from_value(body["user"].clone()).unwrap();

    let (status, class) = w
        .post(
            "/api/classes",
            &w.principal_1,
            json!({ "name": "Grade 7D", "class_teacher_id": new_teacher.id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = w
        .put(
            &format!("/api/users/students/{}/class", w.student.profile.id),
            &w.principal_1,
            json!({ "class_id": class["id"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = w.get(&mark_uri, &new_teacher).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = w.put(&mark_uri, &new_teacher, json!({ "score": 7.5 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 7.5);
    let (status, body) = w
        .get(
            &format!("/api/students/{}/feedback", w.student.profile.id),
            &new_teacher,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = w.get(&mark_uri, &w.class_teacher.user).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = w.put(&mark_uri, &w.class_teacher.user, json!({ "score": 1.0 })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = w.delete(&mark_uri, &w.class_teacher.user).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The assignment the mark was given under still reaches it.
    let (status, _) = w.get(&mark_uri, &w.subject_teacher.user).await;
    assert_eq!(status, StatusCode::OK);
}
