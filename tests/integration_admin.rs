mod common;

use axum::http::StatusCode;
use common::TestWorld;
use serde_json::json;

fn new_member(email: &str, role: &str) -> serde_json::Value {
    json!({
        "first_name": "New",
        "last_name": "Member",
        "email": email,
        "password": "password123",
        "role": role
    })
}

#[tokio::test]
async fn test_only_super_admin_creates_schools() {
    let w = TestWorld::new().await;
    let body = json!({ "name": "Eastside High", "address": "3 East St" });

    let (status, created) = w.post("/api/schools", &w.super_admin, body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Eastside High");

    let (status, _) = w.post("/api/schools", &w.principal_1, body).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, schools) = w.get("/api/schools", &w.super_admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(schools.as_array().unwrap().len(), 3);

    let (status, _) = w.get("/api/schools", &w.principal_1).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_school_validation() {
    let w = TestWorld::new().await;

    let (status, _) = w
        .post("/api/schools", &w.super_admin, json!({ "name": "" }))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_admin_updates_only_own_school() {
    let w = TestWorld::new().await;
    let update = json!({ "name": "Northside Academy" });

    let (status, body) = w
        .put(&format!("/api/schools/{}", w.school_1.id), &w.principal_1, update.clone())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Northside Academy");

    let (status, _) = w
        .put(&format!("/api/schools/{}", w.school_2.id), &w.principal_1, update)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_super_admin_appoints_principal() {
    let w = TestWorld::new().await;
    let uri = format!("/api/schools/{}/principal", w.school_2.id);

    let (status, body) = w
        .post(&uri, &w.super_admin, new_member("head2@test.com", "ADMIN"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "ADMIN");
    assert_eq!(body["school_id"], json!(w.school_2.id));

    let (status, _) = w
        .post(&uri, &w.super_admin, new_member("head3@test.com", "TEACHER"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = w
        .post(&uri, &w.principal_2, new_member("head4@test.com", "ADMIN"))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_enrols_members_in_own_school() {
    let w = TestWorld::new().await;

    let (status, body) = w
        .post(
            "/api/users/teachers",
            &w.principal_1,
            new_member("newteacher@test.com", "TEACHER"),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["school_id"], json!(w.school_1.id));

    let mut student = new_member("newstudent@test.com", "STUDENT");
    student["class_id"] = json!(w.class_c.id);
    let (status, body) = w.post("/api/users/students", &w.principal_1, student).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["profile"]["class_id"], json!(w.class_c.id));

    let mut foreign = new_member("foreign@test.com", "STUDENT");
    foreign["class_id"] = json!(w.other_class.id);
    let (status, _) = w.post("/api/users/students", &w.principal_1, foreign).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = w
        .post(
            "/api/users/teachers",
            &w.principal_1,
            new_member("t@test.com", "TEACHER"),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = w
        .post(
            "/api/users/parents",
            &w.class_teacher.user,
            new_member("p2@test.com", "PARENT"),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_student_transfer_stays_in_school() {
    let w = TestWorld::new().await;
    let (_, class) = w
        .post("/api/classes", &w.principal_1, json!({ "name": "Grade 7C" }))
        .await;
    let uri = format!("/api/users/students/{}/class", w.student.profile.id);

    let (status, _) = w
        .put(&uri, &w.principal_1, json!({ "class_id": w.other_class.id }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = w
        .put(&uri, &w.principal_2, json!({ "class_id": class["id"] }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = w
        .put(&uri, &w.principal_1, json!({ "class_id": class["id"] }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["class_id"], class["id"]);
}

#[tokio::test]
async fn test_class_teacher_assignment_and_roster() {
    let w = TestWorld::new().await;
    let uri = format!("/api/classes/{}/class-teacher", w.class_c.id);

    let (status, _) = w
        .put(&uri, &w.principal_1, json!({ "teacher_id": w.other_teacher.user.id }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = w
        .put(&uri, &w.principal_1, json!({ "teacher_id": w.subject_teacher.user.id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["class_teacher_id"], json!(w.subject_teacher.user.id));

    let (status, roster) = w
        .get(
            &format!("/api/classes/{}/students", w.class_c.id),
            &w.subject_teacher.user,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(roster.as_array().unwrap().len(), 2);

    let (status, _) = w
        .get(
            &format!("/api/classes/{}/students", w.class_c.id),
            &w.other_student.user,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_subjects_are_school_scoped() {
    let w = TestWorld::new().await;

    let (status, _) = w
        .post(
            "/api/subjects",
            &w.principal_1,
            json!({ "name": "Chemistry", "code": "CHM" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = w.get("/api/subjects", &w.student.user).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = w
        .get(&format!("/api/subjects?school_id={}", w.school_1.id), &w.other_teacher.user)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = w.get("/api/subjects", &w.super_admin).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
