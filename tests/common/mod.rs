#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use schoolhub::router::init_router;
use schoolhub::state::AppState;
use schoolhub_auth::create_access_token;
use schoolhub_config::{CorsConfig, JwtConfig};
use schoolhub_core::password::hash_password_with_cost;
use schoolhub_db::{AcademicStore, MemoryStore, SchoolStore, Store, UserStore};
use schoolhub_models::{
    AssignmentKey, AssignmentStatus, Class, NewUser, Role, School, SchoolId, StudentProfile,
    Subject, SubjectAssignment, TeacherProfile, User,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const PASSWORD: &str = "password123";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
    }
}

pub struct TestTeacher {
    pub user: User,
    pub profile: TeacherProfile,
}

pub struct TestStudent {
    pub user: User,
    pub profile: StudentProfile,
}

/// Two schools, seeded directly through the store.
///
/// School 1 has class `class_c` whose class teacher is `class_teacher`, and
/// `subject_teacher` holds the ACTIVE `assignment` (maths) in it. Students
/// `student` and `classmate` are enrolled in `class_c`. School 2 mirrors a
/// smaller setup with `other_teacher`, `other_class` and `other_student`.
pub struct TestWorld {
    pub store: Arc<MemoryStore>,
    pub app: axum::Router,
    pub super_admin: User,
    pub school_1: School,
    pub school_2: School,
    pub principal_1: User,
    pub principal_2: User,
    pub class_teacher: TestTeacher,
    pub subject_teacher: TestTeacher,
    pub other_teacher: TestTeacher,
    pub class_c: Class,
    pub other_class: Class,
    pub maths: Subject,
    pub physics: Subject,
    pub assignment: SubjectAssignment,
    pub student: TestStudent,
    pub classmate: TestStudent,
    pub other_student: TestStudent,
    pub parent: User,
}

fn new_user(email: &str, role: Role, school_id: Option<SchoolId>, password_hash: &str) -> NewUser {
    NewUser {
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        role,
        school_id,
    }
}

async fn teacher(
    store: &MemoryStore,
    email: &str,
    school_id: SchoolId,
    password_hash: &str,
) -> TestTeacher {
    let (user, profile) = store
        .insert_teacher(
            new_user(email, Role::Teacher, Some(school_id), password_hash),
            vec!["Mathematics".to_string()],
        )
        .await
        .unwrap();
    TestTeacher { user, profile }
}

async fn student(
    store: &MemoryStore,
    email: &str,
    class: &Class,
    password_hash: &str,
) -> TestStudent {
    let (user, profile) = store
        .insert_student(
            new_user(email, Role::Student, Some(class.school_id), password_hash),
            class.id,
        )
        .await
        .unwrap();
    TestStudent { user, profile }
}

impl TestWorld {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let hash = hash_password_with_cost(PASSWORD, 4).unwrap();

        let super_admin = store
            .insert_user(new_user("root@test.com", Role::SuperAdmin, None, &hash))
            .await
            .unwrap();

        let school_1 = store
            .insert_school("Northside High".to_string(), Some("1 North Rd".to_string()))
            .await
            .unwrap();
        let school_2 = store
            .insert_school("Southside High".to_string(), None)
            .await
            .unwrap();

        let principal_1 = store
            .appoint_principal(
                school_1.id,
                new_user("principal1@test.com", Role::Admin, Some(school_1.id), &hash),
            )
            .await
            .unwrap();
        let principal_2 = store
            .appoint_principal(
                school_2.id,
                new_user("principal2@test.com", Role::Admin, Some(school_2.id), &hash),
            )
            .await
            .unwrap();

        let class_teacher = teacher(&store, "t@test.com", school_1.id, &hash).await;
        let subject_teacher = teacher(&store, "u@test.com", school_1.id, &hash).await;
        let other_teacher = teacher(&store, "v@test.com", school_2.id, &hash).await;

        let class_c = store
            .insert_class(school_1.id, "Grade 7A".to_string(), Some(class_teacher.user.id))
            .await
            .unwrap();
        let other_class = store
            .insert_class(school_2.id, "Grade 7B".to_string(), Some(other_teacher.user.id))
            .await
            .unwrap();

        let maths = store
            .insert_subject(school_1.id, "Mathematics".to_string(), Some("MTH".to_string()))
            .await
            .unwrap();
        let physics = store
            .insert_subject(school_2.id, "Physics".to_string(), None)
            .await
            .unwrap();

        let assignment = store
            .insert_assignment(
                AssignmentKey {
                    class_id: class_c.id,
                    subject_id: maths.id,
                    teacher_id: subject_teacher.profile.id,
                    academic_year: "2025/2026".to_string(),
                    term: "First".to_string(),
                },
                AssignmentStatus::Active,
            )
            .await
            .unwrap();

        let student_s = student(&store, "s@test.com", &class_c, &hash).await;
        let classmate = student(&store, "s2@test.com", &class_c, &hash).await;
        let other_student = student(&store, "s3@test.com", &other_class, &hash).await;

        let parent = store
            .insert_user(new_user("parent@test.com", Role::Parent, Some(school_1.id), &hash))
            .await
            .unwrap();

        let dyn_store: Arc<dyn Store> = store.clone();
        let state = AppState::new(
            dyn_store,
            test_jwt_config(),
            CorsConfig::from_list("http://localhost:3000"),
        );

        Self {
            app: init_router(state),
            store,
            super_admin,
            school_1,
            school_2,
            principal_1,
            principal_2,
            class_teacher,
            subject_teacher,
            other_teacher,
            class_c,
            other_class,
            maths,
            physics,
            assignment,
            student: student_s,
            classmate,
            other_student,
            parent,
        }
    }

    /// A valid access token for `user`, minted without going through login.
    pub fn token(&self, user: &User) -> String {
        create_access_token(
            user.id.into_inner(),
            &user.email,
            user.role.as_str(),
            user.school_id.map(|id| id.into_inner()),
            &test_jwt_config(),
        )
        .unwrap()
    }

    pub async fn get(&self, uri: &str, user: &User) -> (StatusCode, Value) {
        self.send("GET", uri, Some(user), None).await
    }

    pub async fn post(&self, uri: &str, user: &User, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(user), Some(body)).await
    }

    pub async fn put(&self, uri: &str, user: &User, body: Value) -> (StatusCode, Value) {
        self.send("PUT", uri, Some(user), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, user: &User) -> (StatusCode, Value) {
        self.send("DELETE", uri, Some(user), None).await
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        user: Option<&User>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("authorization", format!("Bearer {}", self.token(user)));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        send_request(self.app.clone(), request).await
    }
}

pub async fn send_request(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}
