//! Populates a store with fake schools, staff, classes and students.
//!
//! Every school gets one principal, a set of teachers and subjects, and
//! classes whose class teacher is drawn from the school's teachers. Each
//! teacher is assigned one subject in one class so the ownership chains are
//! populated end to end. All seeded accounts share [`SEED_PASSWORD`].

use anyhow::Context;
use fake::Fake;
use fake::faker::address::en::*;
use fake::faker::name::en::*;
use schoolhub_core::password::hash_password_with_cost;
use schoolhub_db::Store;
use schoolhub_models::{AssignmentKey, AssignmentStatus, NewUser, Role, SchoolId};
use std::time::Instant;
use tracing::info;

pub const SEED_PASSWORD: &str = "password123";

const SUBJECTS: [&str; 6] = [
    "Mathematics",
    "English",
    "Biology",
    "Chemistry",
    "Physics",
    "History",
];

#[derive(Debug, Clone, Copy)]
pub struct SeedConfig {
    pub schools: usize,
    pub teachers_per_school: usize,
    pub classes_per_school: usize,
    pub students_per_class: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            schools: 2,
            teachers_per_school: 4,
            classes_per_school: 3,
            students_per_class: 10,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub schools: usize,
    pub teachers: usize,
    pub classes: usize,
    pub students: usize,
    pub assignments: usize,
}

/// Seeds `config.schools` schools. Bcrypt runs once at a low cost and the
/// hash is shared by every account.
pub async fn seed_database(store: &dyn Store, config: SeedConfig) -> anyhow::Result<SeedSummary> {
    let start_time = Instant::now();
    let password_hash = hash_password_with_cost(SEED_PASSWORD, 4).map_err(|e| e.error)?;
    let mut summary = SeedSummary::default();

    for school_idx in 0..config.schools {
        let city: String = CityName().fake();
        let street: String = StreetName().fake();
        let building: String = BuildingNumber().fake();
        let school = store
            .insert_school(
                format!("{} High School {}", city, school_idx + 1),
                Some(format!("{} {}, {}", building, street, city)),
            )
            .await
            .context("Failed to insert school")?;
        summary.schools += 1;

        store
            .appoint_principal(
                school.id,
                fake_user(Role::Admin, school.id, school_idx, 0, &password_hash),
            )
            .await
            .context("Failed to appoint principal")?;

        let mut subjects = Vec::with_capacity(SUBJECTS.len());
        for name in SUBJECTS {
            subjects.push(
                store
                    .insert_subject(school.id, name.to_string(), None)
                    .await
                    .context("Failed to insert subject")?,
            );
        }

        let mut teachers = Vec::with_capacity(config.teachers_per_school);
        for idx in 0..config.teachers_per_school {
            let subject = SUBJECTS[idx % SUBJECTS.len()].to_string();
            teachers.push(
                store
                    .insert_teacher(
                        fake_user(Role::Teacher, school.id, school_idx, idx, &password_hash),
                        vec![subject],
                    )
                    .await
                    .context("Failed to insert teacher")?,
            );
            summary.teachers += 1;
        }

        for class_idx in 0..config.classes_per_school {
            let class_teacher = teachers
                .get(class_idx % teachers.len().max(1))
                .map(|(user, _)| user.id);
            let class = store
                .insert_class(school.id, format!("Grade {}", class_idx + 7), class_teacher)
                .await
                .context("Failed to insert class")?;
            summary.classes += 1;

            for (idx, (_, profile)) in teachers.iter().enumerate() {
                if idx % config.classes_per_school.max(1) != class_idx {
                    continue;
                }
                let subject = &subjects[idx % subjects.len()];
                store
                    .insert_assignment(
                        AssignmentKey {
                            class_id: class.id,
                            subject_id: subject.id,
                            teacher_id: profile.id,
                            academic_year: "2025/2026".to_string(),
                            term: "First".to_string(),
                        },
                        AssignmentStatus::Active,
                    )
                    .await
                    .context("Failed to insert subject assignment")?;
                summary.assignments += 1;
            }

            for idx in 0..config.students_per_class {
                let seq = class_idx * config.students_per_class + idx;
                store
                    .insert_student(
                        fake_user(Role::Student, school.id, school_idx, seq, &password_hash),
                        class.id,
                    )
                    .await
                    .context("Failed to insert student")?;
                summary.students += 1;
            }
        }
    }

    info!(
        schools = summary.schools,
        teachers = summary.teachers,
        classes = summary.classes,
        students = summary.students,
        elapsed_ms = %start_time.elapsed().as_millis(),
        "Seeding complete"
    );
    Ok(summary)
}

/// Names are fake; emails are derived from the position so reruns against
/// a fresh store never collide.
fn fake_user(
    role: Role,
    school_id: SchoolId,
    school_idx: usize,
    idx: usize,
    password_hash: &str,
) -> NewUser {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    let prefix = match role {
        Role::Admin => "principal",
        Role::Teacher => "teacher",
        Role::Student => "student",
        Role::Parent => "parent",
        Role::SuperAdmin => "root",
    };
    NewUser {
        email: format!("{}{}.s{}@schoolhub.test", prefix, idx + 1, school_idx + 1),
        first_name,
        last_name,
        password_hash: password_hash.to_string(),
        role,
        school_id: Some(school_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolhub_db::{MemoryStore, SchoolStore, UserStore};

    #[tokio::test]
    async fn test_seed_counts() {
        let store = MemoryStore::new();
        let config = SeedConfig {
            schools: 2,
            teachers_per_school: 3,
            classes_per_school: 2,
            students_per_class: 4,
        };
        let summary = seed_database(&store, config).await.unwrap();
        assert_eq!(summary.schools, 2);
        assert_eq!(summary.teachers, 6);
        assert_eq!(summary.classes, 4);
        assert_eq!(summary.students, 16);
        assert_eq!(summary.assignments, 6);
        assert_eq!(store.list_schools().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_seeded_accounts_share_password() {
        let store = MemoryStore::new();
        seed_database(&store, SeedConfig::default()).await.unwrap();
        let user = store
            .find_user_by_email("teacher1.s1@schoolhub.test")
            .await
            .unwrap()
            .unwrap();
        assert!(
            schoolhub_core::password::verify_password(SEED_PASSWORD, &user.password_hash).unwrap()
        );
    }
}
