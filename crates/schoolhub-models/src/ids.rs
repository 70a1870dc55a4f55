//! Strongly-typed ID newtypes for domain entities.
//!
//! Every entity gets its own wrapper around `Uuid`, so a `StudentProfileId`
//! can never be passed where a `UserId` is expected. This matters here more
//! than usual: several policy checks compare a user id (class teacher) while
//! others compare a profile id (subject teacher, student owner).

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        #[schema(value_type = String, format = "uuid")]
        pub struct $name(pub Uuid);

        impl $name {
            #[inline]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Deterministic ids for fixtures.
            #[inline]
            pub const fn from_u128(v: u128) -> Self {
                Self(Uuid::from_u128(v))
            }

            #[inline]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }
    };
}

define_id!(
    /// Identifies a `User`.
    UserId
);

define_id!(
    /// Identifies a `School`.
    SchoolId
);

define_id!(
    /// Identifies a `Class`.
    ClassId
);

define_id!(
    /// Identifies a `Subject`.
    SubjectId
);

define_id!(
    /// Identifies a `TeacherProfile`.
    TeacherProfileId
);

define_id!(
    /// Identifies a `StudentProfile`.
    StudentProfileId
);

define_id!(
    /// Identifies a `SubjectAssignment`.
    SubjectAssignmentId
);

define_id!(
    /// Identifies a `Attendance`.
    AttendanceId
);

define_id!(
    /// Identifies a `Mark`.
    MarkId
);

define_id!(
    /// Identifies a `Feedback`.
    FeedbackId
);

define_id!(
    /// Identifies a `Task`.
    TaskId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_u128() {
        let id = ClassId::from_u128(1);
        assert_eq!(id.into_inner(), Uuid::from_u128(1));
    }

    #[test]
    fn test_id_debug_names_the_entity() {
        let id = StudentProfileId::from_u128(0x12345678_1234_1234_1234_123456789abc);
        let debug = format!("{:?}", id);
        assert!(debug.starts_with("StudentProfileId("));
        assert!(debug.contains("12345678-1234-1234-1234-123456789abc"));
    }

    #[test]
    fn test_id_from_str_invalid() {
        let result: Result<UserId, _> = "invalid-uuid".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_id_is_transparent_on_the_wire() {
        let id = MarkId::from_u128(0x12345678_1234_1234_1234_123456789abc);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""12345678-1234-1234-1234-123456789abc""#);

        let back: MarkId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
