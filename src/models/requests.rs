//! Request DTOs for the campus API
//!
//! Defines the structure of incoming query strings and request bodies.

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::domain::{Course, Member, MemberKind, ScheduleRange};

/// Query string of the paged listing endpoints.
///
/// # Fields
/// - `page`: Requested page number, clamped into range (default 1). Values
///   beyond `i32` saturate.
/// - `kind`: Restricts member listings to one kind
/// - `fetch`: Forces the session cache to reload before paging
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub kind: Option<MemberKind>,
    #[serde(default)]
    pub fetch: Option<bool>,
}

impl PageQuery {
    pub fn page_number(&self) -> i32 {
        let page = self.page.unwrap_or(1);
        page.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }

    pub fn refresh(&self) -> bool {
        self.fetch.unwrap_or(false)
    }

    /// Tags to page over; empty means every member.
    pub fn kinds(&self) -> Vec<MemberKind> {
        self.kind.into_iter().collect()
    }
}

/// Request body for POST /members and PUT /members/:id
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberRequest {
    #[serde(default)]
    pub kind: Option<MemberKind>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl MemberRequest {
    pub fn into_member(self, id: Option<u32>) -> Member {
        Member {
            id,
            kind: self.kind,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}

/// Request body for POST /courses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseRequest {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<CourseRequest> for Course {
    fn from(req: CourseRequest) -> Self {
        Course {
            id: None,
            subject: req.subject,
            description: req.description,
        }
    }
}

/// Request body for POST /lectures
///
/// Entities are referenced by id and resolved against the university.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LectureRequest {
    /// Start time, `YYYY-MM-DDTHH:MM:SS`
    #[serde(default)]
    pub date: Option<NaiveDateTime>,
    #[serde(default)]
    pub course_id: Option<u32>,
    #[serde(default)]
    pub teacher_id: Option<u32>,
    #[serde(default)]
    pub student_ids: Vec<u32>,
}

/// Query string of GET /members/:id/schedule
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleQuery {
    #[serde(default)]
    pub range: Option<ScheduleRange>,
}
