//! Domain Entities
//!
//! Members, courses and lectures as plain values.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::cache::{Pageable, StateTracker};

// == Member Kind ==
/// Role of a university member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Teacher,
    Student,
}

impl MemberKind {
    /// Numeric type id stored alongside a member.
    pub const fn type_id(self) -> u8 {
        match self {
            MemberKind::Teacher => 1,
            MemberKind::Student => 2,
        }
    }

    pub fn from_type_id(type_id: u8) -> Option<Self> {
        match type_id {
            1 => Some(MemberKind::Teacher),
            2 => Some(MemberKind::Student),
            _ => None,
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Teacher => write!(f, "teacher"),
            MemberKind::Student => write!(f, "student"),
        }
    }
}

// == Member ==
/// A teacher or student. Equality covers every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub kind: Option<MemberKind>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl Member {
    pub fn new(kind: MemberKind, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            kind: Some(kind),
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
        }
    }

    pub fn teacher(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self::new(MemberKind::Teacher, first_name, last_name)
    }

    pub fn student(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self::new(MemberKind::Student, first_name, last_name)
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn type_id(&self) -> Option<u8> {
        self.kind.map(MemberKind::type_id)
    }

    pub fn is_teacher(&self) -> bool {
        self.kind == Some(MemberKind::Teacher)
    }

    pub fn is_student(&self) -> bool {
        self.kind == Some(MemberKind::Student)
    }
}

impl Pageable for Member {
    type Tag = MemberKind;

    fn tag(&self) -> Option<MemberKind> {
        self.kind
    }

    fn key(&self) -> Option<u32> {
        self.id
    }
}

// == Member Tracker ==
/// Tracks each member's type id to catch role changes.
pub type MemberTracker = StateTracker<Member, u32, u8>;

fn member_id(member: &Member) -> Option<u32> {
    member.id
}

fn member_type_id(member: &Member) -> Option<u8> {
    member.type_id()
}

/// Creates a [`MemberTracker`] holding at most `capacity` members.
pub fn member_tracker(capacity: usize) -> MemberTracker {
    StateTracker::new(capacity, member_id, member_type_id)
}

// == Course ==
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Course {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Course {
    pub fn new(subject: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            subject: Some(subject.into()),
            description: Some(description.into()),
        }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }
}

impl Pageable for Course {
    type Tag = ();

    fn tag(&self) -> Option<()> {
        Some(())
    }

    fn key(&self) -> Option<u32> {
        self.id
    }
}

// == Lecture ==
/// A course session held by one teacher for a set of students.
///
/// Two lectures are equal when date, course, teacher and students match;
/// the id does not take part.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lecture {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub date: Option<NaiveDateTime>,
    #[serde(default)]
    pub course: Option<Course>,
    #[serde(default)]
    pub teacher: Option<Member>,
    #[serde(default)]
    pub students: BTreeSet<Member>,
}

impl Lecture {
    pub fn new(date: NaiveDateTime, course: Course, teacher: Member) -> Self {
        Self {
            id: None,
            date: Some(date),
            course: Some(course),
            teacher: Some(teacher),
            students: BTreeSet::new(),
        }
    }

    pub fn with_student(mut self, student: Member) -> Self {
        self.students.insert(student);
        self
    }

    pub fn add_student(&mut self, student: Member) {
        self.students.insert(student);
    }

    pub fn remove_student(&mut self, student: &Member) -> bool {
        self.students.remove(student)
    }

    /// True when `member` teaches or attends this lecture.
    pub fn involves(&self, member: &Member) -> bool {
        self.teacher.as_ref() == Some(member) || self.students.contains(member)
    }

    /// True when the member with `id` teaches or attends this lecture.
    pub fn involves_id(&self, id: u32) -> bool {
        self.teacher.as_ref().and_then(|t| t.id) == Some(id)
            || self.students.iter().any(|s| s.id == Some(id))
    }

    /// One-line summary for logs.
    pub fn summary(&self) -> String {
        let date = self
            .date
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        let teacher = self
            .teacher
            .as_ref()
            .and_then(|t| t.id)
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let course = self
            .course
            .as_ref()
            .and_then(|c| c.subject.clone())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "id: {:?}, date: {}, teacher: {}, course: {}, students: {}",
            self.id,
            date,
            teacher,
            course,
            self.students.len()
        )
    }
}

impl PartialEq for Lecture {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
            && self.course == other.course
            && self.teacher == other.teacher
            && self.students == other.students
    }
}

impl Eq for Lecture {}

impl Pageable for Lecture {
    type Tag = ();

    fn tag(&self) -> Option<()> {
        Some(())
    }

    fn key(&self) -> Option<u32> {
        self.id
    }
}
