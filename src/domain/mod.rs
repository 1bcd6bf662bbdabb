//! Domain Module
//!
//! University entities, the lecture schedule and the aggregate that guards it
//! against teacher double-booking.

mod entities;
mod schedule;
mod university;
pub mod validation;

pub use entities::{member_tracker, Course, Lecture, Member, MemberKind, MemberTracker};
pub use schedule::{LectureSchedule, ScheduleRange};
pub use university::{University, UniversityData};
pub use validation::{
    course_validator, lecture_validator, member_validator, validate_id, EntityValidator, Rule,
};
