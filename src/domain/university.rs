//! University Aggregate
//!
//! Owns members, courses and the lecture schedule. Every lecture entering the
//! schedule is checked for missing fields and for teacher double-booking.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::domain::{Course, Lecture, LectureSchedule, Member, MemberKind};
use crate::error::{CoreError, Result};

// == University Data ==
/// Bulk data used to seed a [`University`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UniversityData {
    #[serde(default)]
    pub teachers: Vec<Member>,
    #[serde(default)]
    pub students: Vec<Member>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub lectures: Vec<Lecture>,
}

// == University ==
#[derive(Debug, Default)]
pub struct University {
    teachers: Vec<Member>,
    students: Vec<Member>,
    courses: Vec<Course>,
    schedule: LectureSchedule,
    /// Highest id handed out or observed so far
    last_id: u32,
}

impl University {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: UniversityData) -> Self {
        let mut university = Self::new();
        university.set_data(data);
        university
    }

    /// Appends seed data as-is. Lectures are not validated.
    pub fn set_data(&mut self, data: UniversityData) {
        debug!(
            "Adding {} teachers, {} students, {} courses and {} lectures",
            data.teachers.len(),
            data.students.len(),
            data.courses.len(),
            data.lectures.len()
        );

        let ids: Vec<Option<u32>> = data
            .teachers
            .iter()
            .chain(&data.students)
            .map(|m| m.id)
            .chain(data.courses.iter().map(|c| c.id))
            .chain(data.lectures.iter().map(|l| l.id))
            .collect();
        for id in ids {
            self.observe_id(id);
        }

        self.teachers.extend(data.teachers);
        self.students.extend(data.students);
        self.courses.extend(data.courses);
        for lecture in data.lectures {
            self.schedule.add(lecture);
        }
    }

    fn next_id(&mut self) -> u32 {
        self.last_id += 1;
        self.last_id
    }

    fn observe_id(&mut self, id: Option<u32>) {
        if let Some(id) = id {
            self.last_id = self.last_id.max(id);
        }
    }

    // == Members ==
    pub fn teachers(&self) -> &[Member] {
        &self.teachers
    }

    pub fn students(&self) -> &[Member] {
        &self.students
    }

    /// All members ordered by id.
    pub fn members(&self) -> Vec<Member> {
        let mut members: Vec<Member> = self.teachers.iter().chain(&self.students).cloned().collect();
        members.sort_by_key(|m| m.id);
        members
    }

    pub fn find_member(&self, id: u32) -> Option<&Member> {
        self.teachers
            .iter()
            .chain(&self.students)
            .find(|m| m.id == Some(id))
    }

    /// Adds a member to the list matching its kind, assigning an id if it has none.
    pub fn add_member(&mut self, mut member: Member) -> Result<Member> {
        info!("Adding member {:?}", member);

        let Some(kind) = member.kind else {
            error!("Failed to add member [{:?}]", member);
            return Err(CoreError::Domain("member type not recognized".to_string()));
        };

        match member.id {
            Some(id) if self.find_member(id).is_some() => {
                return Err(CoreError::Domain(format!("member id {} already in use", id)));
            }
            Some(_) => self.observe_id(member.id),
            None => member.id = Some(self.next_id()),
        }

        self.members_of_mut(kind).push(member.clone());
        Ok(member)
    }

    fn members_of_mut(&mut self, kind: MemberKind) -> &mut Vec<Member> {
        match kind {
            MemberKind::Teacher => &mut self.teachers,
            MemberKind::Student => &mut self.students,
        }
    }

    /// Replaces a stored member and every copy of it held by lectures.
    pub fn update_member(&mut self, member: Member) -> Result<Member> {
        let Some(id) = member.id else {
            return Err(CoreError::InvalidArgument("member has no id".to_string()));
        };
        let Some(kind) = member.kind else {
            return Err(CoreError::Domain("member type not recognized".to_string()));
        };
        if self.find_member(id).is_none() {
            return Err(CoreError::NotFound(format!("member {}", id)));
        }

        self.teachers.retain(|m| m.id != Some(id));
        self.students.retain(|m| m.id != Some(id));
        self.members_of_mut(kind).push(member.clone());

        for lecture in self.schedule.iter_mut() {
            if lecture.teacher.as_ref().and_then(|t| t.id) == Some(id) {
                lecture.teacher = Some(member.clone());
            }
            let before = lecture.students.len();
            lecture.students.retain(|s| s.id != Some(id));
            if lecture.students.len() != before {
                lecture.students.insert(member.clone());
            }
        }

        info!("Member updated with data [{:?}]", member);
        Ok(member)
    }

    /// Removes a member, dropping them from every lecture they attend.
    ///
    /// A member who still teaches a scheduled lecture cannot be removed.
    pub fn remove_member(&mut self, id: u32) -> Result<Member> {
        let Some(member) = self.find_member(id).cloned() else {
            return Err(CoreError::NotFound(format!("member {}", id)));
        };

        if self
            .schedule
            .iter()
            .any(|l| l.teacher.as_ref().and_then(|t| t.id) == Some(id))
        {
            warn!("Member [{}] still teaches scheduled lectures", id);
            return Err(CoreError::Domain(format!(
                "member {} teaches scheduled lectures",
                id
            )));
        }

        self.teachers.retain(|m| m.id != Some(id));
        self.students.retain(|m| m.id != Some(id));
        for lecture in self.schedule.iter_mut() {
            lecture.students.retain(|s| s.id != Some(id));
        }

        info!("Member [{}] removed", id);
        Ok(member)
    }

    /// Number of scheduled lectures the member teaches or attends.
    pub fn lecture_count_for(&self, member_id: u32) -> usize {
        self.schedule
            .iter()
            .filter(|l| l.involves_id(member_id))
            .count()
    }

    // == Courses ==
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn find_course(&self, id: u32) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == Some(id))
    }

    pub fn add_course(&mut self, mut course: Course) -> Result<Course> {
        match course.id {
            Some(id) if self.find_course(id).is_some() => {
                return Err(CoreError::Domain(format!("course id {} already in use", id)));
            }
            Some(_) => self.observe_id(course.id),
            None => course.id = Some(self.next_id()),
        }

        info!("Adding course {:?}", course);
        self.courses.push(course.clone());
        Ok(course)
    }

    // == Lectures ==
    pub fn lectures(&self) -> &[Lecture] {
        self.schedule.lectures()
    }

    pub fn find_lecture(&self, id: u32) -> Option<&Lecture> {
        self.schedule.iter().find(|l| l.id == Some(id))
    }

    /// A lecture needs a date, a course, a teacher and at least one student.
    pub fn is_valid_lecture(&self, lecture: &Lecture) -> bool {
        let valid = lecture.date.is_some()
            && lecture.course.is_some()
            && lecture.teacher.is_some()
            && !lecture.students.is_empty();

        if !valid {
            warn!("Field validation failed for [{}]", lecture.summary());
        }
        valid
    }

    /// False when the candidate's teacher already has a lecture starting in
    /// the same clock hour.
    pub fn has_no_conflict(&self, candidate: &Lecture) -> bool {
        let bucket = candidate.date.map(hour_bucket);

        let conflict = self.schedule.iter().find(|existing| {
            existing.teacher == candidate.teacher && existing.date.map(hour_bucket) == bucket
        });

        match conflict {
            Some(existing) => {
                warn!(
                    "Lecture [{}] conflicts with [{}]",
                    candidate.summary(),
                    existing.summary()
                );
                false
            }
            None => true,
        }
    }

    // == Schedule Lecture ==
    /// Adds a valid, conflict-free lecture, assigning an id if it has none.
    pub fn schedule_lecture(&mut self, mut lecture: Lecture) -> Result<Lecture> {
        if !(self.is_valid_lecture(&lecture) && self.has_no_conflict(&lecture)) {
            error!("Failed to schedule lecture [{}]", lecture.summary());
            return Err(CoreError::Domain("failed to schedule lecture".to_string()));
        }

        match lecture.id {
            Some(_) => self.observe_id(lecture.id),
            None => lecture.id = Some(self.next_id()),
        }

        info!("Scheduling lecture [{}]", lecture.summary());
        self.schedule.add(lecture.clone());
        Ok(lecture)
    }

    // == Cancel Lecture ==
    /// Removes one scheduled lecture equal to `lecture`.
    pub fn cancel_lecture(&mut self, lecture: &Lecture) -> Result<Lecture> {
        if self.is_valid_lecture(lecture) {
            if let Some(removed) = self.schedule.remove(lecture) {
                info!("Cancelling lecture [{}]", removed.summary());
                return Ok(removed);
            }
            error!("Lecture not found [{}]", lecture.summary());
        }
        Err(CoreError::Domain("failed to cancel lecture".to_string()))
    }

    /// Removes the scheduled lecture stored under `id`, whatever its fields.
    ///
    /// Unlike [`Self::cancel_lecture`] this also clears lectures that lost
    /// their last student when members were removed.
    pub fn remove_lecture(&mut self, id: u32) -> Result<Lecture> {
        let Some(removed) = self.schedule.remove_by_id(id) else {
            return Err(CoreError::NotFound(format!("lecture {}", id)));
        };

        info!("Removing lecture [{}]", removed.summary());
        Ok(removed)
    }

    // == Schedule Views ==
    /// Lectures of `member` in the current calendar month.
    pub fn monthly_schedule(&self, member: &Member) -> LectureSchedule {
        self.monthly_schedule_on(member, today())
    }

    /// Lectures of `member` in the calendar month of `day`.
    pub fn monthly_schedule_on(&self, member: &Member, day: NaiveDate) -> LectureSchedule {
        debug!("Getting monthly schedule for member [{:?}]", member.id);
        self.filter_schedule(member, |date| {
            date.year() == day.year() && date.month() == day.month()
        })
    }

    /// Lectures of `member` today.
    pub fn daily_schedule(&self, member: &Member) -> LectureSchedule {
        self.daily_schedule_on(member, today())
    }

    /// Lectures of `member` on `day`.
    pub fn daily_schedule_on(&self, member: &Member, day: NaiveDate) -> LectureSchedule {
        debug!("Getting daily schedule for member [{:?}]", member.id);
        self.filter_schedule(member, |date| date.date() == day)
    }

    fn filter_schedule<F>(&self, member: &Member, in_range: F) -> LectureSchedule
    where
        F: Fn(NaiveDateTime) -> bool,
    {
        let schedule: LectureSchedule = self
            .schedule
            .iter()
            .filter(|l| l.date.is_some_and(&in_range))
            .filter(|l| l.involves(member))
            .cloned()
            .collect();

        debug!("Returning filtered schedule of {} lectures", schedule.len());
        schedule
    }
}

/// Date and hour a lecture starts in; minutes and below are dropped.
fn hour_bucket(date: NaiveDateTime) -> (NaiveDate, u32) {
    (date.date(), date.hour())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
