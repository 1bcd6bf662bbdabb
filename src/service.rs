//! Campus Service
//!
//! Ties the university aggregate to per-session paging caches and the shared
//! member type tracker. Reads refresh a session's cache when it has gone
//! stale; writes invalidate the caches they affect for the calling session.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, error, info};

use crate::cache::{current_timestamp_ms, LruTracker, Page, Paginator, PaginatorStats};
use crate::config::Config;
use crate::domain::{
    course_validator, lecture_validator, member_tracker, member_validator, Course,
    EntityValidator, Lecture, LectureSchedule, Member, MemberKind, MemberTracker, ScheduleRange,
    University, UniversityData,
};
use crate::error::{CoreError, Result};

/// Session id used when a caller does not identify itself.
pub const ANONYMOUS_SESSION: &str = "anonymous";

/// Member partitions indexed on every refresh.
const MEMBER_TAGS: [MemberKind; 2] = [MemberKind::Teacher, MemberKind::Student];

// == Session ==
/// Paging caches owned by one caller.
#[derive(Debug)]
pub struct Session {
    members: Paginator<Member>,
    courses: Paginator<Course>,
    lectures: Paginator<Lecture>,
    /// Last access (Unix milliseconds)
    last_seen: u64,
}

impl Session {
    fn new(config: &Config) -> Self {
        Self {
            members: Paginator::new(config.page_ttl, config.items_per_page),
            courses: Paginator::new(config.page_ttl, config.items_per_page),
            lectures: Paginator::new(config.lecture_page_ttl, config.items_per_page),
            last_seen: current_timestamp_ms(),
        }
    }

    fn is_idle(&self, now: u64, idle_ttl_seconds: u64) -> bool {
        now.saturating_sub(self.last_seen) > idle_ttl_seconds.saturating_mul(1000)
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            members: self.members.stats(),
            courses: self.courses.stats(),
            lectures: self.lectures.stats(),
        }
    }
}

/// Paginator counters of one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub members: PaginatorStats,
    pub courses: PaginatorStats,
    pub lectures: PaginatorStats,
}

// == Campus Service ==
#[derive(Debug)]
pub struct CampusService {
    university: University,
    tracker: MemberTracker,
    sessions: HashMap<String, Session>,
    /// Session ids by recency of use
    session_order: LruTracker<String>,
    config: Config,
    member_validator: EntityValidator<Member>,
    course_validator: EntityValidator<Course>,
    lecture_validator: EntityValidator<Lecture>,
}

impl CampusService {
    // == Constructors ==
    pub fn new(config: Config) -> Self {
        Self::from_data(config, UniversityData::default())
    }

    /// Creates a service over a university seeded with `data`.
    pub fn from_data(config: Config, data: UniversityData) -> Self {
        info!(
            "Campus service initialized: tracker capacity [{}], items per page [{}]",
            config.tracker_capacity, config.items_per_page
        );
        Self {
            university: University::from_data(data),
            tracker: member_tracker(config.tracker_capacity),
            sessions: HashMap::new(),
            session_order: LruTracker::new(),
            config,
            member_validator: member_validator(),
            course_validator: course_validator(),
            lecture_validator: lecture_validator(),
        }
    }

    /// Returns the caller's session, opening it on first use.
    ///
    /// Opening a session first drops idle ones, then the least recently used
    /// ones until there is room under `session_capacity`.
    fn session_mut(&mut self, session: &str) -> &mut Session {
        let now = current_timestamp_ms();
        let id = session.to_string();

        if !self.sessions.contains_key(&id) {
            self.drop_idle_sessions(now);
            let capacity = self.config.session_capacity.max(1);
            while self.sessions.len() >= capacity {
                match self.session_order.evict_oldest() {
                    Some(oldest) => {
                        debug!("Session capacity reached. Dropping [{}]", oldest);
                        self.sessions.remove(&oldest);
                    }
                    None => break,
                }
            }
        }
        self.session_order.touch(&id);

        let config = &self.config;
        let entry = self.sessions.entry(id).or_insert_with(|| {
            debug!("Opening session [{}]", session);
            Session::new(config)
        });
        entry.last_seen = now;
        entry
    }

    fn drop_idle_sessions(&mut self, now: u64) {
        let idle_ttl = self.config.session_idle_ttl;
        let idle: Vec<String> = self
            .sessions
            .iter()
            .filter(|(_, s)| s.is_idle(now, idle_ttl))
            .map(|(id, _)| id.clone())
            .collect();

        for id in idle {
            debug!("Dropping idle session [{}]", id);
            self.sessions.remove(&id);
            self.session_order.remove(&id);
        }
    }

    pub fn university(&self) -> &University {
        &self.university
    }

    pub fn tracker(&self) -> &MemberTracker {
        &self.tracker
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn has_session(&self, session: &str) -> bool {
        self.sessions.contains_key(session)
    }

    /// Drops a session and its caches. Returns false if it did not exist.
    pub fn end_session(&mut self, session: &str) -> bool {
        self.session_order.remove(&session.to_string());
        self.sessions.remove(session).is_some()
    }

    // == Members ==
    /// Serves a member page, reloading the session cache when asked to or
    /// when it is no longer valid. Every reload tracks member types.
    pub fn member_page(
        &mut self,
        session: &str,
        page: i32,
        kinds: &[MemberKind],
        refresh: bool,
    ) -> Result<Page<Member>> {
        if refresh || !self.session_mut(session).members.has_valid_cache() {
            let members = self.university.members();
            debug!("Refreshing member cache with [{}] members", members.len());

            self.tracker.track_all(Some(members.as_slice()))?;
            self.session_mut(session)
                .members
                .set_data(Some(members), &MEMBER_TAGS)?;
        }

        Ok(self.session_mut(session).members.page(page, kinds))
    }

    /// Looks a member up in the session cache, falling back to the aggregate.
    pub fn member(&mut self, session: &str, id: u32) -> Result<Member> {
        let members = &self.session_mut(session).members;
        if members.has_valid_cache() {
            if let Some(member) = members.get_entry(id) {
                return Ok(member.clone());
            }
        }

        let member = self
            .university
            .find_member(id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("member {}", id)))?;
        self.tracker.track(&member)?;
        Ok(member)
    }

    pub fn create_member(&mut self, session: &str, member: Member) -> Result<Member> {
        self.member_validator.validate_creatable(&member)?;

        let created = self.university.add_member(member)?;
        self.tracker.track(&created)?;
        self.session_mut(session).members.invalidate_cache();
        Ok(created)
    }

    /// Updates a member. A type change is refused while the member still has
    /// scheduled lectures.
    pub fn update_member(&mut self, session: &str, member: Member) -> Result<Member> {
        self.member_validator.validate_updatable(&member)?;

        if self.tracker.tracked_field_changed(&member)? {
            self.validate_type_change(&member)?;
        }

        debug!("Updating member with data [{:?}]", member);
        let updated = self.university.update_member(member)?;
        self.tracker.track(&updated)?;

        let session = self.session_mut(session);
        session.members.invalidate_cache();
        session.lectures.invalidate_cache();
        Ok(updated)
    }

    fn validate_type_change(&self, member: &Member) -> Result<()> {
        let id = member.id.unwrap_or_default();
        if self.university.lecture_count_for(id) > 0 {
            error!("Unacceptable state change for [{:?}]", member);
            return Err(CoreError::Domain(format!(
                "member type cannot be altered, found scheduled lectures for id {}",
                id
            )));
        }
        debug!("State change accepted. No scheduled lectures found");
        Ok(())
    }

    pub fn delete_member(&mut self, session: &str, id: u32) -> Result<Member> {
        let member = self
            .university
            .find_member(id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("member {}", id)))?;
        self.member_validator.validate_deletable(&member)?;

        let removed = self.university.remove_member(id)?;
        let session = self.session_mut(session);
        session.members.invalidate_cache();
        session.lectures.invalidate_cache();
        Ok(removed)
    }

    // == Courses ==
    pub fn course_page(&mut self, session: &str, page: i32, refresh: bool) -> Result<Page<Course>> {
        if refresh || !self.session_mut(session).courses.has_valid_cache() {
            let courses = self.university.courses().to_vec();
            debug!("Refreshing course cache with [{}] courses", courses.len());
            self.session_mut(session).courses.set_data(Some(courses), &[])?;
        }

        Ok(self.session_mut(session).courses.page(page, &[]))
    }

    pub fn create_course(&mut self, session: &str, course: Course) -> Result<Course> {
        self.course_validator.validate_creatable(&course)?;

        let created = self.university.add_course(course)?;
        self.session_mut(session).courses.invalidate_cache();
        Ok(created)
    }

    // == Lectures ==
    pub fn lecture_page(&mut self, session: &str, page: i32, refresh: bool) -> Result<Page<Lecture>> {
        if refresh || !self.session_mut(session).lectures.has_valid_cache() {
            let lectures = self.university.lectures().to_vec();
            debug!("Refreshing lecture cache with [{}] lectures", lectures.len());
            self.session_mut(session).lectures.set_data(Some(lectures), &[])?;
        }

        Ok(self.session_mut(session).lectures.page(page, &[]))
    }

    /// Builds a lecture from stored entities. Absent ids leave the field empty
    /// for validation to report; unknown ids are `NotFound`.
    pub fn resolve_lecture(
        &self,
        date: Option<NaiveDateTime>,
        course_id: Option<u32>,
        teacher_id: Option<u32>,
        student_ids: &[u32],
    ) -> Result<Lecture> {
        let course = course_id
            .map(|id| {
                self.university
                    .find_course(id)
                    .cloned()
                    .ok_or_else(|| CoreError::NotFound(format!("course {}", id)))
            })
            .transpose()?;
        let teacher = teacher_id.map(|id| self.find_member(id)).transpose()?;

        let mut lecture = Lecture {
            date,
            course,
            teacher,
            ..Lecture::default()
        };
        for id in student_ids {
            lecture.add_student(self.find_member(*id)?);
        }
        Ok(lecture)
    }

    fn find_member(&self, id: u32) -> Result<Member> {
        self.university
            .find_member(id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("member {}", id)))
    }

    pub fn schedule_lecture(&mut self, session: &str, lecture: Lecture) -> Result<Lecture> {
        self.lecture_validator.validate_creatable(&lecture)?;

        let scheduled = self.university.schedule_lecture(lecture)?;
        self.session_mut(session).lectures.invalidate_cache();
        Ok(scheduled)
    }

    pub fn cancel_lecture(&mut self, session: &str, id: u32) -> Result<Lecture> {
        let lecture = self
            .university
            .find_lecture(id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("lecture {}", id)))?;
        self.lecture_validator.validate_deletable(&lecture)?;

        let cancelled = self.university.remove_lecture(id)?;
        self.session_mut(session).lectures.invalidate_cache();
        Ok(cancelled)
    }

    // == Schedules ==
    pub fn member_schedule(&self, id: u32, range: ScheduleRange) -> Result<LectureSchedule> {
        let member = self.find_member(id)?;
        Ok(match range {
            ScheduleRange::Daily => self.university.daily_schedule(&member),
            ScheduleRange::Monthly => self.university.monthly_schedule(&member),
        })
    }

    /// Same as [`Self::member_schedule`] relative to `day` instead of today.
    pub fn member_schedule_on(
        &self,
        id: u32,
        range: ScheduleRange,
        day: NaiveDate,
    ) -> Result<LectureSchedule> {
        let member = self.find_member(id)?;
        Ok(match range {
            ScheduleRange::Daily => self.university.daily_schedule_on(&member, day),
            ScheduleRange::Monthly => self.university.monthly_schedule_on(&member, day),
        })
    }

    // == Stats ==
    /// Counters of `session`; zeroed for a session that is not open.
    pub fn stats(&self, session: &str) -> SessionStats {
        self.sessions
            .get(session)
            .map(Session::stats)
            .unwrap_or_default()
    }
}
