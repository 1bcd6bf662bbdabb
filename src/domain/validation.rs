//! Entity Validation
//!
//! Named predicates grouped per operation. A failed check reports every
//! rule that did not hold.

use std::fmt;

use tracing::{debug, warn};

use crate::domain::{Course, Lecture, Member, MemberKind};
use crate::error::{CoreError, Result};

// == Rule ==
/// A named predicate over an entity.
pub struct Rule<T> {
    pub description: &'static str,
    pub check: fn(&T) -> bool,
}

impl<T> Rule<T> {
    pub const fn new(description: &'static str, check: fn(&T) -> bool) -> Self {
        Self { description, check }
    }
}

impl<T> Clone for Rule<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Rule<T> {}

impl<T> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rule [{}]", self.description)
    }
}

// == Entity Validator ==
#[derive(Debug)]
pub struct EntityValidator<T> {
    creation: Vec<Rule<T>>,
    update: Vec<Rule<T>>,
    deletion: Vec<Rule<T>>,
}

impl<T> Default for EntityValidator<T> {
    fn default() -> Self {
        Self {
            creation: Vec::new(),
            update: Vec::new(),
            deletion: Vec::new(),
        }
    }
}

impl<T> EntityValidator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn creation_rule(mut self, rule: Rule<T>) -> Self {
        debug!("[{}] added as creation rule", rule.description);
        self.creation.push(rule);
        self
    }

    pub fn update_rule(mut self, rule: Rule<T>) -> Self {
        debug!("[{}] added as update rule", rule.description);
        self.update.push(rule);
        self
    }

    pub fn deletion_rule(mut self, rule: Rule<T>) -> Self {
        debug!("[{}] added as deletion rule", rule.description);
        self.deletion.push(rule);
        self
    }

    pub fn validate_creatable(&self, entity: &T) -> Result<()> {
        check(&self.creation, entity)
    }

    pub fn validate_updatable(&self, entity: &T) -> Result<()> {
        check(&self.update, entity)
    }

    pub fn validate_deletable(&self, entity: &T) -> Result<()> {
        check(&self.deletion, entity)
    }
}

fn check<T>(rules: &[Rule<T>], entity: &T) -> Result<()> {
    let failed: Vec<&str> = rules
        .iter()
        .filter(|rule| !(rule.check)(entity))
        .map(|rule| rule.description)
        .collect();

    if failed.is_empty() {
        return Ok(());
    }

    warn!("Validation failed: {:?}", failed);
    Err(CoreError::Validation(failed.join(", ")))
}

/// Ids must be greater than zero.
pub fn validate_id(id: i64) -> Result<()> {
    if id > 0 {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "id must be greater than zero".to_string(),
        ))
    }
}

// == Member Rules ==
pub mod member_rules {
    use super::*;

    pub const HAS_ID: Rule<Member> = Rule::new("has valid id set", |m: &Member| m.id.is_some_and(|id| id > 0));
    pub const HAS_FIRST_NAME: Rule<Member> = Rule::new("has first name", |m: &Member| m.first_name.is_some());
    pub const HAS_LAST_NAME: Rule<Member> = Rule::new("has last name", |m: &Member| m.last_name.is_some());
    pub const HAS_TYPE: Rule<Member> = Rule::new("has valid type set", |m: &Member| m.kind.is_some());
}

// == Course Rules ==
pub mod course_rules {
    use super::*;

    pub const HAS_ID: Rule<Course> = Rule::new("has valid id set", |c: &Course| c.id.is_some_and(|id| id > 0));
    pub const HAS_SUBJECT: Rule<Course> = Rule::new("has subject set", |c: &Course| c.subject.is_some());
    pub const HAS_DESCRIPTION: Rule<Course> = Rule::new("has description", |c: &Course| c.description.is_some());
}

// == Lecture Rules ==
pub mod lecture_rules {
    use super::*;

    pub const HAS_ID: Rule<Lecture> = Rule::new("has valid id set", |l: &Lecture| l.id.is_some_and(|id| id > 0));
    pub const HAS_DATE: Rule<Lecture> = Rule::new("has date set", |l: &Lecture| l.date.is_some());
    pub const HAS_COURSE: Rule<Lecture> = Rule::new("has course set", |l: &Lecture| l.course.is_some());
    pub const HAS_TEACHER: Rule<Lecture> = Rule::new("has teacher set", |l: &Lecture| l.teacher.is_some());
    pub const HAS_VALID_TEACHER: Rule<Lecture> = Rule::new("has valid teacher", |l: &Lecture| {
        l.teacher.as_ref().is_some_and(|t| t.kind == Some(MemberKind::Teacher))
    });
    pub const HAS_STUDENTS: Rule<Lecture> = Rule::new("has students", |l: &Lecture| !l.students.is_empty());
    pub const HAS_VALID_STUDENTS: Rule<Lecture> = Rule::new("has valid students", |l: &Lecture| {
        l.students.iter().all(|s| s.kind == Some(MemberKind::Student))
    });
}

/// Rules applied to members by the service layer.
pub fn member_validator() -> EntityValidator<Member> {
    use member_rules::*;

    EntityValidator::new()
        .creation_rule(HAS_TYPE)
        .creation_rule(HAS_FIRST_NAME)
        .creation_rule(HAS_LAST_NAME)
        .update_rule(HAS_ID)
        .update_rule(HAS_TYPE)
        .update_rule(HAS_FIRST_NAME)
        .update_rule(HAS_LAST_NAME)
        .deletion_rule(HAS_ID)
}

pub fn course_validator() -> EntityValidator<Course> {
    use course_rules::*;

    EntityValidator::new()
        .creation_rule(HAS_SUBJECT)
        .creation_rule(HAS_DESCRIPTION)
        .update_rule(HAS_ID)
        .update_rule(HAS_SUBJECT)
        .update_rule(HAS_DESCRIPTION)
        .deletion_rule(HAS_ID)
}

pub fn lecture_validator() -> EntityValidator<Lecture> {
    use lecture_rules::*;

    EntityValidator::new()
        .creation_rule(HAS_DATE)
        .creation_rule(HAS_COURSE)
        .creation_rule(HAS_TEACHER)
        .creation_rule(HAS_VALID_TEACHER)
        .creation_rule(HAS_STUDENTS)
        .creation_rule(HAS_VALID_STUDENTS)
        .deletion_rule(HAS_ID)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_member_creation_rules() {
        let validator = member_validator();

        assert!(validator
            .validate_creatable(&Member::student("Alan", "Turing"))
            .is_ok());

        let result = validator.validate_creatable(&Member::default());
        let Err(CoreError::Validation(message)) = result else {
            panic!("expected validation error");
        };
        assert!(message.contains("has valid type set"));
        assert!(message.contains("has first name"));
        assert!(message.contains("has last name"));
    }

    #[test]
    fn test_member_update_requires_id() {
        let validator = member_validator();
        let member = Member::teacher("Ada", "Lovelace");

        assert!(validator.validate_updatable(&member).is_err());
        assert!(validator.validate_updatable(&member.with_id(4)).is_ok());
    }

    #[test]
    fn test_course_rules() {
        let validator = course_validator();
        assert!(validator
            .validate_creatable(&Course::new("Math", "Analysis"))
            .is_ok());
        assert!(validator.validate_deletable(&Course::default()).is_err());
    }

    #[test]
    fn test_lecture_rules_check_member_kinds() {
        let validator = lecture_validator();
        let date = NaiveDate::from_ymd_opt(2026, 1, 5)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .unwrap();

        let valid = Lecture::new(date, Course::new("Math", "Analysis"), Member::teacher("Ada", "Lovelace"))
            .with_student(Member::student("Alan", "Turing"));
        assert!(validator.validate_creatable(&valid).is_ok());

        let swapped = Lecture::new(date, Course::new("Math", "Analysis"), Member::student("Alan", "Turing"))
            .with_student(Member::teacher("Ada", "Lovelace"));
        let Err(CoreError::Validation(message)) = validator.validate_creatable(&swapped) else {
            panic!("expected validation error");
        };
        assert_eq!(message, "has valid teacher, has valid students");
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id(1).is_ok());
        assert!(validate_id(0).is_err());
        assert!(validate_id(-3).is_err());
    }
}
