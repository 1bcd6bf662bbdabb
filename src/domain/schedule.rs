//! Lecture Schedule
//!
//! Ordered collection of lectures.

use serde::{Deserialize, Serialize};

use crate::domain::Lecture;

/// Window of a member's schedule projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleRange {
    Daily,
    #[default]
    Monthly,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LectureSchedule {
    lectures: Vec<Lecture>,
}

impl LectureSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, lecture: Lecture) {
        self.lectures.push(lecture);
    }

    /// Removes the first lecture equal to `lecture`.
    pub fn remove(&mut self, lecture: &Lecture) -> Option<Lecture> {
        let position = self.lectures.iter().position(|l| l == lecture)?;
        Some(self.lectures.remove(position))
    }

    /// Removes the lecture stored under `id`.
    pub fn remove_by_id(&mut self, id: u32) -> Option<Lecture> {
        let position = self.lectures.iter().position(|l| l.id == Some(id))?;
        Some(self.lectures.remove(position))
    }

    pub fn contains(&self, lecture: &Lecture) -> bool {
        self.lectures.contains(lecture)
    }

    pub fn lectures(&self) -> &[Lecture] {
        &self.lectures
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Lecture> {
        self.lectures.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Lecture> {
        self.lectures.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.lectures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lectures.is_empty()
    }
}

impl FromIterator<Lecture> for LectureSchedule {
    fn from_iter<I: IntoIterator<Item = Lecture>>(iter: I) -> Self {
        Self {
            lectures: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for LectureSchedule {
    type Item = Lecture;
    type IntoIter = std::vec::IntoIter<Lecture>;

    fn into_iter(self) -> Self::IntoIter {
        self.lectures.into_iter()
    }
}
