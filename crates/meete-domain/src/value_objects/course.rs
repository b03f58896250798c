//! Course records

use serde::{Deserialize, Serialize};

/// A class users join with a code/key pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Numeric identifier used in paths
    pub id: i64,
    /// Display name
    pub name: String,
    /// Join code shown to students
    pub code: String,
    /// Principal name of the lecturer running the class
    pub lecturer: String,
    /// Principal names of enrolled members
    pub members: Vec<String>,
}

impl Course {
    /// Whether the principal teaches or attends this course
    pub fn includes(&self, member: &str) -> bool {
        self.lecturer == member || self.members.iter().any(|m| m == member)
    }
}
