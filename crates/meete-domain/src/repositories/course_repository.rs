//! Course Repository Port

use crate::error::Result;
use crate::value_objects::Course;
use async_trait::async_trait;

/// Storage for course records
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Fetch a course by identifier
    async fn find_by_id(&self, id: i64) -> Result<Option<Course>>;

    /// Courses the principal teaches or attends
    async fn list_for_member(&self, member: &str) -> Result<Vec<Course>>;

    /// Insert or replace a course
    async fn save(&self, course: Course) -> Result<()>;
}
