//! In-memory course repository

use async_trait::async_trait;
use dashmap::DashMap;
use meete_domain::error::Result;
use meete_domain::repositories::CourseRepository;
use meete_domain::value_objects::Course;

/// Course storage held in process memory
#[derive(Debug, Default)]
pub struct InMemoryCourseRepository {
    courses: DashMap<i64, Course>,
}

impl InMemoryCourseRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository holding the given courses
    pub fn with_courses<I: IntoIterator<Item = Course>>(courses: I) -> Self {
        let repository = Self::new();
        for course in courses {
            repository.courses.insert(course.id, course);
        }
        repository
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Course>> {
        Ok(self.courses.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_for_member(&self, member: &str) -> Result<Vec<Course>> {
        let mut courses: Vec<Course> = self
            .courses
            .iter()
            .filter(|entry| entry.value().includes(member))
            .map(|entry| entry.value().clone())
            .collect();
        courses.sort_by_key(|course| course.id);
        Ok(courses)
    }

    async fn save(&self, course: Course) -> Result<()> {
        self.courses.insert(course.id, course);
        Ok(())
    }
}
