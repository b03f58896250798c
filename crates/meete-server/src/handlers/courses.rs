//! Courses the caller teaches or attends

use std::sync::Arc;
use std::time::Duration;

use meete_domain::error::{Error, Result};
use meete_domain::repositories::CourseRepository;
use meete_domain::value_objects::{Course, User};
use meete_infrastructure::cache::cached;
use meete_infrastructure::di::{
    CapabilityKey, Dependencies, Invocation, Operation, OperationInfo, Operations,
};
use meete_infrastructure::routing::{
    GroupDeclaration, HANDLER_GROUPS, HandlerGroup, HandlerGroupEntry, Route,
};
use serde::Serialize;

use crate::constants::{COURSE_CACHE_TTL_SECS, LECTURER_AUTHORITY};

/// Public view of a course
#[derive(Debug, Clone, Serialize)]
pub struct CourseSummary {
    /// Identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Lecturer principal name
    pub lecturer: String,
}

impl From<Course> for CourseSummary {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            name: course.name,
            lecturer: course.lecturer,
        }
    }
}

/// Members of a course, visible to its lecturer
#[derive(Debug, Clone, Serialize)]
pub struct Roster {
    /// Course identifier
    pub course_id: i64,
    /// Join code handed out to students
    pub code: String,
    /// Enrolled principal names
    pub members: Vec<String>,
}

/// `/courses`
pub struct CourseHandlers {
    repository: Arc<dyn CourseRepository>,
}

impl CourseHandlers {
    async fn mine(&self, user: User) -> Result<Vec<CourseSummary>> {
        let name = user.name().ok_or_else(Error::unauthenticated_default)?;
        let courses = self.repository.list_for_member(&name).await?;
        Ok(courses.into_iter().map(CourseSummary::from).collect())
    }

    async fn get(&self, course_id: i64) -> Result<CourseSummary> {
        self.find(course_id).await.map(CourseSummary::from)
    }

    async fn roster(&self, user: User, course_id: i64) -> Result<Roster> {
        let course = self.find(course_id).await?;
        if user.name().as_deref() != Some(course.lecturer.as_str()) {
            return Err(Error::unauthorized(format!(
                "Only the lecturer of course {course_id} can read its roster"
            )));
        }
        Ok(Roster {
            course_id: course.id,
            code: course.code,
            members: course.members,
        })
    }

    async fn find(&self, course_id: i64) -> Result<Course> {
        self.repository
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("Course {course_id}")))
    }
}

impl Operations for CourseHandlers {
    fn operations(self: Arc<Self>) -> Vec<Operation> {
        let ttl = Duration::from_secs(COURSE_CACHE_TTL_SECS);
        vec![
            Operation::bind(
                &self,
                OperationInfo::new::<Self>("mine"),
                |this: Arc<Self>, invocation: Invocation| async move {
                    this.mine(invocation.user()?).await
                },
            ),
            Operation::bind(
                &self,
                OperationInfo::new::<Self>("get").with_tag(cached(Some(ttl))),
                |this: Arc<Self>, invocation: Invocation| async move {
                    this.get(invocation.arg(0)?).await
                },
            ),
            Operation::bind(
                &self,
                OperationInfo::new::<Self>("roster"),
                |this: Arc<Self>, invocation: Invocation| async move {
                    this.roster(invocation.user()?, invocation.arg(0)?).await
                },
            ),
        ]
    }
}

impl HandlerGroup for CourseHandlers {
    const NAME: &'static str = "courses";

    fn declare() -> GroupDeclaration {
        GroupDeclaration::new("/courses")
            .tag("courses")
            .route(Route::get("/", "mine").user().summary("Courses of the caller"))
            .route(Route::get("/{course_id}", "get").summary("Course by identifier"))
            .route(
                Route::get("/{course_id}/roster", "roster")
                    .authorities([LECTURER_AUTHORITY])
                    .summary("Join code and members of a course"),
            )
    }

    fn dependencies() -> Vec<CapabilityKey> {
        vec![CapabilityKey::of::<dyn CourseRepository>()]
    }

    fn construct(deps: &Dependencies<'_>) -> Result<Self> {
        Ok(Self {
            repository: deps.get::<dyn CourseRepository>()?,
        })
    }
}

#[linkme::distributed_slice(HANDLER_GROUPS)]
static COURSES: HandlerGroupEntry = HandlerGroupEntry::of::<CourseHandlers>(module_path!());
