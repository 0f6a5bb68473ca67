//! Course catalog and review workflow.

use std::sync::Arc;

use crate::domain::entities::{Course, CourseStatus, CurrentUser, NewCourse};
use crate::domain::repositories::CourseRepository;
use crate::error::AppError;
use serde_json::json;
use uuid::Uuid;

/// Service for the published catalog, draft creation and status review.
pub struct CourseService<C: CourseRepository> {
    repository: Arc<C>,
}

impl<C: CourseRepository> CourseService<C> {
    pub fn new(repository: Arc<C>) -> Self {
        Self { repository }
    }

    /// Returns one page of published courses and the total count.
    pub async fn list_published(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Course>, i64), AppError> {
        let courses = self.repository.list_published(offset, limit).await?;
        let total = self.repository.count_published().await?;
        Ok((courses, total))
    }

    /// Fetches a course the viewer is allowed to see.
    ///
    /// Published courses are public; others are visible only to their
    /// instructor and to admins. Hidden courses are reported as missing.
    pub async fn get_visible(
        &self,
        id: Uuid,
        viewer: Option<&CurrentUser>,
    ) -> Result<Course, AppError> {
        let course = self.find(id).await?;

        let visible = course.is_available()
            || viewer.is_some_and(|v| v.is_admin() || course.is_owned_by(v.id));

        if !visible {
            return Err(course_not_found(id));
        }

        Ok(course)
    }

    /// Creates a draft course owned by `author`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] if the author is a student.
    pub async fn create(
        &self,
        author: &CurrentUser,
        title: String,
        description: Option<String>,
        price: f64,
        currency: String,
    ) -> Result<Course, AppError> {
        if !author.can_author() {
            return Err(AppError::forbidden(
                "Only instructors can create courses",
                json!({ "role": author.role }),
            ));
        }

        let course = self
            .repository
            .create(NewCourse {
                title: title.trim().to_string(),
                description: description
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty()),
                price,
                currency: currency.trim().to_ascii_uppercase(),
                instructor_id: author.id,
            })
            .await?;

        tracing::info!(course_id = %course.id, instructor_id = %author.id, "Course draft created");
        Ok(course)
    }

    /// Sends a draft (or rejected) course to review.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the course does not exist
    /// - [`AppError::Forbidden`] if `user` is not the course's instructor
    /// - [`AppError::Conflict`] if the course cannot be submitted from its status
    pub async fn submit_for_review(
        &self,
        user: &CurrentUser,
        id: Uuid,
    ) -> Result<Course, AppError> {
        let course = self.find(id).await?;

        if !course.is_owned_by(user.id) {
            return Err(AppError::forbidden(
                "Only the course instructor can submit it for review",
                json!({ "course_id": id }),
            ));
        }

        self.transition(course, CourseStatus::PendingReview, None)
            .await
    }

    /// Publishes a course under review.
    pub async fn approve(&self, id: Uuid) -> Result<Course, AppError> {
        let course = self.find(id).await?;
        self.transition(course, CourseStatus::Published, None).await
    }

    /// Sends a course under review back to its instructor.
    pub async fn reject(&self, id: Uuid, reason: String) -> Result<Course, AppError> {
        let course = self.find(id).await?;
        self.transition(course, CourseStatus::Rejected, Some(reason))
            .await
    }

    async fn find(&self, id: Uuid) -> Result<Course, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| course_not_found(id))
    }

    async fn transition(
        &self,
        course: Course,
        next: CourseStatus,
        rejection_reason: Option<String>,
    ) -> Result<Course, AppError> {
        if !course.status.can_transition_to(next) {
            return Err(invalid_transition(&course, next));
        }

        let updated = self
            .repository
            .update_status(course.id, course.status, next, rejection_reason)
            .await?
            .ok_or_else(|| invalid_transition(&course, next))?;

        tracing::info!(
            course_id = %updated.id,
            from = %course.status,
            to = %updated.status,
            "Course status changed"
        );

        Ok(updated)
    }
}

fn course_not_found(id: Uuid) -> AppError {
    AppError::not_found("Course not found", json!({ "course_id": id }))
}

fn invalid_transition(course: &Course, next: CourseStatus) -> AppError {
    AppError::conflict(
        "Course status does not allow this change",
        json!({ "course_id": course.id, "status": course.status, "requested": next }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UserRole;
    use crate::domain::repositories::MockCourseRepository;
    use chrono::Utc;

    fn user(role: UserRole) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "u@example.com".to_string(),
            full_name: None,
            role,
        }
    }

    fn course(instructor_id: Uuid, status: CourseStatus) -> Course {
        Course {
            id: Uuid::new_v4(),
            title: "Intro to Go".to_string(),
            description: None,
            price: 10.0,
            currency: "USD".to_string(),
            instructor_id,
            is_published: status == CourseStatus::Published,
            status,
            rejection_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_student_cannot_create_course() {
        let mut repo = MockCourseRepository::new();
        repo.expect_create().times(0);
        let service = CourseService::new(Arc::new(repo));

        let result = service
            .create(
                &user(UserRole::Student),
                "Title".to_string(),
                None,
                0.0,
                "usd".to_string(),
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_create_normalizes_input() {
        let mut repo = MockCourseRepository::new();
        let author = user(UserRole::Instructor);
        let author_id = author.id;

        repo.expect_create()
            .withf(move |c| {
                c.title == "Amharic 101"
                    && c.currency == "ETB"
                    && c.description.is_none()
                    && c.instructor_id == author_id
            })
            .times(1)
            .returning(move |c| {
                let mut created = course(c.instructor_id, CourseStatus::Draft);
                created.title = c.title;
                Ok(created)
            });

        let service = CourseService::new(Arc::new(repo));
        let created = service
            .create(
                &author,
                "  Amharic 101 ".to_string(),
                Some("   ".to_string()),
                250.0,
                "etb".to_string(),
            )
            .await
            .unwrap();

        assert_eq!(created.status, CourseStatus::Draft);
    }

    #[tokio::test]
    async fn test_unpublished_course_hidden_from_others() {
        let owner = user(UserRole::Instructor);
        let draft = course(owner.id, CourseStatus::Draft);
        let id = draft.id;

        let mut repo = MockCourseRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(draft.clone())));
        let service = CourseService::new(Arc::new(repo));

        let stranger = user(UserRole::Student);
        assert!(matches!(
            service.get_visible(id, Some(&stranger)).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
        assert!(service.get_visible(id, None).await.is_err());
        assert!(service.get_visible(id, Some(&owner)).await.is_ok());
        assert!(service.get_visible(id, Some(&user(UserRole::Admin))).await.is_ok());
    }

    #[tokio::test]
    async fn test_submit_requires_owner() {
        let draft = course(Uuid::new_v4(), CourseStatus::Draft);
        let mut repo = MockCourseRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(draft.clone())));
        repo.expect_update_status().times(0);

        let service = CourseService::new(Arc::new(repo));
        let result = service
            .submit_for_review(&user(UserRole::Instructor), Uuid::new_v4())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_approve_pending_course() {
        let pending = course(Uuid::new_v4(), CourseStatus::PendingReview);
        let mut published = pending.clone();
        published.status = CourseStatus::Published;
        published.is_published = true;

        let mut repo = MockCourseRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(pending.clone())));
        repo.expect_update_status()
            .withf(|_, expected, next, reason| {
                *expected == CourseStatus::PendingReview
                    && *next == CourseStatus::Published
                    && reason.is_none()
            })
            .times(1)
            .returning(move |_, _, _, _| Ok(Some(published.clone())));

        let service = CourseService::new(Arc::new(repo));
        let course = service.approve(Uuid::new_v4()).await.unwrap();

        assert!(course.is_available());
    }

    #[tokio::test]
    async fn test_approve_draft_is_conflict() {
        let draft = course(Uuid::new_v4(), CourseStatus::Draft);
        let mut repo = MockCourseRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(draft.clone())));
        repo.expect_update_status().times(0);

        let service = CourseService::new(Arc::new(repo));

        assert!(matches!(
            service.approve(Uuid::new_v4()).await.unwrap_err(),
            AppError::Conflict { .. }
        ));
    }

    #[tokio::test]
    async fn test_concurrent_status_change_is_conflict() {
        let pending = course(Uuid::new_v4(), CourseStatus::PendingReview);
        let mut repo = MockCourseRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(pending.clone())));
        repo.expect_update_status()
            .returning(|_, _, _, _| Ok(None));

        let service = CourseService::new(Arc::new(repo));

        assert!(matches!(
            service
                .reject(Uuid::new_v4(), "Needs more content".to_string())
                .await
                .unwrap_err(),
            AppError::Conflict { .. }
        ));
    }
}
