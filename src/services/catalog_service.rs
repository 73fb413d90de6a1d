use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Course, Subject, Unit},
        dto::request::{
            CreateCourseRequest, CreateUnitRequest, SubjectRequest, UpdateCourseRequest,
            UpdateUnitRequest,
        },
    },
    repositories::{CourseRepository, ExerciseRepository, SubjectRepository, UnitRepository},
};

/// Subjects, units and courses: the read-mostly tree students browse.
pub struct CatalogService {
    subjects: Arc<dyn SubjectRepository>,
    units: Arc<dyn UnitRepository>,
    courses: Arc<dyn CourseRepository>,
    exercises: Arc<dyn ExerciseRepository>,
}

impl CatalogService {
    pub fn new(
        subjects: Arc<dyn SubjectRepository>,
        units: Arc<dyn UnitRepository>,
        courses: Arc<dyn CourseRepository>,
        exercises: Arc<dyn ExerciseRepository>,
    ) -> Self {
        Self {
            subjects,
            units,
            courses,
            exercises,
        }
    }

    pub async fn list_subjects(&self) -> AppResult<Vec<Subject>> {
        self.subjects.list_all().await
    }

    pub async fn get_subject(&self, id: &str) -> AppResult<Subject> {
        self.subjects
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Subject with id '{}' not found", id)))
    }

    pub async fn create_subject(&self, request: SubjectRequest) -> AppResult<Subject> {
        request.validate()?;

        let subject = Subject::new(
            &request.name,
            request.description.as_deref().unwrap_or_default(),
            request.order.unwrap_or(0),
        );
        self.subjects.create(subject).await
    }

    pub async fn update_subject(&self, id: &str, request: SubjectRequest) -> AppResult<Subject> {
        request.validate()?;

        let mut subject = self.get_subject(id).await?;
        subject.name = request.name;
        if let Some(description) = request.description {
            subject.description = description;
        }
        if let Some(order) = request.order {
            subject.order = order;
        }
        subject.modified_at = Some(Utc::now());

        self.subjects.update(subject).await
    }

    pub async fn delete_subject(&self, id: &str) -> AppResult<()> {
        let subject = self.get_subject(id).await?;

        let units = self.units.count_by_subject(&subject.id).await?;
        if units > 0 {
            return Err(AppError::Conflict(format!(
                "Subject '{}' still has {} unit(s)",
                subject.name, units
            )));
        }

        self.subjects.delete(&subject.id).await
    }

    pub async fn list_units(&self, subject_id: &str) -> AppResult<Vec<Unit>> {
        let subject = self.get_subject(subject_id).await?;
        self.units.list_by_subject(&subject.id).await
    }

    pub async fn get_unit(&self, id: &str) -> AppResult<Unit> {
        self.units
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Unit with id '{}' not found", id)))
    }

    pub async fn create_unit(&self, request: CreateUnitRequest) -> AppResult<Unit> {
        request.validate()?;

        let subject = self.get_subject(&request.subject_id).await?;
        let unit = Unit::new(
            &subject.id,
            &request.title,
            request.description.as_deref().unwrap_or_default(),
            request.order.unwrap_or(0),
        );
        self.units.create(unit).await
    }

    pub async fn update_unit(&self, id: &str, request: UpdateUnitRequest) -> AppResult<Unit> {
        request.validate()?;

        let mut unit = self.get_unit(id).await?;
        if let Some(title) = request.title {
            unit.title = title;
        }
        if let Some(description) = request.description {
            unit.description = description;
        }
        if let Some(order) = request.order {
            unit.order = order;
        }
        unit.modified_at = Some(Utc::now());

        self.units.update(unit).await
    }

    pub async fn delete_unit(&self, id: &str) -> AppResult<()> {
        let unit = self.get_unit(id).await?;

        let exercises = self.exercises.count_by_unit(&unit.id).await?;
        if exercises > 0 {
            return Err(AppError::Conflict(format!(
                "Unit '{}' still has {} exercise(s)",
                unit.title, exercises
            )));
        }

        self.units.delete(&unit.id).await
    }

    pub async fn list_courses(&self, unit_id: &str) -> AppResult<Vec<Course>> {
        let unit = self.get_unit(unit_id).await?;
        self.courses.list_by_unit(&unit.id).await
    }

    pub async fn get_course(&self, id: &str) -> AppResult<Course> {
        self.courses
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course with id '{}' not found", id)))
    }

    pub async fn create_course(&self, request: CreateCourseRequest) -> AppResult<Course> {
        request.validate()?;

        let unit = self.get_unit(&request.unit_id).await?;
        let course = Course::new(
            &unit.id,
            &request.title,
            request.content.as_deref().unwrap_or_default(),
            request.media_url,
            request.order.unwrap_or(0),
        );
        self.courses.create(course).await
    }

    pub async fn update_course(&self, id: &str, request: UpdateCourseRequest) -> AppResult<Course> {
        request.validate()?;

        let mut course = self.get_course(id).await?;
        if let Some(title) = request.title {
            course.title = title;
        }
        if let Some(content) = request.content {
            course.content = content;
        }
        if let Some(media_url) = request.media_url {
            course.media_url = Some(media_url);
        }
        if let Some(order) = request.order {
            course.order = order;
        }
        course.modified_at = Some(Utc::now());

        self.courses.update(course).await
    }

    pub async fn delete_course(&self, id: &str) -> AppResult<()> {
        self.courses.delete(id).await
    }
}
