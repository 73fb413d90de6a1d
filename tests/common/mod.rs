#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;

use learnpath_server::{
    app_state::AppState,
    auth::hash_password,
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{
        AnswerRecord, Course, ErrorBookEntry, Exercise, ExerciseType, RefreshToken, StudyTask,
        Subject, TaskStatus, Unit, UnitProgress, User, UserRole,
    },
    repositories::{
        AnswerRecordRepository, CourseRepository, ErrorBookRepository, ExerciseRepository,
        RefreshTokenRepository, Repositories, StudyTaskRepository, SubjectRepository,
        UnitProgressRepository, UnitRepository, UserRepository,
    },
};

type Store<T> = Arc<RwLock<HashMap<String, T>>>;

fn store<T>() -> Store<T> {
    Arc::new(RwLock::new(HashMap::new()))
}

fn page<T: Clone>(items: Vec<T>, offset: i64, limit: i64) -> (Vec<T>, i64) {
    let total = items.len() as i64;
    let page = items
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect();
    (page, total)
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Store<User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self { users: store() }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(AppError::AlreadyExists(format!(
                "User with username '{}' already exists",
                user.username
            )));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn list_by_role(
        &self,
        role: UserRole,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<User>, i64)> {
        let users = self.users.read().await;
        let mut items: Vec<User> = users.values().filter(|u| u.role == role).cloned().collect();
        items.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(page(items, offset, limit))
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        match users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(user)
            }
            None => Err(AppError::NotFound(format!("User '{}' not found", user.id))),
        }
    }

    async fn add_points(&self, id: &str, points: i64) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", id)))?;
        user.points += points;
        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        match self.users.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("User '{}' not found", id))),
        }
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryRefreshTokenRepository {
    tokens: Store<RefreshToken>,
}

impl InMemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self { tokens: store() }
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn create(&self, token: RefreshToken) -> AppResult<RefreshToken> {
        self.tokens
            .write()
            .await
            .insert(token.token_hash.clone(), token.clone());
        Ok(token)
    }

    async fn find_by_token_hash(&self, hash: &str) -> AppResult<Option<RefreshToken>> {
        Ok(self.tokens.read().await.get(hash).cloned())
    }

    async fn revoke_by_token_hash(&self, hash: &str) -> AppResult<()> {
        let mut tokens = self.tokens.write().await;
        let token = tokens
            .get_mut(hash)
            .ok_or_else(|| AppError::NotFound("Refresh token not found".to_string()))?;
        token.revoke();
        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: &str) -> AppResult<u64> {
        let mut tokens = self.tokens.write().await;
        let mut revoked = 0;
        for token in tokens
            .values_mut()
            .filter(|t| t.user_id == user_id && !t.revoked)
        {
            token.revoke();
            revoked += 1;
        }
        Ok(revoked)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySubjectRepository {
    subjects: Store<Subject>,
}

#[async_trait]
impl SubjectRepository for InMemorySubjectRepository {
    async fn create(&self, subject: Subject) -> AppResult<Subject> {
        self.subjects
            .write()
            .await
            .insert(subject.id.clone(), subject.clone());
        Ok(subject)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Subject>> {
        Ok(self.subjects.read().await.get(id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<Subject>> {
        let mut items: Vec<Subject> = self.subjects.read().await.values().cloned().collect();
        items.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        Ok(items)
    }

    async fn update(&self, subject: Subject) -> AppResult<Subject> {
        let mut subjects = self.subjects.write().await;
        if !subjects.contains_key(&subject.id) {
            return Err(AppError::NotFound(format!("Subject '{}' not found", subject.id)));
        }
        subjects.insert(subject.id.clone(), subject.clone());
        Ok(subject)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        match self.subjects.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("Subject '{}' not found", id))),
        }
    }
}

#[derive(Default)]
pub struct InMemoryUnitRepository {
    units: Store<Unit>,
}

#[async_trait]
impl UnitRepository for InMemoryUnitRepository {
    async fn create(&self, unit: Unit) -> AppResult<Unit> {
        self.units.write().await.insert(unit.id.clone(), unit.clone());
        Ok(unit)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Unit>> {
        Ok(self.units.read().await.get(id).cloned())
    }

    async fn list_by_subject(&self, subject_id: &str) -> AppResult<Vec<Unit>> {
        let mut items: Vec<Unit> = self
            .units
            .read()
            .await
            .values()
            .filter(|u| u.subject_id == subject_id)
            .cloned()
            .collect();
        items.sort_by_key(|u| u.order);
        Ok(items)
    }

    async fn count_by_subject(&self, subject_id: &str) -> AppResult<u64> {
        let units = self.units.read().await;
        Ok(units.values().filter(|u| u.subject_id == subject_id).count() as u64)
    }

    async fn update(&self, unit: Unit) -> AppResult<Unit> {
        let mut units = self.units.write().await;
        if !units.contains_key(&unit.id) {
            return Err(AppError::NotFound(format!("Unit '{}' not found", unit.id)));
        }
        units.insert(unit.id.clone(), unit.clone());
        Ok(unit)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        match self.units.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("Unit '{}' not found", id))),
        }
    }
}

#[derive(Default)]
pub struct InMemoryCourseRepository {
    courses: Store<Course>,
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn create(&self, course: Course) -> AppResult<Course> {
        self.courses
            .write()
            .await
            .insert(course.id.clone(), course.clone());
        Ok(course)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Course>> {
        Ok(self.courses.read().await.get(id).cloned())
    }

    async fn list_by_unit(&self, unit_id: &str) -> AppResult<Vec<Course>> {
        let mut items: Vec<Course> = self
            .courses
            .read()
            .await
            .values()
            .filter(|c| c.unit_id == unit_id)
            .cloned()
            .collect();
        items.sort_by_key(|c| c.order);
        Ok(items)
    }

    async fn update(&self, course: Course) -> AppResult<Course> {
        let mut courses = self.courses.write().await;
        if !courses.contains_key(&course.id) {
            return Err(AppError::NotFound(format!("Course '{}' not found", course.id)));
        }
        courses.insert(course.id.clone(), course.clone());
        Ok(course)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        match self.courses.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("Course '{}' not found", id))),
        }
    }
}

#[derive(Default)]
pub struct InMemoryExerciseRepository {
    exercises: Store<Exercise>,
}

#[async_trait]
impl ExerciseRepository for InMemoryExerciseRepository {
    async fn create(&self, exercise: Exercise) -> AppResult<Exercise> {
        self.exercises
            .write()
            .await
            .insert(exercise.id.clone(), exercise.clone());
        Ok(exercise)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Exercise>> {
        Ok(self.exercises.read().await.get(id).cloned())
    }

    async fn list_by_unit(&self, unit_id: &str) -> AppResult<Vec<Exercise>> {
        let mut items: Vec<Exercise> = self
            .exercises
            .read()
            .await
            .values()
            .filter(|e| e.unit_id == unit_id)
            .cloned()
            .collect();
        items.sort_by_key(|e| e.order);
        Ok(items)
    }

    async fn count_by_unit(&self, unit_id: &str) -> AppResult<u64> {
        let exercises = self.exercises.read().await;
        Ok(exercises.values().filter(|e| e.unit_id == unit_id).count() as u64)
    }

    async fn update(&self, exercise: Exercise) -> AppResult<Exercise> {
        let mut exercises = self.exercises.write().await;
        if !exercises.contains_key(&exercise.id) {
            return Err(AppError::NotFound(format!("Exercise '{}' not found", exercise.id)));
        }
        exercises.insert(exercise.id.clone(), exercise.clone());
        Ok(exercise)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        match self.exercises.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("Exercise '{}' not found", id))),
        }
    }
}

/// Append-only, kept in insertion order.
#[derive(Default)]
pub struct InMemoryAnswerRecordRepository {
    records: Arc<RwLock<Vec<AnswerRecord>>>,
}

impl InMemoryAnswerRecordRepository {
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl AnswerRecordRepository for InMemoryAnswerRecordRepository {
    async fn create(&self, record: AnswerRecord) -> AppResult<AnswerRecord> {
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn count_for_exercise(&self, student_id: &str, exercise_id: &str) -> AppResult<u64> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.student_id == student_id && r.exercise_id == exercise_id)
            .count() as u64)
    }

    async fn has_correct(&self, student_id: &str, exercise_id: &str) -> AppResult<bool> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .any(|r| r.student_id == student_id && r.exercise_id == exercise_id && r.is_correct))
    }

    async fn exists_for_exercise(&self, exercise_id: &str) -> AppResult<bool> {
        let records = self.records.read().await;
        Ok(records.iter().any(|r| r.exercise_id == exercise_id))
    }

    async fn list_by_student_and_unit(
        &self,
        student_id: &str,
        unit_id: &str,
    ) -> AppResult<Vec<AnswerRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.student_id == student_id && r.unit_id == unit_id)
            .cloned()
            .collect())
    }

    async fn list_by_student(
        &self,
        student_id: &str,
        unit_id: Option<String>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<AnswerRecord>, i64)> {
        let records = self.records.read().await;
        let items: Vec<AnswerRecord> = records
            .iter()
            .rev()
            .filter(|r| r.student_id == student_id)
            .filter(|r| unit_id.as_deref().map_or(true, |unit| r.unit_id == unit))
            .cloned()
            .collect();
        Ok(page(items, offset, limit))
    }
}

#[derive(Default)]
pub struct InMemoryUnitProgressRepository {
    progress: Store<UnitProgress>,
}

fn progress_key(student_id: &str, unit_id: &str) -> String {
    format!("{}:{}", student_id, unit_id)
}

#[async_trait]
impl UnitProgressRepository for InMemoryUnitProgressRepository {
    async fn find(&self, student_id: &str, unit_id: &str) -> AppResult<Option<UnitProgress>> {
        let progress = self.progress.read().await;
        Ok(progress.get(&progress_key(student_id, unit_id)).cloned())
    }

    async fn list_by_student(&self, student_id: &str) -> AppResult<Vec<UnitProgress>> {
        let mut items: Vec<UnitProgress> = self
            .progress
            .read()
            .await
            .values()
            .filter(|p| p.student_id == student_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.last_activity_at.cmp(&a.last_activity_at));
        Ok(items)
    }

    async fn upsert(&self, progress: UnitProgress) -> AppResult<UnitProgress> {
        self.progress.write().await.insert(
            progress_key(&progress.student_id, &progress.unit_id),
            progress.clone(),
        );
        Ok(progress)
    }
}

#[derive(Default)]
pub struct InMemoryErrorBookRepository {
    entries: Store<ErrorBookEntry>,
}

#[async_trait]
impl ErrorBookRepository for InMemoryErrorBookRepository {
    async fn record_miss(
        &self,
        student_id: &str,
        exercise_id: &str,
        unit_id: &str,
        answer: &Value,
    ) -> AppResult<ErrorBookEntry> {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let entry = entries
            .entry(progress_key(student_id, exercise_id))
            .or_insert_with(|| ErrorBookEntry {
                id: uuid::Uuid::new_v4().to_string(),
                student_id: student_id.to_string(),
                exercise_id: exercise_id.to_string(),
                unit_id: unit_id.to_string(),
                wrong_count: 0,
                last_answer: Value::Null,
                mastered: false,
                first_wrong_at: now,
                last_wrong_at: now,
                mastered_at: None,
            });
        entry.wrong_count += 1;
        entry.last_answer = answer.clone();
        entry.last_wrong_at = now;
        entry.mastered = false;
        entry.mastered_at = None;
        Ok(entry.clone())
    }

    async fn find(&self, student_id: &str, exercise_id: &str) -> AppResult<Option<ErrorBookEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.get(&progress_key(student_id, exercise_id)).cloned())
    }

    async fn list_by_student(
        &self,
        student_id: &str,
        include_mastered: bool,
    ) -> AppResult<Vec<ErrorBookEntry>> {
        let mut items: Vec<ErrorBookEntry> = self
            .entries
            .read()
            .await
            .values()
            .filter(|e| e.student_id == student_id && (include_mastered || !e.mastered))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.last_wrong_at.cmp(&a.last_wrong_at));
        Ok(items)
    }

    async fn mark_mastered(&self, student_id: &str, exercise_id: &str) -> AppResult<ErrorBookEntry> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(&progress_key(student_id, exercise_id))
            .ok_or_else(|| {
                AppError::NotFound(format!("No error book entry for exercise '{}'", exercise_id))
            })?;
        entry.mastered = true;
        entry.mastered_at = Some(Utc::now());
        Ok(entry.clone())
    }

    async fn delete(&self, student_id: &str, exercise_id: &str) -> AppResult<()> {
        match self
            .entries
            .write()
            .await
            .remove(&progress_key(student_id, exercise_id))
        {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!(
                "No error book entry for exercise '{}'",
                exercise_id
            ))),
        }
    }
}

#[derive(Default)]
pub struct InMemoryStudyTaskRepository {
    tasks: Store<StudyTask>,
}

#[async_trait]
impl StudyTaskRepository for InMemoryStudyTaskRepository {
    async fn create(&self, task: StudyTask) -> AppResult<StudyTask> {
        self.tasks.write().await.insert(task.id.clone(), task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<StudyTask>> {
        Ok(self.tasks.read().await.get(id).cloned())
    }

    async fn list(
        &self,
        student_id: Option<String>,
        status: Option<TaskStatus>,
    ) -> AppResult<Vec<StudyTask>> {
        let mut items: Vec<StudyTask> = self
            .tasks
            .read()
            .await
            .values()
            .filter(|t| student_id.as_deref().map_or(true, |s| t.student_id == s))
            .filter(|t| status.map_or(true, |s| t.status == s))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn update(&self, task: StudyTask) -> AppResult<StudyTask> {
        let mut tasks = self.tasks.write().await;
        if !tasks.contains_key(&task.id) {
            return Err(AppError::NotFound(format!("Task '{}' not found", task.id)));
        }
        tasks.insert(task.id.clone(), task.clone());
        Ok(task)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        match self.tasks.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("Task '{}' not found", id))),
        }
    }

    async fn close_open_for_unit(&self, student_id: &str, unit_id: &str) -> AppResult<u64> {
        let mut tasks = self.tasks.write().await;
        let now = Utc::now();
        let mut closed = 0;
        for task in tasks.values_mut().filter(|t| {
            t.student_id == student_id && t.unit_id == unit_id && t.status == TaskStatus::Open
        }) {
            task.status = TaskStatus::Done;
            task.completed_at = Some(now);
            closed += 1;
        }
        Ok(closed)
    }
}

/// Concrete handles alongside the trait objects, so tests can inspect storage directly.
pub struct TestBackend {
    pub users: Arc<InMemoryUserRepository>,
    pub answer_records: Arc<InMemoryAnswerRecordRepository>,
    pub error_book: Arc<InMemoryErrorBookRepository>,
    pub tasks: Arc<InMemoryStudyTaskRepository>,
    pub repositories: Repositories,
}

pub fn in_memory_backend() -> TestBackend {
    let users = Arc::new(InMemoryUserRepository::new());
    let answer_records = Arc::new(InMemoryAnswerRecordRepository::default());
    let error_book = Arc::new(InMemoryErrorBookRepository::default());
    let tasks = Arc::new(InMemoryStudyTaskRepository::default());

    let repositories = Repositories {
        users: users.clone(),
        refresh_tokens: Arc::new(InMemoryRefreshTokenRepository::new()),
        subjects: Arc::new(InMemorySubjectRepository::default()),
        units: Arc::new(InMemoryUnitRepository::default()),
        courses: Arc::new(InMemoryCourseRepository::default()),
        exercises: Arc::new(InMemoryExerciseRepository::default()),
        answer_records: answer_records.clone(),
        progress: Arc::new(InMemoryUnitProgressRepository::default()),
        error_book: error_book.clone(),
        tasks: tasks.clone(),
    };

    TestBackend {
        users,
        answer_records,
        error_book,
        tasks,
        repositories,
    }
}

pub fn test_config(upload_dir: &std::path::Path) -> Config {
    let mut config = Config::test_config();
    config.upload_dir = upload_dir.to_string_lossy().into_owned();
    config
}

pub fn test_state(backend: &TestBackend, upload_dir: &std::path::Path) -> AppState {
    AppState::with_repositories(test_config(upload_dir), backend.repositories.clone(), None)
}

pub async fn seed_user(backend: &TestBackend, username: &str, role: UserRole) -> User {
    let hash = hash_password("correct-horse").expect("hashing should succeed");
    backend
        .repositories
        .users
        .create(User::new(username, username, hash, role))
        .await
        .expect("seeding a user should succeed")
}

pub struct SeededUnit {
    pub subject: Subject,
    pub unit: Unit,
    pub course: Course,
}

pub async fn seed_unit(backend: &TestBackend) -> SeededUnit {
    let repos = &backend.repositories;
    let subject = repos
        .subjects
        .create(Subject::new("Math", "Grade 3 math", 1))
        .await
        .unwrap();
    let unit = repos
        .units
        .create(Unit::new(&subject.id, "Addition", "Adding small numbers", 1))
        .await
        .unwrap();
    let course = repos
        .courses
        .create(Course::new(&unit.id, "Counting on", "Start from the larger number", None, 1))
        .await
        .unwrap();

    SeededUnit {
        subject,
        unit,
        course,
    }
}

pub async fn seed_exercise(
    backend: &TestBackend,
    unit_id: &str,
    exercise_type: ExerciseType,
    correct_answer: Value,
) -> Exercise {
    backend
        .repositories
        .exercises
        .create(Exercise::new(unit_id, exercise_type, "prompt", correct_answer))
        .await
        .unwrap()
}
