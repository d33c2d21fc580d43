//! Admin-side collections: employees, the curated habit library and the
//! mood-image catalog.

use crate::errors::EntryError;
use crate::models::{
    DashboardResponse, Employee, EmployeeRequest, LibraryHabit, LibraryHabitRequest, Mood,
    MoodImage, MoodImageRequest, MoodLogEntry, ProfileUpdateRequest, Role, looks_like_email,
    parse_mood_tags,
};
use crate::repository::Repository;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

const MIN_NAME_LEN: usize = 2;
const MIN_PASSWORD_LEN: usize = 6;
const MIN_TITLE_LEN: usize = 3;
const MIN_DESCRIPTION_LEN: usize = 10;
const RECENT_MOODS: usize = 5;

fn invalid(message: impl Into<String>) -> EntryError {
    EntryError::Invalid(message.into())
}

/// Checks an employee form. A password is required when `creating`.
pub fn validate_employee(request: &EmployeeRequest, creating: bool) -> Result<(), EntryError> {
    if request.name.trim().chars().count() < MIN_NAME_LEN {
        return Err(invalid("Name must be at least 2 characters"));
    }
    if !looks_like_email(request.email.trim()) {
        return Err(invalid("Please enter a valid email"));
    }
    match request.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) if password.chars().count() < MIN_PASSWORD_LEN => {
            Err(invalid("Password must be at least 6 characters"))
        }
        None if creating => Err(invalid("Password is required")),
        _ => Ok(()),
    }
}

pub struct EmployeeDirectory {
    employees: Box<dyn Repository<Employee>>,
}

impl EmployeeDirectory {
    pub fn new(employees: Box<dyn Repository<Employee>>) -> Self {
        Self { employees }
    }

    pub fn list(&self) -> Vec<Employee> {
        self.employees.list()
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Adds a validated employee. `password_hash` is the already hashed secret.
    pub fn add(
        &mut self,
        request: &EmployeeRequest,
        password_hash: Option<String>,
    ) -> Result<Employee, EntryError> {
        validate_employee(request, true)?;
        let email = request.email.trim();
        self.ensure_unique_email(email, None)?;

        let employee = Employee {
            id: Uuid::new_v4().to_string(),
            name: request.name.trim().to_string(),
            email: email.to_string(),
            role: request.role,
            password_hash,
        };
        self.employees.add(employee.clone());
        info!(employee_id = %employee.id, role = %employee.role, "employee added");
        Ok(employee)
    }

    /// Updates name, email and role; the password is replaced only when given.
    pub fn update(
        &mut self,
        id: &str,
        request: &EmployeeRequest,
        password_hash: Option<String>,
    ) -> Result<Employee, EntryError> {
        validate_employee(request, false)?;
        let mut employee = self
            .employees
            .get(id)
            .ok_or_else(|| EntryError::NotFound(id.to_string()))?;
        let email = request.email.trim();
        self.ensure_unique_email(email, Some(id))?;

        employee.name = request.name.trim().to_string();
        employee.email = email.to_string();
        employee.role = request.role;
        if password_hash.is_some() {
            employee.password_hash = password_hash;
        }
        self.employees.update(employee.clone())?;
        info!(employee_id = %employee.id, "employee updated");
        Ok(employee)
    }

    pub fn remove(&mut self, id: &str) -> Result<Employee, EntryError> {
        let removed = self.employees.remove(id)?;
        info!(employee_id = %removed.id, "employee removed");
        Ok(removed)
    }

    fn ensure_unique_email(&self, email: &str, except: Option<&str>) -> Result<(), EntryError> {
        let taken = self
            .employees
            .list()
            .iter()
            .any(|employee| employee.email == email && Some(employee.id.as_str()) != except);
        if taken {
            return Err(EntryError::Duplicate(email.to_string()));
        }
        Ok(())
    }
}

pub struct HabitLibrary {
    habits: Box<dyn Repository<LibraryHabit>>,
}

impl HabitLibrary {
    pub fn new(habits: Box<dyn Repository<LibraryHabit>>) -> Self {
        Self { habits }
    }

    pub fn list(&self, mood: Option<Mood>) -> Vec<LibraryHabit> {
        self.habits
            .list()
            .into_iter()
            .filter(|habit| mood.is_none_or(|mood| habit.mood == mood))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn add(&mut self, request: &LibraryHabitRequest) -> Result<LibraryHabit, EntryError> {
        let (title, description, mood) = validate_library_habit(request)?;
        let habit = LibraryHabit {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            mood,
        };
        self.habits.add(habit.clone());
        info!(habit_id = %habit.id, %mood, "library habit added");
        Ok(habit)
    }

    pub fn update(
        &mut self,
        id: &str,
        request: &LibraryHabitRequest,
    ) -> Result<LibraryHabit, EntryError> {
        let (title, description, mood) = validate_library_habit(request)?;
        if self.habits.get(id).is_none() {
            return Err(EntryError::NotFound(id.to_string()));
        }
        let habit = LibraryHabit {
            id: id.to_string(),
            title,
            description,
            mood,
        };
        self.habits.update(habit.clone())?;
        Ok(habit)
    }

    pub fn remove(&mut self, id: &str) -> Result<LibraryHabit, EntryError> {
        self.habits.remove(id)
    }
}

fn validate_library_habit(
    request: &LibraryHabitRequest,
) -> Result<(String, String, Mood), EntryError> {
    let title = request.title.trim();
    let description = request.description.trim();
    if title.chars().count() < MIN_TITLE_LEN {
        return Err(invalid("Title must be at least 3 characters"));
    }
    if description.chars().count() < MIN_DESCRIPTION_LEN {
        return Err(invalid("Description must be at least 10 characters"));
    }
    let mood = request.mood.parse::<Mood>()?;
    Ok((title.to_string(), description.to_string(), mood))
}

pub struct MoodImageCatalog {
    images: Box<dyn Repository<MoodImage>>,
}

impl MoodImageCatalog {
    pub fn new(images: Box<dyn Repository<MoodImage>>) -> Self {
        Self { images }
    }

    pub fn list(&self, mood: Option<Mood>) -> Vec<MoodImage> {
        self.images
            .list()
            .into_iter()
            .filter(|image| mood.is_none_or(|mood| image.tags.contains(&mood)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn add(&mut self, request: &MoodImageRequest) -> Result<MoodImage, EntryError> {
        let (path, tags) = validate_image(request)?;
        let image = MoodImage {
            id: Uuid::new_v4().to_string(),
            path,
            tags,
            caption: request.caption.as_deref().unwrap_or_default().trim().to_string(),
            created_at: Utc::now(),
        };
        self.images.add(image.clone());
        info!(image_id = %image.id, path = %image.path, "mood image added");
        Ok(image)
    }

    pub fn update(&mut self, id: &str, request: &MoodImageRequest) -> Result<MoodImage, EntryError> {
        let (path, tags) = validate_image(request)?;
        let mut image = self
            .images
            .get(id)
            .ok_or_else(|| EntryError::NotFound(id.to_string()))?;
        image.path = path;
        image.tags = tags;
        image.caption = request.caption.as_deref().unwrap_or_default().trim().to_string();
        self.images.update(image.clone())?;
        Ok(image)
    }

    pub fn remove(&mut self, id: &str) -> Result<MoodImage, EntryError> {
        self.images.remove(id)
    }
}

fn validate_image(request: &MoodImageRequest) -> Result<(String, Vec<Mood>), EntryError> {
    let path = request
        .path
        .as_deref()
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .ok_or_else(|| invalid("Please select an image to upload"))?;
    let tags = parse_mood_tags(&request.tags)?;
    if tags.is_empty() {
        return Err(invalid("Please add at least one mood tag"));
    }
    Ok((path.to_string(), tags))
}

/// A requested secret change, checked against the current secret by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    pub current: String,
    pub new: String,
}

/// Checks a profile edit. Password fields are all-or-nothing.
pub fn validate_profile(
    request: &ProfileUpdateRequest,
) -> Result<Option<PasswordChange>, EntryError> {
    if request.name.trim().chars().count() < MIN_NAME_LEN {
        return Err(invalid("Name must be at least 2 characters"));
    }
    if !looks_like_email(request.email.trim()) {
        return Err(invalid("Please enter a valid email"));
    }

    let filled = |field: &Option<String>| field.clone().filter(|value| !value.is_empty());
    let fields = (
        filled(&request.current_password),
        filled(&request.new_password),
        filled(&request.confirm_password),
    );
    match fields {
        (None, None, None) => Ok(None),
        (Some(current), Some(new), Some(confirm)) => {
            if new != confirm {
                return Err(invalid("Passwords do not match"));
            }
            if new.chars().count() < MIN_PASSWORD_LEN {
                return Err(invalid("Password must be at least 6 characters"));
            }
            Ok(Some(PasswordChange { current, new }))
        }
        _ => Err(invalid(
            "All password fields must be filled to change password",
        )),
    }
}

pub fn dashboard(
    employees: &EmployeeDirectory,
    mood_log: &[MoodLogEntry],
    library: &HabitLibrary,
    images: &MoodImageCatalog,
) -> DashboardResponse {
    DashboardResponse {
        total_employees: employees.len(),
        mood_entries: mood_log.len(),
        library_habits: library.len(),
        mood_images: images.len(),
        recent_moods: mood_log.iter().take(RECENT_MOODS).cloned().collect(),
    }
}

pub fn default_employees() -> Vec<Employee> {
    [
        ("1", "Admin User", "admin@micromood.com", Role::Admin),
        ("2", "Regular User", "user@micromood.com", Role::User),
        ("3", "Support Staff", "support@micromood.com", Role::Admin),
    ]
    .into_iter()
    .map(|(id, name, email, role)| Employee {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        password_hash: None,
    })
    .collect()
}

pub fn default_library() -> Vec<LibraryHabit> {
    [
        ("1", "Deep Breathing", "Take 5 deep breaths, holding for 4 counts", Mood::Anxious),
        ("2", "Gratitude Journaling", "Write down 3 things you are grateful for", Mood::Sad),
        ("3", "Quick Walk", "Take a 10-minute walk outside", Mood::Calm),
    ]
    .into_iter()
    .map(|(id, title, description, mood)| LibraryHabit {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        mood,
    })
    .collect()
}

pub fn default_images() -> Vec<MoodImage> {
    [
        ("1", "/mood-images/calm-lake.jpg", &[Mood::Sad][..], "Peace is closer than you think", "2025-04-12T08:00:00Z"),
        ("2", "/mood-images/sunflowers.jpg", &[Mood::Happy][..], "Let the light in", "2025-04-12T09:30:00Z"),
        ("3", "/mood-images/cozy-cabin.jpg", &[Mood::Anxious][..], "You are safe here", "2025-04-12T10:15:00Z"),
        ("4", "/mood-images/mountain-view.jpg", &[Mood::Energetic][..], "New heights await you", "2025-04-12T11:45:00Z"),
        ("5", "/mood-images/forest-path.jpg", &[Mood::Calm][..], "The journey is just as important as the destination", "2025-04-12T13:30:00Z"),
    ]
    .into_iter()
    .map(|(id, path, tags, caption, created_at)| MoodImage {
        id: id.to_string(),
        path: path.to_string(),
        tags: tags.to_vec(),
        caption: caption.to_string(),
        created_at: DateTime::parse_from_rfc3339(created_at)
            .map(|date| date.with_timezone(&Utc))
            .unwrap_or_default(),
    })
    .collect()
}
