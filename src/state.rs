use crate::activity::{ActivityLog, demo_activity};
use crate::admin::{
    EmployeeDirectory, HabitLibrary, MoodImageCatalog, default_employees, default_images,
    default_library,
};
use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::habits::{HabitBrowser, default_habits};
use crate::journal::{Journal, demo_entries};
use crate::repository::{InsertAt, MemoryRepository};
use crate::session::SessionManager;
use crate::storage::{FileStore, KeyValueStore};
use crate::suggestions::{RandomPicker, SuggestionPicker};
use crate::workflow::MoodWorkflow;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn KeyValueStore>,
    pub credentials: Arc<CredentialStore>,
    pub session: Arc<SessionManager>,
    pub workflow: Arc<Mutex<MoodWorkflow>>,
    pub journal: Arc<Mutex<Journal>>,
    pub habits: Arc<Mutex<HabitBrowser>>,
    pub employees: Arc<Mutex<EmployeeDirectory>>,
    pub library: Arc<Mutex<HabitLibrary>>,
    pub images: Arc<Mutex<MoodImageCatalog>>,
    pub activity: Arc<Mutex<ActivityLog>>,
    notice: Arc<Mutex<Option<Notice>>>,
}

impl AppState {
    pub fn new(
        config: Config,
        credentials: Arc<CredentialStore>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self::with_picker(config, credentials, store, Box::new(RandomPicker))
    }

    pub fn with_picker(
        config: Config,
        credentials: Arc<CredentialStore>,
        store: Arc<dyn KeyValueStore>,
        picker: Box<dyn SuggestionPicker>,
    ) -> Self {
        let session = SessionManager::init(
            Arc::clone(&credentials),
            Arc::clone(&store),
            config.latency,
        );
        let workflow = MoodWorkflow::new(
            Box::new(MemoryRepository::newest_first()),
            picker,
            config.highlight,
        );
        let journal_seed = if config.demo { demo_entries() } else { Vec::new() };
        let activity_seed = if config.demo { demo_activity() } else { Vec::new() };

        Self {
            credentials,
            session: Arc::new(session),
            workflow: Arc::new(Mutex::new(workflow)),
            journal: Arc::new(Mutex::new(Journal::new(Box::new(
                MemoryRepository::with_items(journal_seed, InsertAt::Front),
            )))),
            habits: Arc::new(Mutex::new(HabitBrowser::new(Box::new(
                MemoryRepository::with_items(default_habits(), InsertAt::Back),
            )))),
            employees: Arc::new(Mutex::new(EmployeeDirectory::new(Box::new(
                MemoryRepository::with_items(default_employees(), InsertAt::Back),
            )))),
            library: Arc::new(Mutex::new(HabitLibrary::new(Box::new(
                MemoryRepository::with_items(default_library(), InsertAt::Back),
            )))),
            images: Arc::new(Mutex::new(MoodImageCatalog::new(Box::new(
                MemoryRepository::with_items(default_images(), InsertAt::Back),
            )))),
            activity: Arc::new(Mutex::new(ActivityLog::new(Box::new(
                MemoryRepository::with_items(activity_seed, InsertAt::Front),
            )))),
            notice: Arc::new(Mutex::new(None)),
            config: Arc::new(config),
            store,
        }
    }

    /// Opens the storage file, seeds credentials and restores the session.
    pub async fn bootstrap(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let store = FileStore::open(&config.data_path).await?;
        let credentials = tokio::task::spawn_blocking(CredentialStore::seeded).await??;
        Ok(Self::new(config, Arc::new(credentials), Arc::new(store)))
    }

    pub async fn notify(&self, notice: Notice) {
        *self.notice.lock().await = Some(notice);
    }

    pub async fn take_notice(&self) -> Option<Notice> {
        self.notice.lock().await.take()
    }

    /// Cancels pending session waits and the suggestion highlight.
    pub async fn teardown(&self) {
        self.session.teardown();
        self.workflow.lock().await.teardown();
    }
}
