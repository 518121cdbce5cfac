//! Dashboard contents and the navigation drawer.

use crate::navigation::Route;
use mentor_core::preference::{PreferenceStore, USER_PREFS_NAMESPACE, USERNAME_KEY};
use mentor_core::subject::Subject;

pub const EMPTY_SUBJECTS_MESSAGE: &str =
    "You don't have any subjects/Courses. Press '+' icon to create one.";

/// Entries of the side drawer, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerItem {
    Home,
    AiTutor,
    FutureCounsellor,
    ExamPaper,
    Logout,
}

impl DrawerItem {
    pub const ALL: [DrawerItem; 5] = [
        DrawerItem::Home,
        DrawerItem::AiTutor,
        DrawerItem::FutureCounsellor,
        DrawerItem::ExamPaper,
        DrawerItem::Logout,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DrawerItem::Home => "Home",
            DrawerItem::AiTutor => "AI tutor",
            DrawerItem::FutureCounsellor => "Future Counsellor",
            DrawerItem::ExamPaper => "Exam practice paper generation",
            DrawerItem::Logout => "Logout",
        }
    }

    /// Screen the item opens. Logout also forgets the remembered user.
    pub fn route(&self) -> Route {
        match self {
            DrawerItem::Home => Route::Dashboard,
            DrawerItem::AiTutor => Route::TutorChat,
            DrawerItem::FutureCounsellor => Route::CounsellorChat,
            DrawerItem::ExamPaper => Route::ExamGeneration,
            DrawerItem::Logout => Route::Login,
        }
    }
}

/// Fields of the "Add New Subject" dialog.
///
/// The dialog has no save action; a draft is collected and discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectDraft {
    pub subject_name: String,
    /// One of [`crate::countries::COUNTRIES`], or empty.
    pub country: String,
    pub topic_name: String,
    pub class_name: String,
}

impl SubjectDraft {
    pub fn is_blank(&self) -> bool {
        [&self.subject_name, &self.country, &self.topic_name, &self.class_name]
            .iter()
            .all(|field| field.trim().is_empty())
    }
}

/// What the dashboard renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub username: Option<String>,
    pub subjects: Vec<Subject>,
}

impl DashboardView {
    /// Reads the remembered username. Subjects are never persisted, so the
    /// list is always empty.
    pub fn load(preferences: &dyn PreferenceStore) -> Self {
        Self {
            username: preferences
                .get(USER_PREFS_NAMESPACE, USERNAME_KEY)
                .filter(|name| !name.is_empty()),
            subjects: Vec::new(),
        }
    }

    pub fn greeting(&self) -> String {
        match &self.username {
            Some(name) => format!("Welcome back, {}!", name),
            None => "Welcome back!".to_string(),
        }
    }

    /// Placeholder shown instead of the card grid.
    pub fn empty_message(&self) -> Option<&'static str> {
        self.subjects.is_empty().then_some(EMPTY_SUBJECTS_MESSAGE)
    }

    pub fn drawer(&self) -> &'static [DrawerItem] {
        &DrawerItem::ALL
    }
}
