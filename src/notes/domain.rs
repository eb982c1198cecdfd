use thiserror::Error;

/// The kind of interaction a note records.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NoteCategory {
    General,
    Meeting,
    Call,
    Task,
    Reminder,
    FollowUp,
}

impl NoteCategory {
    /// Parse from the wire/storage representation, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "general" => Some(Self::General),
            "meeting" => Some(Self::Meeting),
            "call" => Some(Self::Call),
            "task" => Some(Self::Task),
            "reminder" => Some(Self::Reminder),
            "follow_up" => Some(Self::FollowUp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "GENERAL",
            Self::Meeting => "MEETING",
            Self::Call => "CALL",
            Self::Task => "TASK",
            Self::Reminder => "REMINDER",
            Self::FollowUp => "FOLLOW_UP",
        }
    }
}

pub const MAX_TITLE_LENGTH: usize = 500;

#[derive(Debug, Error, PartialEq)]
pub enum NewNoteError {
    #[error("A note title is required")]
    MissingTitle,
    #[error("A note title is limited to {MAX_TITLE_LENGTH} characters")]
    TitleTooLong,
    #[error("Note content is required")]
    MissingContent,
    #[error("Unrecognized note category: {0}")]
    UnknownCategory(String),
}

/// Raw field values for a note, before validation.
#[derive(Clone, Debug, Default)]
pub struct NewNoteData {
    pub client_id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub pinned: bool,
    pub created_by: Option<String>,
}

/// A note entered by a caller. May only be constructed through
/// [`Self::new()`], which rejects structurally invalid records.
#[derive(Clone, Debug)]
pub struct NewNote {
    data: NewNoteData,
    category: NoteCategory,
}

impl NewNote {
    pub fn new(data: NewNoteData) -> Result<Self, NewNoteError> {
        if data.title.trim().is_empty() {
            return Err(NewNoteError::MissingTitle);
        }

        if data.title.chars().count() > MAX_TITLE_LENGTH {
            return Err(NewNoteError::TitleTooLong);
        }

        if data.content.trim().is_empty() {
            return Err(NewNoteError::MissingContent);
        }

        let category = NoteCategory::parse(&data.category)
            .ok_or_else(|| NewNoteError::UnknownCategory(data.category.clone()))?;

        Ok(Self { data, category })
    }

    pub fn client_id(&self) -> i64 {
        self.data.client_id
    }

    pub fn title(&self) -> &str {
        &self.data.title
    }

    pub fn content(&self) -> &str {
        &self.data.content
    }

    pub fn category(&self) -> NoteCategory {
        self.category
    }

    pub fn pinned(&self) -> bool {
        self.data.pinned
    }

    pub fn created_by(&self) -> Option<&str> {
        self.data.created_by.as_deref()
    }
}
