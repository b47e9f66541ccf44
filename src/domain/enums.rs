use serde::{Deserialize, Serialize};

/// Completion state of a task as the server encodes it (0 = open, 1 = done)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskStatus {
    #[default]
    Open,
    Done,
}

impl TaskStatus {
    /// Parse status from the wire code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Open),
            1 => Some(Self::Done),
            _ => None,
        }
    }

    /// Convert status to the wire code
    pub fn code(&self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Done => 1,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl TryFrom<u8> for TaskStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown task status code {}", code))
    }
}

impl From<TaskStatus> for u8 {
    fn from(status: TaskStatus) -> u8 {
        status.code()
    }
}

/// Which projection of the task snapshot the list pane shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Tab {
    Inbox,
    Upcoming,
    Completed,
}

impl Tab {
    /// Short name used in the sidebar
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Inbox => "Inbox",
            Tab::Upcoming => "Upcoming",
            Tab::Completed => "Done",
        }
    }

    /// Heading shown above the task list
    pub fn page_title(&self) -> &'static str {
        match self {
            Tab::Inbox => "Capture",
            Tab::Upcoming => "Horizon",
            Tab::Completed => "Archive",
        }
    }

    /// Cycle to the next tab (wraps around)
    pub fn next(&self) -> Tab {
        match self {
            Tab::Inbox => Tab::Upcoming,
            Tab::Upcoming => Tab::Completed,
            Tab::Completed => Tab::Inbox,
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    QuickAdd,
    CommandBar,
    EditingTimer,
    Assistant,
}
