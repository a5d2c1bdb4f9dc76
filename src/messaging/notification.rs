// User-visible messages raised when an edit or a history step is refused

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// The edit was refused; the session is unchanged
    Warning,
    /// The session could not be restored and no longer accepts edits
    Error,
}

/// Which operation raised the notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationCategory {
    /// Pushing a new edit
    Edit,
    /// Undo or redo
    History,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub category: NotificationCategory,
    pub message: String,
}

impl Notification {
    pub fn warning(category: NotificationCategory, message: String) -> Self {
        Self {
            level: NotificationLevel::Warning,
            category,
            message,
        }
    }

    pub fn error(category: NotificationCategory, message: String) -> Self {
        Self {
            level: NotificationLevel::Error,
            category,
            message,
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        };
        write!(f, "[{}] {}", level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_and_display() {
        let warning = Notification::warning(NotificationCategory::History, "Cannot undo".into());
        let error = Notification::error(NotificationCategory::Edit, "Half applied".into());

        assert_eq!(warning.level, NotificationLevel::Warning);
        assert_eq!(error.level, NotificationLevel::Error);
        assert_eq!(warning.to_string(), "[warning] Cannot undo");
        assert_eq!(error.category, NotificationCategory::Edit);
    }
}
