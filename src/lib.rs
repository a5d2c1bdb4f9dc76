// Timeline Undo - Library exports for the demo, tests and benchmarks

pub mod command;
pub mod config;
pub mod messaging;
pub mod session;

// Re-export commonly used types for convenience
pub use command::{CommandError, CommandManager, TimelineCommand, UndoableCommand};
pub use config::{ConfigError, HistoryConfig};
pub use messaging::channels::{create_notification_channel, create_view_event_channel};
pub use messaging::{Notification, ViewEvent};
pub use session::persistence::{PersistenceError, load_session, save_session};
pub use session::{
    EditSession, EffectParams, ItemId, ItemInfo, Position, SessionError, SessionMutator,
    SharedSession,
};
