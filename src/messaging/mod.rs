// Session → view messaging over ring buffers

pub mod channels;
pub mod event;
pub mod notification;

pub use channels::{
    NotificationConsumer, NotificationProducer, ViewEventConsumer, ViewEventProducer,
    create_notification_channel, create_view_event_channel,
};
pub use event::ViewEvent;
pub use notification::{Notification, NotificationCategory, NotificationLevel};
