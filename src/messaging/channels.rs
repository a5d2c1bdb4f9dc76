// Lock-free channels from the session to the view

use crate::messaging::event::ViewEvent;
use crate::messaging::notification::Notification;
use ringbuf::{HeapRb, traits::Split};

pub type ViewEventProducer = ringbuf::HeapProd<ViewEvent>;
pub type ViewEventConsumer = ringbuf::HeapCons<ViewEvent>;

pub fn create_view_event_channel(capacity: usize) -> (ViewEventProducer, ViewEventConsumer) {
    let rb = HeapRb::<ViewEvent>::new(capacity);
    rb.split()
}

pub type NotificationProducer = ringbuf::HeapProd<Notification>;
pub type NotificationConsumer = ringbuf::HeapCons<Notification>;

pub fn create_notification_channel(
    capacity: usize,
) -> (NotificationProducer, NotificationConsumer) {
    let rb = HeapRb::<Notification>::new(capacity);
    rb.split()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringbuf::traits::{Consumer, Producer};

    #[test]
    fn test_view_event_channel_drops_when_full() {
        let (mut tx, mut rx) = create_view_event_channel(2);

        assert!(tx.try_push(ViewEvent::MonitorRefresh).is_ok());
        assert!(tx.try_push(ViewEvent::GroupsChanged).is_ok());
        assert!(tx.try_push(ViewEvent::GuidesChanged).is_err());

        assert_eq!(rx.try_pop(), Some(ViewEvent::MonitorRefresh));
        assert_eq!(rx.try_pop(), Some(ViewEvent::GroupsChanged));
        assert_eq!(rx.try_pop(), None);
    }
}
