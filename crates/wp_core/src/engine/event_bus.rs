//! Typed publish/subscribe handles.
//!
//! Components receive a `Publisher` when they are built; readers hold a
//! `Subscription`. Each subscription owns a FIFO queue that the bus only
//! holds weakly, so dropping the subscription is the unsubscribe and the next
//! publish prunes it.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

type Queue<E> = Rc<RefCell<VecDeque<E>>>;
type Queues<E> = Rc<RefCell<Vec<Weak<RefCell<VecDeque<E>>>>>>;

pub struct EventBus<E> {
    queues: Queues<E>,
}

impl<E: Clone> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> EventBus<E> {
    pub fn new() -> Self {
        Self { queues: Rc::new(RefCell::new(Vec::new())) }
    }

    pub fn publisher(&self) -> Publisher<E> {
        Publisher { queues: Rc::clone(&self.queues) }
    }

    pub fn subscribe(&self) -> Subscription<E> {
        let queue: Queue<E> = Rc::new(RefCell::new(VecDeque::new()));
        self.queues.borrow_mut().push(Rc::downgrade(&queue));
        Subscription { queue }
    }

    /// Registered queues, including ones whose subscription was dropped
    /// since the last publish.
    pub fn channel_count(&self) -> usize {
        self.queues.borrow().len()
    }
}

pub struct Publisher<E> {
    queues: Queues<E>,
}

impl<E> Clone for Publisher<E> {
    fn clone(&self) -> Self {
        Self { queues: Rc::clone(&self.queues) }
    }
}

impl<E: Clone> Publisher<E> {
    /// A publisher with no bus behind it. Events go nowhere.
    pub fn detached() -> Self {
        Self { queues: Rc::new(RefCell::new(Vec::new())) }
    }

    pub fn publish(&self, event: E) {
        self.queues.borrow_mut().retain(|weak| match weak.upgrade() {
            Some(queue) => {
                queue.borrow_mut().push_back(event.clone());
                true
            }
            None => false,
        });
    }
}

pub struct Subscription<E> {
    queue: Queue<E>,
}

impl<E> Subscription<E> {
    pub fn try_next(&self) -> Option<E> {
        self.queue.borrow_mut().pop_front()
    }

    pub fn drain(&self) -> Vec<E> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subscriber_receives() {
        let bus = EventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();
        let publisher = bus.publisher();

        publisher.publish(1u32);
        publisher.publish(2u32);

        assert_eq!(a.drain(), vec![1, 2]);
        assert_eq!(b.try_next(), Some(1));
        assert_eq!(b.try_next(), Some(2));
        assert_eq!(b.try_next(), None);
    }

    #[test]
    fn test_dropped_subscription_is_pruned() {
        let bus = EventBus::new();
        let keep = bus.subscribe();
        {
            let _gone = bus.subscribe();
        }
        assert_eq!(bus.channel_count(), 2);

        bus.publisher().publish("x");
        assert_eq!(bus.channel_count(), 1);
        assert_eq!(keep.drain(), vec!["x"]);
    }

    #[test]
    fn test_detached_publisher_is_silent() {
        let publisher = Publisher::detached();
        publisher.publish(5u8);
    }

    #[test]
    fn test_late_subscriber_misses_earlier_events() {
        let bus = EventBus::new();
        let publisher = bus.publisher();
        publisher.publish(1i32);
        let late = bus.subscribe();
        publisher.publish(2i32);
        assert_eq!(late.drain(), vec![2]);
    }

    #[test]
    fn test_drain_empties_only_its_own_queue() {
        let bus = EventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();
        let publisher = bus.publisher();
        for n in 0..3u16 {
            publisher.publish(n);
        }

        assert_eq!(a.drain(), vec![0, 1, 2]);
        assert_eq!(a.pending(), 0);
        assert_eq!(b.pending(), 3);
        publisher.publish(3);
        assert_eq!(a.drain(), vec![3]);
        assert_eq!(b.drain(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_publishing_to_dropped_subscriptions_only_prunes() {
        let bus = EventBus::new();
        let publisher = bus.publisher();
        drop(bus.subscribe());
        drop(bus.subscribe());

        publisher.publish(7u8);
        assert_eq!(bus.channel_count(), 0);
    }
}
