use std::{
    cell::Cell,
    collections::VecDeque,
    rc::Rc,
    time::{Duration, Instant},
};

use super::Direction;
use crate::error::QueueError;

/// Source of time for the debounce timer.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock(Rc<Cell<Instant>>);

impl ManualClock {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(Instant::now())))
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.0.get()
    }
}

/// Handed out for every accepted move, and echoed back in its [`MoveOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MoveTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCommand {
    pub ticket: MoveTicket,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub ticket: MoveTicket,
    pub direction: Direction,
    pub changed: bool,
}

/// Bounded FIFO of pending moves plus the one-shot debounce timer.
#[derive(Debug)]
pub struct MoveQueue {
    commands: VecDeque<MoveCommand>,
    capacity: usize,
    delay: Duration,
    deadline: Option<Instant>,
    next_ticket: u64,
}

impl MoveQueue {
    pub fn new(capacity: usize, delay: Duration) -> Self {
        Self {
            commands: VecDeque::with_capacity(capacity),
            capacity,
            delay,
            deadline: None,
            next_ticket: 0,
        }
    }

    pub fn push(&mut self, direction: Direction) -> Result<MoveTicket, QueueError> {
        if self.commands.len() >= self.capacity {
            return Err(QueueError::Full {
                capacity: self.capacity,
            });
        }

        let ticket = MoveTicket(self.next_ticket);
        self.next_ticket += 1;
        self.commands.push_back(MoveCommand { ticket, direction });

        Ok(ticket)
    }

    pub fn pop(&mut self) -> Option<MoveCommand> {
        self.commands.pop_front()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drops every waiting command and cancels the timer.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.deadline = None;
    }

    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the timer is still counting down at `now`.
    pub fn timer_running(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now < deadline)
    }

    /// Whether the timer is armed and its deadline has passed.
    pub fn timer_elapsed(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn test_fifo() {
        let mut queue = MoveQueue::new(4, DELAY);
        let a = queue.push(Direction::Up).unwrap();
        let b = queue.push(Direction::Left).unwrap();
        assert!(a < b);

        assert_eq!(
            queue.pop(),
            Some(MoveCommand {
                ticket: a,
                direction: Direction::Up
            })
        );
        assert_eq!(
            queue.pop(),
            Some(MoveCommand {
                ticket: b,
                direction: Direction::Left
            })
        );
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_capacity() {
        let mut queue = MoveQueue::new(2, DELAY);
        queue.push(Direction::Up).unwrap();
        queue.push(Direction::Up).unwrap();
        assert_eq!(
            queue.push(Direction::Down),
            Err(QueueError::Full { capacity: 2 })
        );
        assert_eq!(queue.len(), 2);

        queue.pop();
        assert!(queue.push(Direction::Down).is_ok());
    }

    #[test]
    fn test_timer() {
        let clock = ManualClock::new();
        let mut queue = MoveQueue::new(2, DELAY);
        assert!(!queue.timer_running(clock.now()));
        assert!(!queue.timer_elapsed(clock.now()));

        queue.arm(clock.now());
        assert!(queue.timer_running(clock.now()));

        clock.advance(Duration::from_millis(299));
        assert!(queue.timer_running(clock.now()));
        assert!(!queue.timer_elapsed(clock.now()));

        clock.advance(Duration::from_millis(1));
        assert!(!queue.timer_running(clock.now()));
        assert!(queue.timer_elapsed(clock.now()));

        queue.disarm();
        assert_eq!(queue.deadline(), None);
    }

    #[test]
    fn test_clear_cancels_timer() {
        let clock = ManualClock::new();
        let mut queue = MoveQueue::new(2, DELAY);
        queue.push(Direction::Right).unwrap();
        queue.arm(clock.now());

        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.deadline(), None);
    }

    #[test]
    fn test_shared_clock() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let start = clock.now();

        other.advance(DELAY);
        assert_eq!(clock.now(), start + DELAY);
    }
}
