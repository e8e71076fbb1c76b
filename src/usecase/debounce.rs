use std::time::Duration;

/// Identifies one scheduling of a [`Debouncer`]. Only the latest ticket can
/// fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket(u64);

/// Single-shot deferred delivery that restarts on every `schedule`.
/// At most one value is pending at a time. The caller owns the timer: it
/// waits `delay()` and then calls `fire` with the ticket it was handed.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    generation: u64,
    pending: Option<(DebounceTicket, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&mut self, value: T) -> DebounceTicket {
        self.generation = self.generation.wrapping_add(1);
        let ticket = DebounceTicket(self.generation);
        self.pending = Some((ticket, value));
        ticket
    }

    /// Delivers the pending value if `ticket` is still the latest one.
    pub fn fire(&mut self, ticket: DebounceTicket) -> Option<T> {
        let is_latest = self
            .pending
            .as_ref()
            .is_some_and(|(pending, _)| *pending == ticket);
        if is_latest {
            self.cancel()
        } else {
            None
        }
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn latest_value_is_delivered_once() {
        let mut debouncer = Debouncer::new(DELAY);
        let ticket = debouncer.schedule("pa");

        assert_eq!(debouncer.delay(), DELAY);
        assert_eq!(debouncer.fire(ticket), Some("pa"));
        assert_eq!(debouncer.fire(ticket), None);
    }

    #[test]
    fn stale_tickets_never_fire() {
        let mut debouncer = Debouncer::new(DELAY);
        let first = debouncer.schedule("p");
        let second = debouncer.schedule("pa");

        assert_eq!(debouncer.fire(first), None);
        assert_eq!(debouncer.fire(second), Some("pa"));
        assert_eq!(debouncer.fire(second), None);
    }

    #[test]
    fn cancel_drops_the_pending_value() {
        let mut debouncer = Debouncer::new(DELAY);
        let ticket = debouncer.schedule("park");

        assert_eq!(debouncer.cancel(), Some("park"));
        assert_eq!(debouncer.cancel(), None);
        assert_eq!(debouncer.fire(ticket), None);
    }
}
