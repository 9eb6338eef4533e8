use tokio::sync::watch;

/// Single-slot latest-value broadcast cell.
///
/// Every subscriber sees the current value immediately and is woken on each
/// later publish. Publishing never fails, even with no subscribers.
#[derive(Debug)]
pub struct Latest<T> {
    tx: watch::Sender<T>,
}

impl<T> Latest<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Subscribe, with the current value already marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Publish unconditionally, notifying every subscriber.
    pub fn replace(&self, value: T) {
        self.tx.send_replace(value);
    }
}

impl<T: Clone> Latest<T> {
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}

impl<T: PartialEq> Latest<T> {
    /// Publish only if the value differs from the current one.
    ///
    /// Returns whether subscribers were notified.
    pub fn set_if_changed(&self, value: T) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }
}

impl<T: Default> Default for Latest<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
