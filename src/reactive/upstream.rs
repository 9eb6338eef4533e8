use super::Latest;
use crate::error::{ShellError, UpstreamError};
use crate::events::Reporter;
use tokio::sync::watch;

/// What an external collaborator has published so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission<T> {
    /// Nothing published yet.
    Pending,
    Value(T),
    Failed(UpstreamError),
}

/// Latest-value stream handed in by an external collaborator.
pub type Upstream<T> = watch::Receiver<Emission<T>>;

impl<T> Latest<Emission<T>> {
    /// An upstream with nothing published yet.
    pub fn pending() -> Self {
        Self::new(Emission::Pending)
    }

    pub fn publish(&self, value: T) {
        self.replace(Emission::Value(value));
    }

    pub fn fail(&self, error: UpstreamError) {
        self.replace(Emission::Failed(error));
    }
}

/// One input of a component: an upstream plus its last good value.
///
/// Failures are reported and otherwise ignored, so the last good value keeps
/// feeding the derivation.
#[derive(Debug)]
pub(crate) struct Input<T> {
    name: &'static str,
    rx: Upstream<T>,
    latest: Option<T>,
    reports: bool,
}

impl<T: Clone> Input<T> {
    pub(crate) fn new(name: &'static str, rx: Upstream<T>) -> Self {
        Self {
            name,
            rx,
            latest: None,
            reports: true,
        }
    }

    /// An input on an upstream whose failures another component reports.
    /// Failures are only logged, so one failure surfaces as one event.
    pub(crate) fn follower(name: &'static str, rx: Upstream<T>) -> Self {
        Self {
            reports: false,
            ..Self::new(name, rx)
        }
    }

    /// Wait for the next publish. Errors once the collaborator is gone.
    pub(crate) async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.rx.changed().await
    }

    /// Take the current emission. Returns `true` when a new value was taken.
    pub(crate) fn absorb(&mut self, reporter: &Reporter) -> bool {
        let emission = self.rx.borrow_and_update().clone();
        match emission {
            Emission::Pending => false,
            Emission::Value(value) => {
                self.latest = Some(value);
                true
            }
            Emission::Failed(error) if self.reports => {
                reporter.report(ShellError::Transient {
                    upstream: self.name,
                    error,
                });
                false
            }
            Emission::Failed(error) => {
                tracing::debug!(upstream = self.name, %error, "Upstream failed, keeping last value");
                false
            }
        }
    }

    /// Take the current emission only if it has not been seen yet.
    pub(crate) fn refresh(&mut self, reporter: &Reporter) -> bool {
        match self.rx.has_changed() {
            Ok(true) => self.absorb(reporter),
            _ => false,
        }
    }

    pub(crate) fn latest(&self) -> Option<&T> {
        self.latest.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ShellEvent;

    #[test]
    fn test_pending_is_not_a_value() {
        let (reporter, _rx) = Reporter::channel(4);
        let source: Latest<Emission<i32>> = Latest::pending();
        let mut input = Input::new("numbers", source.subscribe());

        assert!(!input.absorb(&reporter));
        assert!(input.latest().is_none());
    }

    #[test]
    fn test_failure_keeps_last_value_and_reports() {
        let (reporter, mut events) = Reporter::channel(4);
        let source = Latest::pending();
        let mut input = Input::new("numbers", source.subscribe());

        source.publish(3);
        assert!(input.absorb(&reporter));

        source.fail(UpstreamError::failed("numbers", "offline"));
        assert!(!input.absorb(&reporter));
        assert_eq!(input.latest(), Some(&3));

        match events.try_recv().unwrap() {
            ShellEvent::Error(ShellError::Transient { upstream, .. }) => {
                assert_eq!(upstream, "numbers")
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_follower_keeps_last_value_silently() {
        let (reporter, mut events) = Reporter::channel(4);
        let source = Latest::pending();
        let mut input = Input::follower("numbers", source.subscribe());

        source.publish(5);
        assert!(input.absorb(&reporter));
        source.fail(UpstreamError::failed("numbers", "offline"));
        assert!(!input.absorb(&reporter));

        assert_eq!(input.latest(), Some(&5));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_refresh_skips_seen_emission() {
        let (reporter, _rx) = Reporter::channel(4);
        let source = Latest::pending();
        let mut input = Input::new("numbers", source.subscribe());

        source.publish(1);
        assert!(input.refresh(&reporter));
        assert!(!input.refresh(&reporter));

        source.publish(2);
        assert!(input.refresh(&reporter));
        assert_eq!(input.latest(), Some(&2));
    }

    #[tokio::test]
    async fn test_changed_errors_after_publisher_dropped() {
        let source: Latest<Emission<i32>> = Latest::pending();
        let mut input = Input::new("numbers", source.subscribe());
        drop(source);
        assert!(input.changed().await.is_err());
    }
}
