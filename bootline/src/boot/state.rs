//! Boot lifecycle state machine.

use std::fmt;
use tokio::sync::watch;

/// Process-wide boot state.
///
/// Transitions are monotonic:
/// `NotStarted → Running → Ready` or `NotStarted → Running → Failed`.
/// `Ready` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootState {
    NotStarted,
    Running,
    Ready,
    Failed,
}

impl BootState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BootState::Ready | BootState::Failed)
    }
}

impl fmt::Display for BootState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BootState::NotStarted => "NotStarted",
            BootState::Running => "Running",
            BootState::Ready => "Ready",
            BootState::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// Shared holder for [`BootState`].
///
/// Every transition is a single compare-and-set under the watch channel's
/// lock, so concurrent callers can never both observe `NotStarted` and both
/// move to `Running`.
#[derive(Debug)]
pub struct BootStatus {
    tx: watch::Sender<BootState>,
}

impl BootStatus {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(BootState::NotStarted);
        Self { tx }
    }

    pub fn get(&self) -> BootState {
        *self.tx.borrow()
    }

    /// Claim the single boot run. Returns false if boot was already triggered.
    pub(crate) fn try_begin(&self) -> bool {
        self.tx.send_if_modified(|state| {
            if *state == BootState::NotStarted {
                *state = BootState::Running;
                true
            } else {
                false
            }
        })
    }

    /// Move `Running` to a terminal state. Ignored from any other state.
    pub(crate) fn finish(&self, terminal: BootState) -> bool {
        debug_assert!(terminal.is_terminal());
        self.tx.send_if_modified(|state| {
            if *state == BootState::Running && terminal.is_terminal() {
                *state = terminal;
                true
            } else {
                false
            }
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<BootState> {
        self.tx.subscribe()
    }

    /// Wait until the state is `Ready` or `Failed`.
    pub async fn wait_terminal(&self) -> BootState {
        let mut rx = self.subscribe();
        match rx.wait_for(BootState::is_terminal).await {
            Ok(state) => *state,
            Err(_) => self.get(),
        }
    }
}

impl Default for BootStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_only_once() {
        let status = BootStatus::new();
        assert_eq!(status.get(), BootState::NotStarted);

        assert!(status.try_begin());
        assert!(!status.try_begin());
        assert_eq!(status.get(), BootState::Running);
    }

    #[test]
    fn test_terminal_states_are_final() {
        let status = BootStatus::new();
        assert!(!status.finish(BootState::Ready));
        assert_eq!(status.get(), BootState::NotStarted);

        status.try_begin();
        assert!(status.finish(BootState::Failed));
        assert!(!status.finish(BootState::Ready));
        assert!(!status.try_begin());
        assert_eq!(status.get(), BootState::Failed);
    }

    #[tokio::test]
    async fn test_wait_terminal_observes_ready() {
        let status = std::sync::Arc::new(BootStatus::new());
        status.try_begin();

        let waiter = {
            let status = std::sync::Arc::clone(&status);
            tokio::spawn(async move { status.wait_terminal().await })
        };

        tokio::task::yield_now().await;
        status.finish(BootState::Ready);

        assert_eq!(waiter.await.unwrap(), BootState::Ready);
    }
}
