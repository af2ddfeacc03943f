//! Loading indicator capability.

use tokio::sync::oneshot;

/// Completion handle passed to [`LoadingIndicator::show`].
///
/// Call [`complete`](Self::complete) once the show animation has finished.
/// Dropping it without completing releases any waiter as well, so an
/// indicator cannot wedge a transition by losing the handle.
#[derive(Debug)]
pub struct ShowCompletion {
    tx: Option<oneshot::Sender<()>>,
}

impl ShowCompletion {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A handle nobody waits on (used when the animation is skipped).
    pub fn detached() -> Self {
        Self { tx: None }
    }

    pub fn complete(mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Transient progress indicator shown during stage transitions.
///
/// Methods are invoked while the gate holds its state lock, so
/// implementations must return promptly and must not call back into the gate.
/// Long-running animations should run elsewhere and report through the
/// [`ShowCompletion`] handle.
pub trait LoadingIndicator: Send + Sync {
    fn show(&self, skip_animation: bool, on_complete: ShowCompletion);

    fn hide(&self);

    fn is_visible(&self) -> bool;
}
