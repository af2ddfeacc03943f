//! Reference-counted gate over the shared loading indicator.
//!
//! ## Protocol
//!
//! ```text
//! acquire:  count += 1; if nothing visible → show (wait for animation)
//! release:  count -= 1; if count == 0 → wait out min display time
//!                                      → re-check → hide
//! ```
//!
//! Every acquire bumps a generation number. A release that reached zero
//! remembers the generation it saw and only hides if no acquire happened
//! during its wait, so a transition that starts while the indicator is
//! lingering keeps it on screen.

use super::indicator::{LoadingIndicator, ShowCompletion};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Default)]
struct GateState {
    ref_count: usize,
    visible: bool,
    showing: bool,
    generation: u64,
}

/// Shows the indicator once for any number of overlapping transitions and
/// hides it when the last one finishes.
///
/// The gate counts references only; callers must balance each `acquire` with
/// exactly one `release`.
pub struct TransitionGate {
    indicator: Option<Arc<dyn LoadingIndicator>>,
    state: Mutex<GateState>,
}

impl TransitionGate {
    pub fn new(indicator: Option<Arc<dyn LoadingIndicator>>) -> Self {
        Self {
            indicator,
            state: Mutex::new(GateState::default()),
        }
    }

    /// Gate without an indicator: acquire and release only track the count.
    pub fn without_indicator() -> Self {
        Self::new(None)
    }

    pub fn has_indicator(&self) -> bool {
        self.indicator.is_some()
    }

    pub fn ref_count(&self) -> usize {
        self.state.lock().ref_count
    }

    pub fn is_visible(&self) -> bool {
        self.state.lock().visible
    }

    /// Take a reference, showing the indicator if nothing is on screen yet.
    ///
    /// Resolves once the show animation completes, immediately when
    /// `skip_animation` is set, and immediately for acquirers that find the
    /// indicator already visible or already being shown.
    pub async fn acquire(&self, skip_animation: bool) {
        let pending = {
            let mut state = self.state.lock();
            state.ref_count += 1;
            state.generation = state.generation.wrapping_add(1);

            let Some(indicator) = self.indicator.as_ref() else {
                return;
            };

            if state.visible || state.showing || indicator.is_visible() {
                tracing::trace!(ref_count = state.ref_count, "Indicator already up");
                state.visible = true;
                return;
            }

            tracing::debug!(skip_animation, "Showing loading indicator");
            state.visible = true;
            if skip_animation {
                indicator.show(true, ShowCompletion::detached());
                return;
            }

            state.showing = true;
            let (completion, rx) = ShowCompletion::channel();
            indicator.show(false, completion);
            rx
        };

        if pending.await.is_err() {
            tracing::warn!("Loading indicator dropped its show completion without signalling");
        }
        self.state.lock().showing = false;
    }

    /// Drop a reference, hiding the indicator once no reference remains.
    ///
    /// When the last reference goes away before `min_visible` has elapsed
    /// since acquisition, the hide waits out the remainder. Releasing with no
    /// outstanding reference is a no-op.
    pub async fn release(&self, min_visible: Duration, elapsed: Duration) {
        let generation = {
            let mut state = self.state.lock();
            if state.ref_count == 0 {
                tracing::warn!("Transition gate released without a matching acquire");
                return;
            }
            state.ref_count -= 1;
            if state.ref_count > 0 || self.indicator.is_none() {
                return;
            }
            state.generation
        };

        let remaining = min_visible.saturating_sub(elapsed);
        if !remaining.is_zero() {
            tracing::debug!(
                remaining_ms = remaining.as_millis(),
                "Holding loading indicator for minimum display time"
            );
            tokio::time::sleep(remaining).await;
        }

        let mut state = self.state.lock();
        if state.ref_count > 0 || state.generation != generation {
            tracing::debug!("Gate re-acquired while hide was pending, keeping indicator");
            return;
        }

        if let Some(indicator) = self.indicator.as_ref()
            && (state.visible || indicator.is_visible())
        {
            tracing::debug!("Hiding loading indicator");
            indicator.hide();
        }
        state.visible = false;
    }
}

impl std::fmt::Debug for TransitionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("TransitionGate")
            .field("has_indicator", &self.indicator.is_some())
            .field("ref_count", &state.ref_count)
            .field("visible", &state.visible)
            .finish()
    }
}
