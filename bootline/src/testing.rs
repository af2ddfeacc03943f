//! In-memory fakes shared by unit tests.

use crate::boot::BootCtx;
use crate::pipeline::BootUnit;
use crate::stage::{BoxedStageBoot, StageBoot, StageId, StageLoader};
use crate::transition::{LoadingIndicator, ShowCompletion};
use async_trait::async_trait;
use bootline_shared::{BootlineError, BootlineResult};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Ordered event log shared between fakes.
#[derive(Clone, Default)]
pub(crate) struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub(crate) fn record(&self, event: impl Into<String>) {
        self.0.lock().push(event.into());
    }

    pub(crate) fn events(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

enum Outcome {
    Succeed,
    Fail,
    Panic,
}

pub(crate) struct RecordingUnit {
    name: String,
    journal: Journal,
    delay: Duration,
    outcome: Outcome,
}

impl RecordingUnit {
    pub(crate) fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            journal: journal.clone(),
            delay: Duration::ZERO,
            outcome: Outcome::Succeed,
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn failing(mut self) -> Self {
        self.outcome = Outcome::Fail;
        self
    }

    pub(crate) fn panicking(mut self) -> Self {
        self.outcome = Outcome::Panic;
        self
    }
}

#[async_trait]
impl BootUnit for RecordingUnit {
    async fn run(self: Box<Self>, _ctx: BootCtx) -> BootlineResult<()> {
        self.journal.record(format!("start:{}", self.name));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.outcome {
            Outcome::Succeed => {}
            Outcome::Fail => {
                self.journal.record(format!("fail:{}", self.name));
                return Err(BootlineError::Internal(format!("{} refused to start", self.name)));
            }
            Outcome::Panic => panic!("unit {} exploded", self.name),
        }
        self.journal.record(format!("end:{}", self.name));
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

enum ShowMode {
    Instant,
    Animated(Duration),
    Forgetful,
}

pub(crate) struct FakeIndicator {
    mode: ShowMode,
    visible: AtomicBool,
    shows: AtomicUsize,
    skipped_shows: AtomicUsize,
    hides: AtomicUsize,
}

impl FakeIndicator {
    fn with_mode(mode: ShowMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            visible: AtomicBool::new(false),
            shows: AtomicUsize::new(0),
            skipped_shows: AtomicUsize::new(0),
            hides: AtomicUsize::new(0),
        })
    }

    pub(crate) fn instant() -> Arc<Self> {
        Self::with_mode(ShowMode::Instant)
    }

    pub(crate) fn animated(duration: Duration) -> Arc<Self> {
        Self::with_mode(ShowMode::Animated(duration))
    }

    /// Drops the completion handle without ever signalling it.
    pub(crate) fn forgetful() -> Arc<Self> {
        Self::with_mode(ShowMode::Forgetful)
    }

    pub(crate) fn shows(&self) -> usize {
        self.shows.load(Ordering::SeqCst)
    }

    pub(crate) fn skipped_shows(&self) -> usize {
        self.skipped_shows.load(Ordering::SeqCst)
    }

    pub(crate) fn hides(&self) -> usize {
        self.hides.load(Ordering::SeqCst)
    }
}

impl LoadingIndicator for FakeIndicator {
    fn show(&self, skip_animation: bool, on_complete: ShowCompletion) {
        self.shows.fetch_add(1, Ordering::SeqCst);
        self.visible.store(true, Ordering::SeqCst);

        if skip_animation {
            self.skipped_shows.fetch_add(1, Ordering::SeqCst);
            on_complete.complete();
            return;
        }

        match self.mode {
            ShowMode::Instant => on_complete.complete(),
            ShowMode::Animated(duration) => {
                tokio::spawn(async move {
                    tokio::time::sleep(duration).await;
                    on_complete.complete();
                });
            }
            ShowMode::Forgetful => drop(on_complete),
        }
    }

    fn hide(&self) {
        self.hides.fetch_add(1, Ordering::SeqCst);
        self.visible.store(false, Ordering::SeqCst);
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

type StageBootFactory = Box<dyn Fn() -> BoxedStageBoot + Send + Sync>;

/// Stage loader that keeps the active stage in memory.
///
/// Loads are serialized through an async mutex, like a real scene manager.
pub(crate) struct FakeStageLoader {
    journal: Journal,
    active: Mutex<Option<StageId>>,
    load_delay: Duration,
    failing: HashSet<StageId>,
    boots: HashMap<StageId, StageBootFactory>,
    load_lock: tokio::sync::Mutex<()>,
    yield_after_load: bool,
}

impl FakeStageLoader {
    pub(crate) fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            active: Mutex::new(None),
            load_delay: Duration::ZERO,
            failing: HashSet::new(),
            boots: HashMap::new(),
            load_lock: tokio::sync::Mutex::new(()),
            yield_after_load: false,
        }
    }

    pub(crate) fn starting_at(self, stage: &str) -> Self {
        *self.active.lock() = Some(StageId::from(stage));
        self
    }

    pub(crate) fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    /// Yield to other tasks after a stage activates but before the load
    /// resolves, so concurrent loads can activate their own stage in between.
    pub(crate) fn yielding_after_load(mut self) -> Self {
        self.yield_after_load = true;
        self
    }

    pub(crate) fn failing_on(mut self, stage: &str) -> Self {
        self.failing.insert(StageId::from(stage));
        self
    }

    pub(crate) fn with_stage_boot<F>(mut self, stage: &str, factory: F) -> Self
    where
        F: Fn() -> BoxedStageBoot + Send + Sync + 'static,
    {
        self.boots.insert(StageId::from(stage), Box::new(factory));
        self
    }
}

#[async_trait]
impl StageLoader for FakeStageLoader {
    async fn load_stage(&self, stage: &StageId) -> BootlineResult<()> {
        {
            let _serial = self.load_lock.lock().await;
            self.journal.record(format!("load:{stage}"));
            if !self.load_delay.is_zero() {
                tokio::time::sleep(self.load_delay).await;
            }
            if self.failing.contains(stage) {
                return Err(BootlineError::Internal(format!("stage {stage} is missing")));
            }
            *self.active.lock() = Some(stage.clone());
        }
        if self.yield_after_load {
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    fn active_stage(&self) -> Option<StageId> {
        self.active.lock().clone()
    }

    fn stage_boot(&self, stage: &StageId) -> Option<BoxedStageBoot> {
        self.boots.get(stage).map(|factory| factory())
    }
}

/// Stage boot that records itself and finishes after a delay.
pub(crate) struct RecordingStageBoot {
    name: String,
    journal: Journal,
    delay: Duration,
    fail: bool,
}

impl RecordingStageBoot {
    pub(crate) fn boxed(name: &str, journal: &Journal, delay: Duration) -> BoxedStageBoot {
        Box::new(Self {
            name: name.to_string(),
            journal: journal.clone(),
            delay,
            fail: false,
        })
    }

    pub(crate) fn failing(name: &str, journal: &Journal) -> BoxedStageBoot {
        Box::new(Self {
            name: name.to_string(),
            journal: journal.clone(),
            delay: Duration::ZERO,
            fail: true,
        })
    }
}

#[async_trait]
impl StageBoot for RecordingStageBoot {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(self: Box<Self>, _ctx: BootCtx) -> BootlineResult<()> {
        self.journal.record(format!("boot:{}", self.name));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(BootlineError::Internal("stage boot gave up".into()));
        }
        self.journal.record(format!("booted:{}", self.name));
        Ok(())
    }
}
