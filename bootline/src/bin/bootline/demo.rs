//! Demo units, indicator and stage loader wired into the `bootline` binary.

use async_trait::async_trait;
use bootline::{
    BootCtx, BootUnit, BootlineError, BootlineResult, BoxedStageBoot, BoxedUnit, LoadingIndicator,
    ShowCompletion, StageBoot, StageId, StageLoader, UnitRegistration,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub struct DemoConfig {
    pub title: String,
}

pub struct AssetIndex {
    pub entries: usize,
}

struct ConfigUnit;

#[async_trait]
impl BootUnit for ConfigUnit {
    async fn run(self: Box<Self>, ctx: BootCtx) -> BootlineResult<()> {
        ctx.provide(DemoConfig {
            title: "bootline demo".to_string(),
        });
        Ok(())
    }

    fn name(&self) -> &str {
        "config"
    }
}

struct AssetsUnit;

#[async_trait]
impl BootUnit for AssetsUnit {
    async fn run(self: Box<Self>, ctx: BootCtx) -> BootlineResult<()> {
        let config = ctx.require::<DemoConfig>()?;
        tokio::time::sleep(Duration::from_millis(150)).await;
        ctx.provide(AssetIndex { entries: 42 });
        tracing::info!(title = %config.title, "Asset index warmed");
        Ok(())
    }

    fn name(&self) -> &str {
        "assets"
    }
}

struct TelemetryUnit;

#[async_trait]
impl BootUnit for TelemetryUnit {
    async fn run(self: Box<Self>, _ctx: BootCtx) -> BootlineResult<()> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(())
    }

    fn name(&self) -> &str {
        "telemetry"
    }
}

inventory::submit! {
    UnitRegistration::new("demo::ConfigUnit", Some(0), || Ok(Box::new(ConfigUnit) as BoxedUnit))
}

inventory::submit! {
    UnitRegistration::new("demo::AssetsUnit", Some(10), || Ok(Box::new(AssetsUnit) as BoxedUnit))
}

inventory::submit! {
    UnitRegistration::new("demo::TelemetryUnit", None, || Ok(Box::new(TelemetryUnit) as BoxedUnit))
}

/// Prints indicator changes to stdout; the show animation is a timer.
pub struct ConsoleIndicator {
    animation: Duration,
    visible: Arc<AtomicBool>,
}

impl ConsoleIndicator {
    pub fn new(animation: Duration) -> Self {
        Self {
            animation,
            visible: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl LoadingIndicator for ConsoleIndicator {
    fn show(&self, skip_animation: bool, on_complete: ShowCompletion) {
        self.visible.store(true, Ordering::SeqCst);
        if skip_animation {
            println!("[loading] shown");
            on_complete.complete();
            return;
        }

        println!("[loading] fading in");
        let animation = self.animation;
        tokio::spawn(async move {
            tokio::time::sleep(animation).await;
            println!("[loading] shown");
            on_complete.complete();
        });
    }

    fn hide(&self) {
        self.visible.store(false, Ordering::SeqCst);
        println!("[loading] hidden");
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

/// Pretends to load stages by sleeping. A stage named `Missing` fails.
pub struct SimulatedStageLoader {
    active: Mutex<Option<StageId>>,
    load_delay: Duration,
    serial: tokio::sync::Mutex<()>,
}

impl SimulatedStageLoader {
    pub fn new(active: Option<StageId>, load_delay: Duration) -> Self {
        Self {
            active: Mutex::new(active),
            load_delay,
            serial: tokio::sync::Mutex::new(()),
        }
    }
}

#[async_trait]
impl StageLoader for SimulatedStageLoader {
    async fn load_stage(&self, stage: &StageId) -> BootlineResult<()> {
        let _serial = self.serial.lock().await;
        println!("loading stage {stage}");
        tokio::time::sleep(self.load_delay).await;
        if stage.as_str() == "Missing" {
            return Err(BootlineError::StageLoad {
                stage: stage.to_string(),
                reason: "no such stage".to_string(),
            });
        }
        *self.active.lock() = Some(stage.clone());
        Ok(())
    }

    fn active_stage(&self) -> Option<StageId> {
        self.active.lock().clone()
    }

    fn stage_boot(&self, stage: &StageId) -> Option<BoxedStageBoot> {
        Some(Box::new(AnnounceStage {
            stage: stage.clone(),
        }))
    }
}

/// Stage boot that reports which boot services the stage can see.
struct AnnounceStage {
    stage: StageId,
}

#[async_trait]
impl StageBoot for AnnounceStage {
    fn name(&self) -> &str {
        self.stage.as_str()
    }

    async fn run(self: Box<Self>, ctx: BootCtx) -> BootlineResult<()> {
        let assets = ctx.get::<AssetIndex>().map(|index| index.entries).unwrap_or(0);
        println!("stage {} ready ({} assets)", self.stage, assets);
        Ok(())
    }
}
