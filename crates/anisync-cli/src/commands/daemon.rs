use crate::output::Output;
use anisync_config::{PathManager, SchedulerConfig};
use anisync_core::SyncDriver;
use color_eyre::Result;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

/// Drives `SyncDriver::run_cycle` from a cron schedule
///
/// A tick starts a new cycle even if the previous one is still running.
pub struct Scheduler {
    scheduler: JobScheduler,
    driver: Arc<SyncDriver>,
    config: SchedulerConfig,
}

impl Scheduler {
    pub async fn new(driver: SyncDriver, config: SchedulerConfig) -> Result<Self> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            scheduler,
            driver: Arc::new(driver),
            config,
        })
    }

    pub async fn start(&mut self) -> Result<()> {
        if self.config.run_on_startup {
            info!(operation = "scheduler_startup", "Running initial sync on startup");
            run_scheduled_cycle(&self.driver).await;
        }

        let driver = Arc::clone(&self.driver);
        let job = Job::new_async(self.config.schedule.as_str(), move |_uuid, _scheduler| {
            let driver = Arc::clone(&driver);
            Box::pin(async move {
                info!(operation = "scheduled_sync_start", "Starting scheduled sync");
                run_scheduled_cycle(&driver).await;
            })
        })
        .map_err(|e| color_eyre::eyre::eyre!("Invalid schedule '{}': {}", self.config.schedule, e))?;

        self.scheduler.add(job).await?;
        self.scheduler.start().await?;

        info!(
            operation = "scheduler_started",
            schedule = %self.config.schedule,
            "Scheduler started"
        );
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        self.scheduler.shutdown().await?;
        info!(operation = "scheduler_stopped", "Scheduler stopped");
        Ok(())
    }
}

async fn run_scheduled_cycle(driver: &SyncDriver) {
    match driver.run_cycle().await {
        Ok(summary) => {
            info!(
                operation = "scheduled_sync_complete",
                updated = summary.updated(),
                failed = summary.failed(),
                duration_ms = summary.duration.as_millis() as u64,
                "Scheduled sync completed"
            );
        }
        Err(e) => {
            error!(operation = "scheduled_sync_error", error = %e, "Scheduled sync failed");
        }
    }
}

pub async fn run_daemon(
    schedule_override: Option<String>,
    no_startup_sync: bool,
    output: &Output,
) -> Result<()> {
    let paths = PathManager::default();
    let config = super::load_config(&paths)?;

    let mut scheduler_config = config.scheduler_or_default();
    if let Some(schedule) = schedule_override {
        scheduler_config.schedule = schedule;
    }
    if no_startup_sync {
        scheduler_config.run_on_startup = false;
    }

    let driver = super::prepare_driver(&config, &paths, output)?;

    output.info(format!(
        "Syncing Hikka user '{}' into AniList on schedule '{}'. Press Ctrl-C to stop.",
        config.hikka.username, scheduler_config.schedule
    ));

    let mut scheduler = Scheduler::new(driver, scheduler_config)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create scheduler: {}", e))?;
    scheduler
        .start()
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to start scheduler: {}", e))?;

    tokio::signal::ctrl_c().await?;
    scheduler.shutdown().await?;
    output.info("Daemon stopped.");

    Ok(())
}
