//! Watcher: drives fetch -> parse -> enrich -> diff -> notify -> persist on a
//! fixed interval.

use std::sync::Arc;

use tokio::time::{interval, sleep, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use tracing::{error, info};

use crate::{
    config::Config,
    diff::classify,
    domain::DiffReport,
    notify::Notifier,
    parser::parse_listing,
    ports::{MetadataSource, NotifySink, PageSource},
    snapshot::SnapshotStore,
    Result,
};

pub struct DocumentWatcher {
    cfg: Arc<Config>,
    pages: Arc<dyn PageSource>,
    store: SnapshotStore,
    metadata: Arc<dyn MetadataSource>,
    notifier: Notifier,
}

impl DocumentWatcher {
    pub fn new(
        cfg: Arc<Config>,
        pages: Arc<dyn PageSource>,
        metadata: Arc<dyn MetadataSource>,
        sink: Arc<dyn NotifySink>,
    ) -> Self {
        let store = SnapshotStore::new(cfg.snapshot_file.clone());
        let notifier = Notifier::new(sink, cfg.channel_id, cfg.role_id);
        Self {
            cfg,
            pages,
            store,
            metadata,
            notifier,
        }
    }

    /// Runs cycles until `cancel` fires. Cycles never overlap: the interval
    /// tick is only consulted after the running cycle finishes, and a missed
    /// tick is delayed rather than burst.
    pub async fn run(&self, cancel: CancellationToken) {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = sleep(self.cfg.startup_delay) => {}
        }
        info!("startup delay elapsed, starting first check");

        let mut tick = interval(self.cfg.check_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tick.tick() => {}
            }

            tokio::select! {
                // Cancellation mid-cycle aborts before `save`, leaving the
                // snapshot at its pre-cycle value.
                _ = cancel.cancelled() => break,
                res = self.run_cycle() => {
                    if let Err(e) = res {
                        error!(error = %e, "check cycle failed, will retry next tick");
                    }
                }
            }
        }

        info!("watcher stopped");
    }

    /// One full check cycle. On success the freshly enriched scrape replaces
    /// the snapshot regardless of whether anything was announced.
    pub async fn run_cycle(&self) -> Result<DiffReport> {
        let previous = self.store.load().await?;

        let html = self.pages.fetch_rendered(&self.cfg.page_url).await?;
        let mut current = parse_listing(&html, &self.cfg.section, &self.cfg.base_url);
        self.metadata.attach_filenames(&mut current).await;

        let report = classify(&current, &previous);

        // A failed send is an operator problem, not a reason to re-announce
        // the same diff forever: persistence still happens.
        if let Err(e) = self.notifier.announce(&report).await {
            error!(error = %e, "announcement failed");
        }

        self.store.save(&current).await?;
        Ok(report)
    }
}
