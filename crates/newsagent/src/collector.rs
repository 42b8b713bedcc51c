//! Recurring news collection
//!
//! The job fetches (and thereby persists) the latest news, then summarizes
//! it. The scheduler runs the job on a fixed interval, checking every poll
//! interval whether a run is due. Runs never overlap: the next run is due one
//! interval after the previous one finished.

use crate::config::NewsAgentConfig;
use crate::models::ArticleSummary;
use crate::source::DataSource;
use crate::summarizer::Summarizer;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Outcome of one collection run
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionReport {
    pub articles: usize,
    pub summaries: Vec<ArticleSummary>,
}

/// Fetch news, then summarize it
pub struct CollectionJob {
    source: Arc<dyn DataSource>,
    summarizer: Arc<dyn Summarizer>,
}

impl CollectionJob {
    pub fn new(source: Arc<dyn DataSource>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self { source, summarizer }
    }

    /// Run once
    pub async fn run(&self) -> CollectionReport {
        let articles = self.source.fetch_news().await;
        let summaries = self.summarizer.summarize(&articles).await;
        info!(
            "Collection run: {} articles, {} summaries",
            articles.len(),
            summaries.len()
        );
        CollectionReport {
            articles: articles.len(),
            summaries,
        }
    }
}

/// Fixed-interval runner for a [`CollectionJob`]
#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: Duration,
    poll: Duration,
    run_immediately: bool,
}

impl Scheduler {
    /// `interval` between runs, checked every `poll`
    pub fn new(interval: Duration, poll: Duration) -> Self {
        Self {
            interval,
            poll,
            run_immediately: false,
        }
    }

    /// Scheduler using the configured collection and poll intervals
    pub fn from_config(config: &NewsAgentConfig) -> Self {
        Self::new(config.collection_interval, config.poll_interval)
    }

    /// Run the first collection at start instead of one interval later
    pub fn run_immediately(mut self, yes: bool) -> Self {
        self.run_immediately = yes;
        self
    }

    /// When the first run is due, given the start time
    pub fn first_due(&self, start: Instant) -> Instant {
        if self.run_immediately {
            start
        } else {
            start + self.interval
        }
    }

    /// When the next run is due, given when the previous one finished
    pub fn next_due(&self, finished: Instant) -> Instant {
        finished + self.interval
    }

    /// Run `job` until `shutdown` resolves; returns the number of runs
    pub async fn run_until<F>(&self, job: &CollectionJob, shutdown: F) -> usize
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut due = self.first_due(Instant::now());
        let mut runs = 0;
        info!(
            "Collector running every {:?} (Ctrl+C to stop)",
            self.interval
        );

        loop {
            if Instant::now() >= due {
                job.run().await;
                runs += 1;
                due = self.next_due(Instant::now());
                debug!("Next collection in {:?}", self.interval);
            }

            tokio::select! {
                () = &mut shutdown => {
                    info!("Collector stopping after {runs} run(s)");
                    return runs;
                }
                () = tokio::time::sleep(self.poll) => {}
            }
        }
    }
}
