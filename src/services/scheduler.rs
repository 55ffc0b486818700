//! Periodic background analysis of a watchlist.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::SchedulerConfig;
use crate::error::AppError;
use crate::services::analysis_service::AnalysisService;
use crate::services::market_data::HistoryRequest;
use crate::types::{Decision, IndicatorSelection};

/// Handle to a running scheduler task.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signal the loop to exit and wait for it.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            error!("Scheduler task ended abnormally: {}", e);
        }
    }
}

/// Analyzes every watchlist symbol with the default indicator set on a fixed
/// interval and logs the decision.
pub struct AnalysisScheduler {
    service: Arc<AnalysisService>,
    watchlist: Vec<String>,
    interval: Duration,
}

impl AnalysisScheduler {
    pub fn new(service: Arc<AnalysisService>, config: &SchedulerConfig) -> Self {
        Self {
            service,
            watchlist: config.watchlist.clone(),
            interval: Duration::from_secs(config.interval_secs.max(1)),
        }
    }

    /// One pass over the watchlist. A failing symbol does not stop the
    /// others.
    pub async fn run_once(&self) -> Vec<(String, Decision)> {
        info!("Running scheduled analysis for {} symbols", self.watchlist.len());
        let selection = IndicatorSelection::default_set();
        let request = HistoryRequest::period("6mo", "1d");

        let mut decisions = Vec::with_capacity(self.watchlist.len());
        for symbol in &self.watchlist {
            match self.service.analyze(symbol, &request, &selection).await {
                Ok(result) => {
                    info!(
                        "[{}] Final decision: {} ({:.2})",
                        result.symbol, result.final_decision.signal, result.final_decision.confidence
                    );
                    decisions.push((result.symbol, result.final_decision));
                }
                Err(AppError::NotFound(msg)) => warn!("[{}] {}", symbol, msg),
                Err(e) => error!("[{}] Error during scheduled analysis: {}", symbol, e),
            }
        }
        decisions
    }

    /// Spawn the loop. The first pass runs immediately.
    pub fn start(self) -> SchedulerHandle {
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            info!("Scheduler started (every {:?})", self.interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.run_once().await;
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            info!("Scheduler stopped");
        });

        SchedulerHandle { shutdown, task }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::market_data::{PriceHistoryProvider, ProviderError};
    use crate::types::{Bar, SignalDirection};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PriceHistoryProvider for CountingProvider {
        async fn fetch(&self, symbol: &str, _: &HistoryRequest) -> Result<Vec<Bar>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if symbol == "BAD" {
                return Err(ProviderError::Http("connection reset".into()));
            }
            let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            Ok((0..30)
                .map(|i| Bar {
                    date: start + chrono::Duration::days(i),
                    open: 10.0,
                    high: 10.0,
                    low: 10.0,
                    close: 10.0,
                    volume: 100,
                })
                .collect())
        }
    }

    fn scheduler(watchlist: &[&str], provider: Arc<CountingProvider>) -> AnalysisScheduler {
        let service = Arc::new(AnalysisService::new(provider, Duration::from_secs(5)));
        AnalysisScheduler::new(
            service,
            &SchedulerConfig {
                enabled: true,
                interval_secs: 3600,
                watchlist: watchlist.iter().map(|s| s.to_string()).collect(),
            },
        )
    }

    #[tokio::test]
    async fn test_run_once_skips_failures() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let decisions = scheduler(&["AAPL", "BAD", "MSFT"], provider.clone())
            .run_once()
            .await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].0, "AAPL");
        assert_eq!(decisions[0].1.signal, SignalDirection::Neutral);
        assert_eq!(decisions[0].1.confidence, 0.0);
    }

    #[tokio::test]
    async fn test_start_runs_and_stops() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let handle = scheduler(&["AAPL"], provider.clone()).start();

        // First tick fires immediately.
        for _ in 0..50 {
            if provider.calls.load(Ordering::SeqCst) > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.stop().await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }
}
