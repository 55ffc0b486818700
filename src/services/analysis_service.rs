//! Fetch-analyze-persist orchestration shared by the HTTP handlers and the
//! scheduler.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::services::analysis::indicators::{self, Indicator};
use crate::services::analysis::{self, latest::round_to, pipeline};
use crate::services::analysis::{ClassifierFeatureAdapter, FeatureError};
use crate::services::classifier::{Classifier, ClassifierError, ClassifierVerdict};
use crate::services::market_data::{fetch_with_timeout, HistoryRequest, PriceHistoryProvider};
use crate::services::SqliteStore;
use crate::types::{
    AiVerdict, AnalysisResult, ChartData, ChartPoint, IndicatorKind, IndicatorSelection,
    ScreenerFilter, ScreenerHit, Series, StockRow,
};

/// Rows returned by [`AnalysisService::chart_data`].
pub const CHART_POINTS: usize = 100;

/// Analysis pipeline wired to a price provider, an optional classifier and
/// an optional history store.
#[derive(Clone)]
pub struct AnalysisService {
    provider: Arc<dyn PriceHistoryProvider>,
    classifier: Option<Arc<dyn Classifier>>,
    store: Option<Arc<SqliteStore>>,
    fetch_timeout: Duration,
}

impl AnalysisService {
    pub fn new(provider: Arc<dyn PriceHistoryProvider>, fetch_timeout: Duration) -> Self {
        Self {
            provider,
            classifier: None,
            store: None,
            fetch_timeout,
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_store(mut self, store: Arc<SqliteStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Fetch bars for `symbol`. An empty response is reported as no data.
    pub async fn fetch_series(&self, symbol: &str, request: &HistoryRequest) -> Result<Series> {
        let symbol = symbol.to_uppercase();
        let bars =
            fetch_with_timeout(self.provider.as_ref(), &symbol, request, self.fetch_timeout)
                .await?;
        if bars.is_empty() {
            return Err(analysis::AnalysisError::NoData(symbol).into());
        }
        debug!("Fetched {} bars for {}", bars.len(), symbol);
        Ok(Series::new(bars))
    }

    /// Full analysis of `symbol`, with an `ai` verdict when a classifier is
    /// configured.
    pub async fn analyze(
        &self,
        symbol: &str,
        request: &HistoryRequest,
        selection: &IndicatorSelection,
    ) -> Result<AnalysisResult> {
        let series = self.fetch_series(symbol, request).await?;
        let mut result = analysis::analyze(symbol, &series, selection)?;
        if self.classifier.is_some() {
            result.ai = Some(self.ai_verdict(&series).await);
        }
        Ok(result)
    }

    /// Classifier verdict as attached to an analysis; failures become
    /// `{"error": ...}` instead of failing the request.
    async fn ai_verdict(&self, series: &Series) -> AiVerdict {
        match self.classify_series(series).await {
            Ok(verdict) => AiVerdict::Prediction {
                signal: verdict.signal,
                confidence: verdict.confidence,
            },
            Err(e) => {
                warn!("Classifier failed: {}", e);
                AiVerdict::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn classify_series(
        &self,
        series: &Series,
    ) -> std::result::Result<ClassifierVerdict, ClassifierError> {
        let Some(classifier) = &self.classifier else {
            return Err(ClassifierError::Http("no classifier configured".into()));
        };
        let features = ClassifierFeatureAdapter
            .features(series)
            .map_err(|FeatureError::Missing(names)| ClassifierError::Features(names.join(", ")))?;
        classifier.classify(&features).await
    }

    /// Classifier verdict for the last six months of daily bars.
    pub async fn predict(&self, symbol: &str) -> Result<ClassifierVerdict> {
        if self.classifier.is_none() {
            return Err(AppError::ServiceUnavailable(
                "No classifier configured".to_string(),
            ));
        }
        let series = self
            .fetch_series(symbol, &HistoryRequest::period("6mo", "1d"))
            .await?;
        self.classify_series(&series).await.map_err(|e| match e {
            ClassifierError::Features(_) => AppError::BadRequest(e.to_string()),
            _ => AppError::ExternalApi(e.to_string()),
        })
    }

    /// Store an analysis for `username`. Failures are logged, never returned.
    pub fn record_history(
        &self,
        username: &str,
        result: &AnalysisResult,
        selection: &IndicatorSelection,
    ) {
        let Some(store) = &self.store else {
            return;
        };
        let json = match serde_json::to_value(result) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize analysis for history: {}", e);
                return;
            }
        };
        if let Err(e) = store.save_analysis(username, &result.symbol, &selection.joined(), &json) {
            warn!("Failed to save analysis history for {}: {}", username, e);
        }
    }

    /// Daily price table with SMA/EMA/RSI/MACD; rows with any undefined
    /// value are dropped.
    pub async fn stock_table(&self, symbol: &str, request: &HistoryRequest) -> Result<Vec<StockRow>> {
        let series = self.fetch_series(symbol, request).await?;
        let selection = IndicatorSelection::from_names(["sma", "ema", "rsi", "macd"]);
        let augmented = pipeline::apply(&series, &selection);

        let rows = augmented
            .bars()
            .iter()
            .enumerate()
            .filter_map(|(i, bar)| {
                Some(StockRow {
                    date: bar.date,
                    close: bar.close,
                    sma_20: augmented.value("SMA_20", i)?,
                    ema_20: augmented.value("EMA_20", i)?,
                    rsi_14: augmented.value("RSI_14", i)?,
                    macd: augmented.value("MACD", i)?,
                    macd_signal: augmented.value("MACD_signal", i)?,
                })
            })
            .collect();
        Ok(rows)
    }

    /// Last [`CHART_POINTS`] days of close, SMA(20) and Bollinger bands over
    /// six months of history.
    pub async fn chart_data(&self, symbol: &str) -> Result<ChartData> {
        let series = self
            .fetch_series(symbol, &HistoryRequest::period("6mo", "1d"))
            .await?;
        let augmented = indicators::BollingerBands::default().apply(&series);

        let skip = augmented.len().saturating_sub(CHART_POINTS);
        let points = augmented
            .bars()
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(i, bar)| ChartPoint {
                date: bar.date,
                close: bar.close,
                sma: augmented.value("Bollinger_Mid", i),
                bollinger_upper: augmented.value("Bollinger_Upper", i),
                bollinger_lower: augmented.value("Bollinger_Lower", i),
            })
            .collect();

        Ok(ChartData {
            symbol: symbol.to_uppercase(),
            points,
        })
    }

    /// Screen `symbols` on three months of daily bars. Symbols that fail to
    /// fetch are skipped.
    pub async fn screen(&self, symbols: &[String], filter: &ScreenerFilter) -> Vec<ScreenerHit> {
        let selection = IndicatorSelection::from_names([
            IndicatorKind::Sma.id(),
            IndicatorKind::Rsi.id(),
            IndicatorKind::Macd.id(),
        ]);
        let request = HistoryRequest::period("3mo", "1d");

        let mut hits = Vec::new();
        for symbol in symbols {
            let series = match self.fetch_series(symbol, &request).await {
                Ok(series) => series,
                Err(e) => {
                    debug!("Screener skipping {}: {}", symbol, e);
                    continue;
                }
            };
            let augmented = pipeline::apply(&series, &selection);
            let round = |v: Option<f64>| v.map(|v| round_to(v, 2));
            let hit = ScreenerHit {
                symbol: symbol.to_uppercase(),
                close: round(augmented.latest("Close")),
                rsi: round(augmented.latest("RSI_14")),
                macd: round(augmented.latest("MACD")),
                sma: round(augmented.latest("SMA_20")),
            };
            if filter.matches(&hit) {
                hits.push(hit);
            }
        }

        info!("Screener matched {} of {} symbols", hits.len(), symbols.len());
        hits
    }
}
