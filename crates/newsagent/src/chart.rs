//! Price history with news overlaid, and a plain-text renderer for it

use crate::aligner::{AlignedEvent, EventAligner};
use crate::error::{NewsError, Result};
use crate::models::PriceBar;
use crate::price::KNOWN_COINS;
use crate::source::DataSource;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing::{debug, warn};

/// Ticker charted when the query names none
pub const DEFAULT_CHART_TICKER: &str = "BTC-USD";

/// Days of history charted by default
pub const DEFAULT_CHART_DAYS: u32 = 365;

/// Reply when there is no price series to draw
pub const NO_CHART_DATA: &str = "No price data available to display.";

/// Reply when the renderer fails
pub const CHART_UNAVAILABLE: &str = "Unable to display the graph right now.";

/// Everything needed to draw one chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOverlay {
    pub ticker: String,
    pub days: u32,
    pub series: Vec<PriceBar>,
    pub events: Vec<AlignedEvent>,
    /// Articles left off the chart for lack of a date
    pub rejected: usize,
}

impl ChartOverlay {
    /// Fetch prices and news and snap the news onto the price dates
    ///
    /// Fails with `EmptyReference` when there are no prices to draw.
    pub async fn build(
        source: &dyn DataSource,
        ticker: &str,
        days: u32,
        today: NaiveDate,
    ) -> Result<Self> {
        let start = today - Duration::days(i64::from(days));
        let series = source.fetch_prices(ticker, start, today).await;
        if series.is_empty() {
            return Err(NewsError::EmptyReference);
        }

        let aligner = EventAligner::from_prices(&series)?;
        let articles = source.fetch_news().await;
        let (events, rejected) = aligner.align_articles(&articles);
        debug!(
            "Chart for {ticker}: {} bars, {} events, {} rejected",
            series.len(),
            events.len(),
            rejected
        );

        Ok(Self {
            ticker: ticker.to_string(),
            days,
            series,
            events,
            rejected,
        })
    }
}

/// Displays a chart overlay
pub trait GraphRenderer: Send + Sync {
    fn render(&self, overlay: &ChartOverlay) -> Result<()>;
}

/// Human name of a chart, e.g. "Bitcoin (BTC-USD) over the past year"
pub fn chart_caption(ticker: &str, days: u32) -> String {
    let symbol = ticker.split('-').next().unwrap_or(ticker);
    let name = KNOWN_COINS
        .iter()
        .find(|(_, t)| t.eq_ignore_ascii_case(symbol))
        .map_or_else(
            || symbol.to_string(),
            |(name, _)| {
                let mut chars = name.chars();
                chars
                    .next()
                    .map(|c| c.to_uppercase().chain(chars).collect())
                    .unwrap_or_default()
            },
        );
    let span = if days == 365 {
        "the past year".to_string()
    } else {
        format!("the past {days} days")
    };
    format!("{name} ({ticker}) over {span}")
}

/// Build the overlay, hand it to `renderer` and describe the outcome
///
/// Never fails: a missing series or a renderer error becomes a reply.
pub async fn graph_reply(
    source: &dyn DataSource,
    ticker: &str,
    days: u32,
    today: NaiveDate,
    renderer: &dyn GraphRenderer,
) -> String {
    let overlay = match ChartOverlay::build(source, ticker, days, today).await {
        Ok(overlay) => overlay,
        Err(NewsError::EmptyReference) => return NO_CHART_DATA.to_string(),
        Err(e) => {
            warn!("Chart for {ticker} failed: {e}");
            return NO_CHART_DATA.to_string();
        }
    };

    if let Err(e) = renderer.render(&overlay) {
        warn!("Rendering the chart failed: {e}");
        return CHART_UNAVAILABLE.to_string();
    }
    format!("Displaying the graph for {}.", chart_caption(ticker, days))
}

/// Draws the overlay as text on stdout
///
/// The price line is a sparkline bucketed to `width` columns, followed by the
/// articles split into two columns.
#[derive(Debug, Clone)]
pub struct TextChartRenderer {
    width: usize,
}

impl Default for TextChartRenderer {
    fn default() -> Self {
        Self { width: 60 }
    }
}

const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

impl TextChartRenderer {
    /// Renderer with a custom sparkline width
    pub fn with_width(width: usize) -> Self {
        Self { width: width.max(1) }
    }

    /// Render to a string
    pub fn draw(&self, overlay: &ChartOverlay) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} closing price, last {} days",
            overlay.ticker, overlay.days
        );

        let closes: Vec<f64> = overlay.series.iter().map(|b| b.close).collect();
        if let (Some(first), Some(last)) = (overlay.series.first(), overlay.series.last()) {
            let (min, max) = closes
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &c| (lo.min(c), hi.max(c)));
            let _ = writeln!(out, "{}", sparkline(&closes, self.width));
            let _ = writeln!(
                out,
                "{} .. {}   low ${min:.2}   high ${max:.2}   last ${:.2}",
                first.timestamp, last.timestamp, last.close
            );
        }

        if overlay.events.is_empty() {
            return out;
        }

        let _ = writeln!(out, "\nNews on the chart:");
        let half = overlay.events.len().div_ceil(2);
        let (left, right) = overlay.events.split_at(half);
        for (i, event) in left.iter().enumerate() {
            let left_cell = event_cell(event);
            match right.get(i) {
                Some(r) => {
                    let _ = writeln!(out, "{left_cell:<50}  {}", event_cell(r));
                }
                None => {
                    let _ = writeln!(out, "{left_cell}");
                }
            }
        }
        if overlay.rejected > 0 {
            let _ = writeln!(out, "({} undated articles not shown)", overlay.rejected);
        }
        out
    }
}

impl GraphRenderer for TextChartRenderer {
    fn render(&self, overlay: &ChartOverlay) -> Result<()> {
        println!("{}", self.draw(overlay));
        Ok(())
    }
}

fn event_cell(event: &AlignedEvent) -> String {
    let title: String = event.event.title.chars().take(36).collect();
    format!("{} {}", event.snapped_date.format("%Y-%m-%d"), title)
}

/// Average closes into at most `width` buckets and map each to a block glyph
fn sparkline(closes: &[f64], width: usize) -> String {
    if closes.is_empty() {
        return String::new();
    }

    let chunk = closes.len().div_ceil(width);
    #[allow(clippy::cast_precision_loss)]
    let buckets: Vec<f64> = closes
        .chunks(chunk)
        .map(|c| c.iter().sum::<f64>() / c.len() as f64)
        .collect();

    let min = buckets.iter().copied().fold(f64::INFINITY, f64::min);
    let max = buckets.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    buckets
        .iter()
        .map(|&v| {
            if span <= f64::EPSILON {
                return SPARK[SPARK.len() / 2];
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let idx = (((v - min) / span) * (SPARK.len() - 1) as f64).round() as usize;
            SPARK[idx.min(SPARK.len() - 1)]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Article, RegulatoryDocument};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    struct FixedSource {
        bars: Vec<PriceBar>,
        articles: Vec<Article>,
    }

    #[async_trait]
    impl DataSource for FixedSource {
        async fn fetch_news(&self) -> Vec<Article> {
            self.articles.clone()
        }

        async fn fetch_prices(&self, _: &str, _: NaiveDate, _: NaiveDate) -> Vec<PriceBar> {
            self.bars.clone()
        }

        async fn fetch_regulatory_news(&self, _: &str, _: u32) -> Vec<RegulatoryDocument> {
            Vec::new()
        }
    }

    fn bar(d: &str, close: f64) -> PriceBar {
        PriceBar { timestamp: date(d), close }
    }

    #[tokio::test]
    async fn test_build_overlay() {
        let source = FixedSource {
            bars: vec![bar("2024-01-01", 100.0), bar("2024-01-03", 110.0)],
            articles: vec![
                Article::new(Some("mid".into()), None, None, Some("2024-01-02T12:00:00Z".into())),
                Article::new(Some("undated".into()), None, None, None),
            ],
        };

        let overlay = ChartOverlay::build(&source, DEFAULT_CHART_TICKER, 365, date("2024-01-03"))
            .await
            .unwrap();
        assert_eq!(overlay.series.len(), 2);
        assert_eq!(overlay.events.len(), 1);
        assert_eq!(overlay.events[0].snapped_date, date("2024-01-01"));
        assert_eq!(overlay.rejected, 1);
    }

    #[tokio::test]
    async fn test_build_overlay_without_prices() {
        let source = FixedSource { bars: Vec::new(), articles: Vec::new() };
        let result = ChartOverlay::build(&source, "BTC-USD", 30, date("2024-01-03")).await;
        assert!(matches!(result, Err(NewsError::EmptyReference)));
    }

    #[derive(Default)]
    struct RecordingRenderer {
        fail: bool,
        rendered: Mutex<Vec<ChartOverlay>>,
    }

    impl GraphRenderer for RecordingRenderer {
        fn render(&self, overlay: &ChartOverlay) -> Result<()> {
            if self.fail {
                return Err(NewsError::Other("no display".into()));
            }
            self.rendered.lock().unwrap().push(overlay.clone());
            Ok(())
        }
    }

    #[test]
    fn test_chart_caption() {
        assert_eq!(chart_caption("BTC-USD", 365), "Bitcoin (BTC-USD) over the past year");
        assert_eq!(chart_caption("SOL-USD", 30), "SOL (SOL-USD) over the past 30 days");
    }

    #[tokio::test]
    async fn test_graph_reply_without_prices() {
        let source = FixedSource { bars: Vec::new(), articles: Vec::new() };
        let renderer = RecordingRenderer::default();

        let reply = graph_reply(&source, DEFAULT_CHART_TICKER, 365, date("2024-01-03"), &renderer).await;
        assert_eq!(reply, NO_CHART_DATA);
        assert!(renderer.rendered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_graph_reply_renders() {
        let source = FixedSource {
            bars: vec![bar("2024-01-01", 100.0), bar("2024-01-03", 110.0)],
            articles: Vec::new(),
        };

        let renderer = RecordingRenderer::default();
        let reply = graph_reply(&source, "ETH-USD", 30, date("2024-01-03"), &renderer).await;
        assert_eq!(reply, "Displaying the graph for Ethereum (ETH-USD) over the past 30 days.");
        assert_eq!(renderer.rendered.lock().unwrap().len(), 1);

        let broken = RecordingRenderer { fail: true, ..Default::default() };
        let reply = graph_reply(&source, "ETH-USD", 30, date("2024-01-03"), &broken).await;
        assert_eq!(reply, CHART_UNAVAILABLE);
    }

    #[test]
    fn test_sparkline() {
        assert_eq!(sparkline(&[], 10), "");
        assert_eq!(sparkline(&[1.0, 2.0, 3.0], 10).chars().count(), 3);
        assert_eq!(sparkline(&[1.0, 8.0], 10), "▁█");
        assert_eq!(sparkline(&[5.0, 5.0], 10), "▅▅");
        assert_eq!(sparkline(&[1.0; 100], 10).chars().count(), 10);
    }

    #[test]
    fn test_draw_splits_events() {
        let event = |title: &str| AlignedEvent {
            event: Article::new(Some(title.into()), None, None, None),
            snapped_date: date("2024-01-01"),
        };
        let overlay = ChartOverlay {
            ticker: "BTC-USD".into(),
            days: 7,
            series: vec![bar("2024-01-01", 1.0), bar("2024-01-02", 2.0)],
            events: vec![event("one"), event("two"), event("three")],
            rejected: 0,
        };

        let text = TextChartRenderer::default().draw(&overlay);
        assert!(text.starts_with("BTC-USD closing price, last 7 days\n"));
        assert!(text.contains("last $2.00"));
        let rows: Vec<&str> = text.lines().skip_while(|l| !l.starts_with("News")).skip(1).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains("one") && rows[0].contains("three"));
        assert!(rows[1].contains("two"));
    }
}
