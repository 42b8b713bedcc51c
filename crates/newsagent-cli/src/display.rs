//! Tables printed by the CLI

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use newsagent::sentiment::{SentimentLabel, SentimentResult};
use newsagent::Article;

/// Characters of a title shown in the dashboard
const TITLE_WIDTH: usize = 60;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// One row per article with its sentiment
pub fn dashboard_table(rows: &[(Article, SentimentResult)]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Title", "URL", "Sentiment", "Polarity"]);

    for (article, result) in rows {
        table.add_row(vec![
            truncate(&article.title, TITLE_WIDTH),
            article.url.clone(),
            result.label.to_string(),
            format!("{:.2}", result.polarity),
        ]);
    }
    table
}

/// Count of articles per sentiment label
pub fn label_breakdown(rows: &[(Article, SentimentResult)]) -> Table {
    let count = |label: SentimentLabel| rows.iter().filter(|(_, r)| r.label == label).count();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Sentiment", "Articles"]);
    for label in [SentimentLabel::Positive, SentimentLabel::Neutral, SentimentLabel::Negative] {
        table.add_row(vec![label.to_string(), count(label).to_string()]);
    }
    table
}

/// Which credentials are loaded
pub fn key_table(report: &[(&str, Option<String>)]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Variable", "Value"]);
    for (name, value) in report {
        table.add_row(vec![
            (*name).to_string(),
            value.clone().unwrap_or_else(|| "not set".to_string()),
        ]);
    }
    table
}
