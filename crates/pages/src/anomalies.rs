use crate::ath::percent_drawdown;
use crate::error::PageError;
use crate::stablecoins::latest_supply_change;
use alerter::TelegramAlerter;
use configuration::{AnomalyRule, MetricKind};
use core_types::AssetId;
use history_source::{load_price_series, HistorySource, LoadError, MarketHistorySource};
use publisher::{Cell, PublishSink, Table};

/// Generates and publishes the anomaly page: every configured rule is
/// evaluated against the current data, breaches are pushed through the
/// alerter, and the full status table is published.
///
/// A rule whose metric cannot be evaluated (failed load, undefined value)
/// gets an empty "Current Level" cell and no alert; alert delivery failures
/// are logged and never fatal.
pub async fn generate_anomaly_page(
    source: &dyn HistorySource,
    market: &dyn MarketHistorySource,
    sink: &dyn PublishSink,
    alerter: Option<&TelegramAlerter>,
    rules: &[AnomalyRule],
) -> Result<Table, PageError> {
    let mut table = Table::new(
        "marketdash-anomaly-status",
        vec![
            "Metric".to_string(),
            "Threshold".to_string(),
            "Current Level".to_string(),
            "Description".to_string(),
        ],
    );

    for rule in rules {
        let current_level = match evaluate_metric(source, market, rule).await {
            Ok(level) => level,
            Err(e) => {
                tracing::warn!(rule = %rule.name, error = %e, "could not evaluate anomaly rule");
                None
            }
        };

        if let Some(level) = current_level {
            if level > rule.threshold {
                tracing::warn!(
                    rule = %rule.name,
                    level,
                    threshold = rule.threshold,
                    "anomaly threshold crossed"
                );
                if let Some(alerter) = alerter {
                    if let Err(e) = alerter.send_breach(&rule.name, level, rule.threshold).await {
                        tracing::error!(rule = %rule.name, error = %e, "failed to send alert");
                    }
                }
            }
        }

        table.push_row(
            rule.name.clone(),
            vec![
                Cell::from(metric_label(rule.metric)),
                Cell::from(rule.threshold),
                Cell::from(current_level),
                Cell::from(rule.description.as_str()),
            ],
        );
    }

    sink.publish(&table).await?;
    Ok(table)
}

/// The current value of one rule's metric; `None` when the data exists but
/// the metric is undefined over it.
async fn evaluate_metric(
    source: &dyn HistorySource,
    market: &dyn MarketHistorySource,
    rule: &AnomalyRule,
) -> Result<Option<f64>, LoadError> {
    let asset = AssetId::new(rule.asset.clone());
    match rule.metric {
        MetricKind::AthDrawdown => {
            let series = load_price_series(source, &asset).await?;
            Ok(percent_drawdown(&series))
        }
        MetricKind::SupplyChange24h => {
            let history = market.fetch_market_history(&asset).await?;
            Ok(latest_supply_change(&history))
        }
    }
}

fn metric_label(metric: MetricKind) -> &'static str {
    match metric {
        MetricKind::AthDrawdown => "ath_drawdown",
        MetricKind::SupplyChange24h => "supply_change_24h",
    }
}
