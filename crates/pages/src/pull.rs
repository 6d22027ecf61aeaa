use core_types::PriceSeries;
use history_source::CoinHistory;
use publisher::{Cell, Table};

/// The raw pulled history of one coin, one row per upstream observation,
/// published unreduced so the pages can be rebuilt from the bucket alone.
pub fn coin_history_table(history: &CoinHistory) -> Table {
    let mut table = Table::new(
        format!("coingecko-coin-history-24h-{}", history.asset),
        vec![
            "price(usd)".to_string(),
            "market_cap(usd)".to_string(),
            "volume(usd)".to_string(),
        ],
    );

    for point in &history.points {
        table.push_row(
            point.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            vec![
                Cell::Float(point.price),
                Cell::Float(point.market_cap),
                Cell::Float(point.volume),
            ],
        );
    }

    table
}

/// The raw pulled daily close history of one stock, index, or commodity.
pub fn stock_history_table(series: &PriceSeries) -> Table {
    let mut table = Table::new(
        format!("fmp-stock-history-24h-{}", series.asset()),
        vec!["close".to_string()],
    );

    for point in series.points() {
        table.push_row(point.date.to_string(), vec![Cell::Float(point.price)]);
    }

    table
}
