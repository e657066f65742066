//! Table rendering and formatting for the terminal client

use crate::ranking::RankEntry;
use chrono::NaiveDate;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{CellAlignment, Table};
use moonshot_search::{Prediction, SessionSnapshot, StockItem};

fn base_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(headers);
    table
}

/// Print the current result list, or the matching empty/failed affordance
pub fn print_results(snapshot: &SessionSnapshot) {
    if snapshot.query.trim().is_empty() {
        println!("검색어를 입력하세요.");
        return;
    }
    if snapshot.search_failed {
        println!("검색에 실패했습니다. 다시 입력해 보세요.");
        return;
    }
    if snapshot.results.is_empty() {
        println!("🔎 검색 결과가 없습니다.");
        return;
    }

    let mut table = base_table(vec!["#", "종목코드", "주식명", "국가", "시장"]);
    if let Some(column) = table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    for (i, stock) in snapshot.results.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            stock.stock_id.clone(),
            stock.stock_name.clone(),
            stock.nation_type.clone(),
            stock.market.clone(),
        ]);
    }
    println!("{table}");

    if snapshot.exhausted {
        println!("{}건 (마지막 페이지)", snapshot.results.len());
    } else {
        println!("{}건 — /more 로 다음 페이지", snapshot.results.len());
    }
}

/// Print a fetched prediction for the selected stock
pub fn print_prediction(stock: &StockItem, prediction: &Prediction) {
    let nation = prediction
        .nation_type
        .as_deref()
        .unwrap_or(stock.nation_type.as_str());
    let korean = nation == "한국";

    println!("📈 {} ({})", stock.stock_name, stock.stock_id);
    let trend = prediction.trend.as_deref().unwrap_or("데이터 없음");
    println!("✅ 예측 결과: {trend}");
    if let Some(price) = prediction.predicted_price {
        println!("💰 예측 가격: {}", format_price(price, korean));
    }

    if prediction.chart.is_empty() {
        println!("차트 데이터를 표시할 수 없습니다.");
        return;
    }

    let mut table = base_table(vec!["날짜", "종가", "SMA", "EMA", "선형회귀"]);
    for i in 1..5 {
        if let Some(column) = table.column_mut(i) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    // Rows arrive newest-first; display oldest-first.
    for point in prediction.chart.iter().rev() {
        table.add_row(vec![
            format_date(&point.date),
            format_price(point.close_price, korean),
            format_overlay(point.sma, korean),
            format_overlay(point.ema, korean),
            format_overlay(point.linear, korean),
        ]);
    }
    println!("{table}");
}

/// Print the static most-predicted ranking
pub fn print_ranking(entries: &[RankEntry]) {
    println!("🏆 가장 많이 예측한 주식");
    let mut table = base_table(vec!["순위", "주식명", "횟수"]);
    for entry in entries {
        table.add_row(vec![
            entry.rank.to_string(),
            entry.name.to_string(),
            format!("{}회", entry.count),
        ]);
    }
    println!("{table}");
}

/// Format a `YYYYMMDD` service date for display; malformed dates pass through
fn format_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Format a price with the currency of the stock's nation.
///
/// Korean prices are whole won, everything else two-decimal dollars.
fn format_price(value: f64, korean: bool) -> String {
    if korean {
        format!("₩ {}", group_thousands(&format!("{value:.0}")))
    } else {
        let formatted = format!("{value:.2}");
        let (int_part, frac_part) = formatted
            .split_once('.')
            .unwrap_or((formatted.as_str(), "00"));
        format!("$ {}.{frac_part}", group_thousands(int_part))
    }
}

fn format_overlay(value: Option<f64>, korean: bool) -> String {
    value.map_or_else(|| "-".to_string(), |v| format_price(v, korean))
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}")
}
