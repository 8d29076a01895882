// Sales analysis - summary cards, text chart, inventory alerts

use crate::chart::MonthlySeries;
use crate::entities::{InventoryLedger, ProductRegistry};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Month counts as high volume above this multiple of the average
pub const HIGH_VOLUME_FACTOR: f64 = 1.5;

/// Window used to estimate average monthly sales for alerts
pub const ALERT_WINDOW_MONTHS: u32 = 6;

/// Alert thresholds never drop below this
pub const MIN_ALERT_THRESHOLD: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total: u64,
    pub average: f64,
    pub max: u32,
    pub peak_month: String,
    pub high_volume_months: Vec<String>,
}

impl AnalysisSummary {
    /// `None` for an empty series
    pub fn from_series(series: &MonthlySeries) -> Option<Self> {
        let peak = series.arg_max()?;
        let total = series.total();
        let average = total as f64 / series.len() as f64;

        let high_volume_months = series
            .points()
            .iter()
            .filter(|p| f64::from(p.value) > average * HIGH_VOLUME_FACTOR)
            .map(|p| p.label.clone())
            .collect();

        Some(AnalysisSummary {
            total,
            average,
            max: series.points()[peak].value,
            peak_month: series.points()[peak].label.clone(),
            high_volume_months,
        })
    }
}

/// Plain-text rendering of a series: one block per 10 units
pub fn text_chart(title: &str, series: &MonthlySeries, unit: &str) -> String {
    let mut out = format!("{}\n\n", title);

    for point in series.points() {
        let bar = "█".repeat((point.value / 10) as usize);
        out.push_str(&format!("{:>3}: {:>4} {} {}\n", point.label, point.value, unit, bar));
    }

    match AnalysisSummary::from_series(series) {
        Some(summary) => {
            out.push_str(&format!("\nTotal:        {} {}\n", summary.total, unit));
            out.push_str(&format!("Monthly avg:  {:.1} {}\n", summary.average, unit));
            out.push_str(&format!("Highest:      {} {}\n", summary.max, unit));
            out.push_str(&format!("Peak month:   {}\n", summary.peak_month));
            if !summary.high_volume_months.is_empty() {
                out.push_str(&format!(
                    "High volume:  {}\n",
                    summary.high_volume_months.join(", ")
                ));
            }
        }
        None => out.push_str("No data\n"),
    }

    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Normal,
    Low,
    Critical,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Normal => "normal",
            AlertLevel::Low => "low",
            AlertLevel::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryAlert {
    pub product_id: u32,
    pub name: String,
    pub unit: String,
    pub current_stock: u32,
    pub average_monthly_sales: u32,
    pub alert_threshold: u32,
    pub recommended_purchase: u32,
    pub level: AlertLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertSummary {
    pub total_products: usize,
    pub low_stock: usize,
    pub critical_stock: usize,
    pub average_stock: u32,
    pub total_recommended_purchase: u64,
}

/// Per-product stock alerts based on outbound volume over the last six months
pub fn inventory_alerts(
    products: &ProductRegistry,
    ledger: &InventoryLedger,
    today: NaiveDate,
) -> Vec<InventoryAlert> {
    let since = today
        .checked_sub_months(Months::new(ALERT_WINDOW_MONTHS))
        .unwrap_or(NaiveDate::MIN);

    let mut alerts: Vec<InventoryAlert> = products
        .all()
        .iter()
        .map(|product| {
            let sold: u32 = ledger.outbound_since(product.id, since).iter().sum();
            let average = (f64::from(sold) / f64::from(ALERT_WINDOW_MONTHS)).round() as u32;
            let threshold = MIN_ALERT_THRESHOLD.max((f64::from(average) * 0.5).round() as u32);
            let recommended = (i64::from(threshold) - i64::from(product.stock)
                + i64::from(average) * 2)
                .max(0) as u32;

            let level = if product.stock == 0 {
                AlertLevel::Critical
            } else if product.stock <= threshold {
                AlertLevel::Low
            } else {
                AlertLevel::Normal
            };

            InventoryAlert {
                product_id: product.id,
                name: product.name.clone(),
                unit: product.unit.clone(),
                current_stock: product.stock,
                average_monthly_sales: average,
                alert_threshold: threshold,
                recommended_purchase: recommended,
                level,
            }
        })
        .collect();

    alerts.sort_by(|a, b| a.name.cmp(&b.name));
    alerts
}

pub fn summarize_alerts(alerts: &[InventoryAlert]) -> AlertSummary {
    let total_products = alerts.len();
    let stock_sum: u64 = alerts.iter().map(|a| u64::from(a.current_stock)).sum();
    let average_stock = if total_products > 0 {
        (stock_sum as f64 / total_products as f64).round() as u32
    } else {
        0
    };

    AlertSummary {
        total_products,
        low_stock: alerts.iter().filter(|a| a.level == AlertLevel::Low).count(),
        critical_stock: alerts.iter().filter(|a| a.level == AlertLevel::Critical).count(),
        average_stock,
        total_recommended_purchase: alerts.iter().map(|a| u64::from(a.recommended_purchase)).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Direction, InventoryRecord, NewProduct};

    fn reference_series() -> MonthlySeries {
        MonthlySeries::calendar([120, 95, 180, 160, 140, 110, 130, 150, 125, 135, 145, 100])
    }

    #[test]
    fn test_summary_cards() {
        let summary = AnalysisSummary::from_series(&reference_series()).unwrap();
        assert_eq!(summary.total, 1590);
        assert_eq!(summary.average, 132.5);
        assert_eq!(summary.max, 180);
        assert_eq!(summary.peak_month, "Mar");
        // 1.5 * 132.5 = 198.75, nothing exceeds it
        assert!(summary.high_volume_months.is_empty());
    }

    #[test]
    fn test_high_volume_months() {
        let series = MonthlySeries::calendar([10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 100]);
        let summary = AnalysisSummary::from_series(&series).unwrap();
        assert_eq!(summary.high_volume_months, vec!["Dec".to_string()]);
        assert!(AnalysisSummary::from_series(&MonthlySeries::empty()).is_none());
    }

    #[test]
    fn test_text_chart_bars() {
        let text = text_chart("Supermarket A - 2024", &reference_series(), "box");
        assert!(text.starts_with("Supermarket A - 2024"));
        assert!(text.contains(&format!("Mar:  180 box {}", "█".repeat(18))));
        assert!(text.contains("Peak month:   Mar"));
        assert!(text_chart("empty", &MonthlySeries::empty(), "box").contains("No data"));
    }

    #[test]
    fn test_inventory_alert_levels() {
        let mut products = ProductRegistry::with_defaults();
        products.add(NewProduct {
            name: "Kiwi".to_string(),
            sku: "KIW001".to_string(),
            description: String::new(),
            stock: 0,
            unit: "box".to_string(),
        });

        let mut ledger = InventoryLedger::new();
        let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        // 120 apples over the window -> 20 / month
        ledger.push(InventoryRecord::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            1,
            "Apple".to_string(),
            Direction::Outbound,
            120,
            Some("Mall E".to_string()),
            String::new(),
        ));
        // outside the window
        ledger.push(InventoryRecord::new(
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            1,
            "Apple".to_string(),
            Direction::Outbound,
            600,
            Some("Mall E".to_string()),
            String::new(),
        ));

        let alerts = inventory_alerts(&products, &ledger, today);
        let apple = alerts.iter().find(|a| a.name == "Apple").unwrap();
        assert_eq!(apple.average_monthly_sales, 20);
        assert_eq!(apple.alert_threshold, 10);
        assert_eq!(apple.recommended_purchase, 0);
        assert_eq!(apple.level, AlertLevel::Normal);

        let strawberry = alerts.iter().find(|a| a.name == "Strawberry").unwrap();
        assert_eq!(strawberry.level, AlertLevel::Normal);
        assert_eq!(strawberry.recommended_purchase, 0);

        let kiwi = alerts.iter().find(|a| a.name == "Kiwi").unwrap();
        assert_eq!(kiwi.level, AlertLevel::Critical);
        assert_eq!(kiwi.recommended_purchase, 10);

        let summary = summarize_alerts(&alerts);
        assert_eq!(summary.total_products, 6);
        assert_eq!(summary.critical_stock, 1);
        assert_eq!(summary.low_stock, 0);
        assert_eq!(summary.total_recommended_purchase, 10);
    }

    #[test]
    fn test_renamed_product_keeps_sales_history() {
        let mut products = ProductRegistry::with_defaults();
        let mut ledger = InventoryLedger::new();
        ledger.push(InventoryRecord::new(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            1,
            "Apple".to_string(),
            Direction::Outbound,
            120,
            Some("Mall E".to_string()),
            String::new(),
        ));

        let apple = products.find_by_id(1).unwrap().clone();
        products
            .update(
                1,
                NewProduct {
                    name: "Red Apple".to_string(),
                    sku: apple.sku,
                    description: apple.description,
                    stock: apple.stock,
                    unit: apple.unit,
                },
            )
            .unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let alerts = inventory_alerts(&products, &ledger, today);
        let renamed = alerts.iter().find(|a| a.name == "Red Apple").unwrap();
        assert_eq!(renamed.average_monthly_sales, 20);
        assert_eq!(renamed.alert_threshold, 10);
    }

    #[test]
    fn test_low_stock_alert() {
        let mut products = ProductRegistry::new();
        products.add(NewProduct {
            name: "Pear".to_string(),
            sku: String::new(),
            description: String::new(),
            stock: 8,
            unit: "box".to_string(),
        });
        let alerts = inventory_alerts(&products, &InventoryLedger::new(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(alerts[0].level, AlertLevel::Low);
        assert_eq!(alerts[0].recommended_purchase, 2);
    }
}
