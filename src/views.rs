// 🧭 View State - one plain struct per screen
//
// The TUI draws from these and the key handlers mutate them. Nothing here
// touches the terminal, so every screen's behavior is testable without one.

use crate::analysis::AnalysisSummary;
use crate::chart::{ChartDataProvider, MonthlySeries};
use crate::entities::{
    Direction, InventoryLedger, InventoryRecord, Merchant, MerchantRegistry, Product,
    ProductRegistry,
};
use crate::error::{CrmError, InventoryError, Result};
use crate::store::CrmStore;
use crate::theme::ThemeManager;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

// ============================================================================
// NAVIGATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Page {
    Dashboard,
    Products,
    Merchants,
    Inventory,
    Analysis,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Dashboard,
        Page::Products,
        Page::Merchants,
        Page::Inventory,
        Page::Analysis,
    ];

    pub fn next(&self) -> Self {
        let i = self.index();
        Page::ALL[(i + 1) % Page::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let i = self.index();
        Page::ALL[(i + Page::ALL.len() - 1) % Page::ALL.len()]
    }

    pub fn index(&self) -> usize {
        match self {
            Page::Dashboard => 0,
            Page::Products => 1,
            Page::Merchants => 2,
            Page::Inventory => 3,
            Page::Analysis => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Page::ALL.get(index).copied()
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Dashboard => "🏠 Dashboard",
            Page::Products => "📦 Products",
            Page::Merchants => "🏪 Merchants",
            Page::Inventory => "📊 Inventory",
            Page::Analysis => "📈 Sales Analysis",
        }
    }
}

/// Navigation panel: current page plus the theme toggle caption
#[derive(Debug, Clone, Serialize)]
pub struct NavigationView {
    pub page: Page,
    pub toggle_label: String,
}

impl NavigationView {
    pub fn new(page: Page, theme: &ThemeManager) -> Self {
        NavigationView {
            page,
            toggle_label: theme.toggle_label().to_string(),
        }
    }
}

// ============================================================================
// DASHBOARD
// ============================================================================

pub const WELCOME_CAPTION: &str = "Welcome to Mini CRM";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCard {
    pub page: Page,
    pub title: String,
    pub description: String,
    pub count: usize,
    pub count_label: String,
}

/// Feature cards with counts taken from the live store
pub fn dashboard_cards(store: &CrmStore) -> Vec<DashboardCard> {
    let outbound = store
        .ledger
        .records()
        .iter()
        .filter(|r| r.direction == Direction::Outbound)
        .count();

    let card = |page: Page, title: &str, description: &str, count: usize, label: &str| DashboardCard {
        page,
        title: title.to_string(),
        description: description.to_string(),
        count,
        count_label: label.to_string(),
    };

    vec![
        card(
            Page::Products,
            "Product Management",
            "Manage product information, stock and units",
            store.products.count(),
            "products",
        ),
        card(
            Page::Merchants,
            "Merchant Management",
            "Manage merchant contacts and addresses",
            store.merchants.count(),
            "merchants",
        ),
        card(
            Page::Inventory,
            "Inventory Management",
            "Record inbound and outbound stock movements",
            store.ledger.len(),
            "records",
        ),
        card(
            Page::Analysis,
            "Sales Analysis",
            "Monthly purchase trends per merchant",
            outbound,
            "sales",
        ),
    ]
}

// ============================================================================
// LIST SELECTION
// ============================================================================

fn step_selection(selected: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (selected + 1) % len
    } else {
        (selected + len - 1) % len
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductsView {
    pub search: String,
    pub selected: usize,
}

impl ProductsView {
    pub fn rows<'a>(&self, registry: &'a ProductRegistry) -> Vec<&'a Product> {
        registry.search(&self.search)
    }

    pub fn selected_product<'a>(&self, registry: &'a ProductRegistry) -> Option<&'a Product> {
        self.rows(registry).get(self.selected).copied()
    }

    pub fn select_next(&mut self, registry: &ProductRegistry) {
        self.selected = step_selection(self.selected, self.rows(registry).len(), true);
    }

    pub fn select_previous(&mut self, registry: &ProductRegistry) {
        self.selected = step_selection(self.selected, self.rows(registry).len(), false);
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.to_string();
        self.selected = 0;
    }

    /// Keep the cursor inside the table after a delete or a new search
    pub fn clamp(&mut self, registry: &ProductRegistry) {
        let len = self.rows(registry).len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MerchantsView {
    pub search: String,
    pub selected: usize,
}

impl MerchantsView {
    pub fn rows<'a>(&self, registry: &'a MerchantRegistry) -> Vec<&'a Merchant> {
        registry.search(&self.search)
    }

    pub fn selected_merchant<'a>(&self, registry: &'a MerchantRegistry) -> Option<&'a Merchant> {
        self.rows(registry).get(self.selected).copied()
    }

    pub fn select_next(&mut self, registry: &MerchantRegistry) {
        self.selected = step_selection(self.selected, self.rows(registry).len(), true);
    }

    pub fn select_previous(&mut self, registry: &MerchantRegistry) {
        self.selected = step_selection(self.selected, self.rows(registry).len(), false);
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.to_string();
        self.selected = 0;
    }

    pub fn clamp(&mut self, registry: &MerchantRegistry) {
        let len = self.rows(registry).len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}

// ============================================================================
// INVENTORY
// ============================================================================

/// Days covered by the default record query
pub const DEFAULT_QUERY_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InventoryTab {
    Operation,
    Records,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RangeEdge {
    Start,
    End,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryView {
    pub tab: InventoryTab,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub editing: RangeEdge,
    pub selected: usize,
}

impl InventoryView {
    pub fn new(today: NaiveDate) -> Self {
        InventoryView {
            tab: InventoryTab::Operation,
            start: today - Duration::days(DEFAULT_QUERY_DAYS),
            end: today,
            editing: RangeEdge::Start,
            selected: 0,
        }
    }

    pub fn toggle_tab(&mut self) {
        self.tab = match self.tab {
            InventoryTab::Operation => InventoryTab::Records,
            InventoryTab::Records => InventoryTab::Operation,
        };
    }

    pub fn toggle_edge(&mut self) {
        self.editing = match self.editing {
            RangeEdge::Start => RangeEdge::End,
            RangeEdge::End => RangeEdge::Start,
        };
    }

    /// Move the edited range edge by whole days
    pub fn shift(&mut self, days: i64) {
        let delta = Duration::days(days);
        match self.editing {
            RangeEdge::Start => self.start += delta,
            RangeEdge::End => self.end += delta,
        }
        self.selected = 0;
    }

    pub fn records<'a>(
        &self,
        ledger: &'a InventoryLedger,
    ) -> std::result::Result<Vec<&'a InventoryRecord>, InventoryError> {
        ledger.query(self.start, self.end)
    }

    pub fn select_next(&mut self, len: usize) {
        self.selected = step_selection(self.selected, len, true);
    }

    pub fn select_previous(&mut self, len: usize) {
        self.selected = step_selection(self.selected, len, false);
    }
}

// ============================================================================
// SALES ANALYSIS
// ============================================================================

pub const ANALYSIS_YEARS: [i32; 3] = [2024, 2023, 2022];

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisView {
    /// Index into the merchant names; `None` until one is picked
    pub merchant: Option<usize>,
    pub year_index: usize,
    pub series: Option<MonthlySeries>,
    pub summary: Option<AnalysisSummary>,
    /// Title of the last generated chart
    pub title: String,
}

impl AnalysisView {
    pub fn year(&self) -> i32 {
        ANALYSIS_YEARS[self.year_index % ANALYSIS_YEARS.len()]
    }

    pub fn cycle_year(&mut self) {
        self.year_index = (self.year_index + 1) % ANALYSIS_YEARS.len();
    }

    pub fn select_next_merchant(&mut self, count: usize) {
        if count == 0 {
            self.merchant = None;
            return;
        }
        self.merchant = Some(match self.merchant {
            None => 0,
            Some(i) => (i + 1) % count,
        });
    }

    pub fn select_previous_merchant(&mut self, count: usize) {
        if count == 0 {
            self.merchant = None;
            return;
        }
        self.merchant = Some(match self.merchant {
            None => count - 1,
            Some(i) => (i + count - 1) % count,
        });
    }

    pub fn merchant_name<'a>(&self, merchants: &'a [String]) -> Option<&'a str> {
        self.merchant
            .and_then(|i| merchants.get(i))
            .map(String::as_str)
    }

    /// Fetch the series for the selected merchant and year
    pub fn generate(
        &mut self,
        merchants: &[String],
        provider: &dyn ChartDataProvider,
    ) -> Result<&MonthlySeries> {
        let merchant = self
            .merchant_name(merchants)
            .ok_or(CrmError::NoMerchantSelected)?
            .to_string();
        let year = self.year();

        let series = provider.monthly_series(&merchant, year)?;
        log::info!("analysis generated for {} / {}", merchant, year);

        self.title = format!("{} - {} monthly purchases", merchant, year);
        self.summary = AnalysisSummary::from_series(&series);
        Ok(self.series.insert(series))
    }
}
