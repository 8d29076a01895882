// Mini CRM - Core Library
// Exposes all modules for use in the TUI, the API server, and tests

pub mod analysis;
pub mod chart;
pub mod config;
pub mod entities;
pub mod error;
pub mod forms;
pub mod logging;
pub mod store;
pub mod theme;
pub mod views;

// Re-export commonly used types
pub use analysis::{
    inventory_alerts, summarize_alerts, text_chart, AlertLevel, AlertSummary, AnalysisSummary,
    InventoryAlert,
};
pub use chart::{
    compute_geometry, ChartDataProvider, ChartGeometry, ChartOptions, ChartPalette, ChartSurface,
    DrawCommand, LedgerTrendProvider, LineChartRenderer, MockTrendProvider, MonthlySeries,
    Viewport,
};
pub use config::AppConfig;
pub use entities::{
    Direction, InventoryLedger, InventoryRecord, Merchant, MerchantKind, MerchantRegistry,
    NewMerchant, NewProduct, Product, ProductRegistry,
};
pub use error::{ChartError, CrmError, FormError, InventoryError};
pub use forms::{Form, FormKind, FormMode};
pub use store::{CrmStore, StockOperation};
pub use theme::{ThemeKind, ThemeManager};
pub use views::Page;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
