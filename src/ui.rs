use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap,
    },
    Frame, Terminal,
};
use std::io;

use mini_crm::chart::{
    ChartOptions, ChartPalette, DrawCommand, LineChartRenderer, MockTrendProvider, TextAnchor,
    Viewport,
};
use mini_crm::forms::{FieldKind, Form, FormKind, FormMode};
use mini_crm::theme::{Palette, Rgb, Section, ThemeManager};
use mini_crm::views::{
    dashboard_cards, AnalysisView, InventoryTab, InventoryView, MerchantsView, NavigationView,
    Page, ProductsView, RangeEdge, ANALYSIS_YEARS, WELCOME_CAPTION,
};
use mini_crm::{AppConfig, CrmError, CrmStore, Direction as StockDirection};

/// Logical chart size; the canvas scales it onto whatever area it gets
const CHART_VIEWPORT: (f64, f64) = (800.0, 400.0);

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub message: String,
    pub is_error: bool,
}

/// Which screen is currently receiving text input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchTarget {
    Products,
    Merchants,
}

pub struct App {
    pub config: AppConfig,
    pub store: CrmStore,
    pub theme: ThemeManager,
    pub current_page: Page,
    pub products: ProductsView,
    pub merchants: MerchantsView,
    pub inventory: InventoryView,
    pub analysis: AnalysisView,
    pub form: Option<Form>,
    pub status: Option<Status>,
    today: NaiveDate,
    search: Option<SearchTarget>,
    provider: MockTrendProvider,
    products_state: TableState,
    merchants_state: TableState,
    records_state: TableState,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self::with_today(config, Local::now().date_naive())
    }

    fn with_today(config: AppConfig, today: NaiveDate) -> Self {
        let theme = ThemeManager::new(config.theme());
        let provider = MockTrendProvider::new(config.chart.jitter);

        Self {
            store: CrmStore::with_mock_data(),
            theme,
            current_page: Page::Dashboard,
            products: ProductsView::default(),
            merchants: MerchantsView::default(),
            inventory: InventoryView::new(today),
            analysis: AnalysisView::default(),
            form: None,
            status: None,
            today,
            search: None,
            provider,
            products_state: TableState::default(),
            merchants_state: TableState::default(),
            records_state: TableState::default(),
            config,
        }
    }

    fn info(&mut self, message: impl Into<String>) {
        self.status = Some(Status {
            message: message.into(),
            is_error: false,
        });
    }

    fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.status = Some(Status {
            message,
            is_error: true,
        });
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    /// Returns true when the app should quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.form.is_some() {
            self.handle_form_key(key);
            return false;
        }
        if let Some(target) = self.search {
            self.handle_search_key(target, key);
            return false;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => self.next_page(),
            KeyCode::BackTab => self.previous_page(),
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                if let Some(page) = Page::from_index(index) {
                    self.current_page = page;
                }
            }
            KeyCode::Char('t') => {
                let kind = self.theme.toggle();
                self.info(format!("Switched to {} theme", kind.as_str()));
            }
            _ => match self.current_page {
                Page::Dashboard => {}
                Page::Products => self.handle_products_key(key),
                Page::Merchants => self.handle_merchants_key(key),
                Page::Inventory => self.handle_inventory_key(key),
                Page::Analysis => self.handle_analysis_key(key),
            },
        }
        false
    }

    fn handle_products_key(&mut self, key: KeyEvent) {
        let registry = &self.store.products;
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.products.select_next(registry),
            KeyCode::Up | KeyCode::Char('k') => self.products.select_previous(registry),
            KeyCode::Char('/') => self.search = Some(SearchTarget::Products),
            KeyCode::Char('a') => self.form = Some(Form::new_product()),
            KeyCode::Char('e') => match self.products.selected_product(registry) {
                Some(product) => self.form = Some(Form::edit_product(product)),
                None => self.error("Select a product to edit"),
            },
            KeyCode::Char('d') => {
                let Some(id) = self.products.selected_product(registry).map(|p| p.id) else {
                    self.error("Select a product to delete");
                    return;
                };
                match self.store.products.remove(id) {
                    Ok(product) => self.info(format!("Deleted product {}", product.name)),
                    Err(e) => self.error(e.to_string()),
                }
                self.products.clamp(&self.store.products);
            }
            _ => {}
        }
    }

    fn handle_merchants_key(&mut self, key: KeyEvent) {
        let registry = &self.store.merchants;
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.merchants.select_next(registry),
            KeyCode::Up | KeyCode::Char('k') => self.merchants.select_previous(registry),
            KeyCode::Char('/') => self.search = Some(SearchTarget::Merchants),
            KeyCode::Char('a') => self.form = Some(Form::new_merchant()),
            KeyCode::Char('e') => match self.merchants.selected_merchant(registry) {
                Some(merchant) => self.form = Some(Form::edit_merchant(merchant)),
                None => self.error("Select a merchant to edit"),
            },
            KeyCode::Char('d') => {
                let Some(id) = self.merchants.selected_merchant(registry).map(|m| m.id) else {
                    self.error("Select a merchant to delete");
                    return;
                };
                match self.store.merchants.remove(id) {
                    Ok(merchant) => self.info(format!("Deleted merchant {}", merchant.name)),
                    Err(e) => self.error(e.to_string()),
                }
                self.merchants.clamp(&self.store.merchants);
            }
            _ => {}
        }
    }

    fn handle_inventory_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') => self.inventory.toggle_tab(),
            KeyCode::Char('n') | KeyCode::Enter if self.inventory.tab == InventoryTab::Operation => {
                self.form = Some(Form::inventory(
                    &self.store.products.names(),
                    &self.store.merchants.names(),
                    self.today,
                ));
            }
            _ if self.inventory.tab == InventoryTab::Records => {
                let len = self
                    .inventory
                    .records(&self.store.ledger)
                    .map(|r| r.len())
                    .unwrap_or(0);
                match key.code {
                    KeyCode::Down | KeyCode::Char('j') => self.inventory.select_next(len),
                    KeyCode::Up | KeyCode::Char('k') => self.inventory.select_previous(len),
                    KeyCode::Char('s') => self.inventory.toggle_edge(),
                    KeyCode::Left => self.inventory.shift(-1),
                    KeyCode::Right => self.inventory.shift(1),
                    KeyCode::PageDown => self.inventory.shift(-30),
                    KeyCode::PageUp => self.inventory.shift(30),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn handle_analysis_key(&mut self, key: KeyEvent) {
        let count = self.store.merchants.count();
        match key.code {
            KeyCode::Right | KeyCode::Char('l') => self.analysis.select_next_merchant(count),
            KeyCode::Left | KeyCode::Char('h') => self.analysis.select_previous_merchant(count),
            KeyCode::Char('y') => self.analysis.cycle_year(),
            KeyCode::Enter | KeyCode::Char('g') => {
                let names = self.store.merchants.names();
                let result = self
                    .analysis
                    .generate(&names, &self.provider)
                    .map(|series| series.len());
                match result {
                    Ok(points) => {
                        let title = self.analysis.title.clone();
                        self.info(format!("{} ({} months)", title, points));
                    }
                    Err(CrmError::NoMerchantSelected) => {
                        self.error("Please select a merchant first (←/→)")
                    }
                    Err(e) => self.error(e.to_string()),
                }
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, target: SearchTarget, key: KeyEvent) {
        let query = match target {
            SearchTarget::Products => &mut self.products.search,
            SearchTarget::Merchants => &mut self.merchants.search,
        };

        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.search = None;
                return;
            }
            KeyCode::Backspace => {
                query.pop();
            }
            KeyCode::Char(c) => query.push(c),
            _ => return,
        }

        // typing restarts the cursor at the first match
        match target {
            SearchTarget::Products => self.products.selected = 0,
            SearchTarget::Merchants => self.merchants.selected = 0,
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.form.as_mut() else {
            return;
        };

        match key.code {
            KeyCode::Esc => {
                self.form = None;
                self.info("Cancelled");
            }
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
            KeyCode::Left => form.cycle_choice(false),
            KeyCode::Right => form.cycle_choice(true),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(' ') if matches!(form.focused().map(|f| &f.kind), Some(FieldKind::Choice(_))) => {
                form.cycle_choice(true)
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => form.insert_char(c),
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let Some(form) = self.form.as_ref() else {
            return;
        };

        let outcome: std::result::Result<String, String> = match form.kind {
            FormKind::Product => form
                .to_new_product()
                .map_err(|e| e.to_string())
                .and_then(|input| match form.mode {
                    FormMode::Create => Ok(format!("Added product {}", self.store.products.add(input).name)),
                    FormMode::Edit(id) => self
                        .store
                        .products
                        .update(id, input)
                        .map(|p| format!("Updated product {}", p.name))
                        .map_err(|e| e.to_string()),
                }),
            FormKind::Merchant => form
                .to_new_merchant()
                .map_err(|e| e.to_string())
                .and_then(|input| match form.mode {
                    FormMode::Create => Ok(format!("Added merchant {}", self.store.merchants.add(input).name)),
                    FormMode::Edit(id) => self
                        .store
                        .merchants
                        .update(id, input)
                        .map(|m| format!("Updated merchant {}", m.name))
                        .map_err(|e| e.to_string()),
                }),
            FormKind::Inventory => form
                .to_stock_operation()
                .map_err(|e| e.to_string())
                .and_then(|operation| {
                    self.store
                        .submit_operation(operation)
                        .map(|r| format!("{} of {} x{} recorded", r.direction.as_str(), r.product, r.quantity))
                        .map_err(|e| e.to_string())
                }),
        };

        match outcome {
            Ok(message) => {
                self.form = None;
                self.info(message);
            }
            // the form stays open so the input can be corrected
            Err(message) => self.error(message),
        }
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn block_style(palette: Palette) -> Style {
    Style::default().fg(color(palette.foreground)).bg(color(palette.background))
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("UI loop failed: {:?}", err);
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let window = app.theme.palette(Section::MainWindow);
    f.render_widget(Block::default().style(block_style(window)), f.size());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Navigation + content
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(0)])
        .split(chunks[1]);

    render_navigation(f, body[0], app);

    match app.current_page {
        Page::Dashboard => render_dashboard(f, body[1], app),
        Page::Products => render_products(f, body[1], app),
        Page::Merchants => render_merchants(f, body[1], app),
        Page::Inventory => render_inventory(f, body[1], app),
        Page::Analysis => render_analysis(f, body[1], app),
    }

    render_status_bar(f, chunks[2], app);

    if let Some(form) = &app.form {
        let area = f.size();
        render_form(f, area, form, app.theme.palette(Section::Cards));
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.theme.palette(Section::MainWindow);
    let spans = vec![
        Span::styled(
            " Mini CRM ",
            Style::default().fg(color(palette.accent)).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::styled(app.current_page.title(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  |  "),
        Span::styled(
            format!("Products: {}", app.store.products.count()),
            Style::default().fg(color(palette.foreground)),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Merchants: {}", app.store.merchants.count()),
            Style::default().fg(color(palette.foreground)),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color(palette.border)))
            .style(block_style(palette)),
    );

    f.render_widget(header, area);
}

fn render_navigation(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.theme.palette(Section::Navigation);
    let nav = NavigationView::new(app.current_page, &app.theme);

    let mut lines = vec![Line::from("")];
    for (i, page) in Page::ALL.iter().enumerate() {
        let style = if *page == nav.page {
            Style::default()
                .fg(color(palette.foreground))
                .bg(color(palette.accent))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color(palette.foreground))
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", i + 1), Style::default().fg(color(palette.hover))),
            Span::styled(format!("{:<18}", page.title()), style),
        ]));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" t ", Style::default().fg(color(palette.hover))),
        Span::styled(nav.toggle_label, Style::default().fg(color(palette.foreground))),
    ]));

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color(palette.border)))
            .style(block_style(palette))
            .title(" Menu "),
    );

    f.render_widget(panel, area);
}

fn render_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let content = app.theme.palette(Section::Content);
    let cards_palette = app.theme.palette(Section::Cards);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let welcome = Paragraph::new(vec![
        Line::from(Span::styled(
            WELCOME_CAPTION,
            Style::default().fg(color(content.accent)).add_modifier(Modifier::BOLD),
        )),
        Line::from("Pick a module from the menu (1-5) or press Tab to cycle."),
    ])
    .block(Block::default().borders(Borders::ALL).style(block_style(content)));
    f.render_widget(welcome, chunks[0]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let cards = dashboard_cards(&app.store);
    for (i, card) in cards.iter().enumerate() {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[i / 2]);

        let body = Paragraph::new(vec![
            Line::from(""),
            Line::from(card.description.clone()),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    format!("{}", card.count),
                    Style::default().fg(color(cards_palette.accent)).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" {}", card.count_label)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                format!("Press {} to open", card.page.index() + 1),
                Style::default().fg(color(cards_palette.hover)),
            )),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color(cards_palette.border)))
                .style(block_style(cards_palette))
                .title(format!(" {} ", card.title)),
        );
        f.render_widget(body, columns[i % 2]);
    }
}

fn table_header<'a>(titles: &'a [&'a str], palette: Palette) -> Row<'a> {
    let cells = titles.iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(color(palette.accent))
                .add_modifier(Modifier::BOLD),
        )
    });
    Row::new(cells)
        .style(Style::default().bg(color(palette.alternate_row)))
        .height(1)
}

fn search_title(label: &str, query: &str, active: bool) -> String {
    match (query.is_empty(), active) {
        (true, false) => format!(" {} ", label),
        (_, true) => format!(" {} - search: {}█ ", label, query),
        (false, false) => format!(" {} - search: {} ", label, query),
    }
}

fn render_products(f: &mut Frame, area: Rect, app: &mut App) {
    let palette = app.theme.palette(Section::Content);
    let products = app.products.rows(&app.store.products);

    let rows = products.iter().enumerate().map(|(i, p)| {
        let style = if i % 2 == 1 {
            Style::default().bg(color(palette.alternate_row))
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(p.id.to_string()),
            Cell::from(truncate(&p.name, 24)),
            Cell::from(p.sku.clone()),
            Cell::from(p.stock.to_string()),
            Cell::from(p.unit.clone()),
            Cell::from(truncate(&p.description, 30)),
        ])
        .style(style)
    });

    let titles = ["ID", "Name", "SKU", "Stock", "Unit", "Description"];
    let title = search_title(
        "Products",
        &app.products.search,
        app.search == Some(SearchTarget::Products),
    );
    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Length(26),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Min(10),
        ],
    )
    .header(table_header(&titles, palette))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color(palette.border)))
            .style(block_style(palette))
            .title(title),
    )
    .highlight_style(
        Style::default()
            .bg(color(palette.hover))
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    let selected = (!products.is_empty()).then_some(app.products.selected);
    app.products_state.select(selected);
    f.render_stateful_widget(table, area, &mut app.products_state);
}

fn render_merchants(f: &mut Frame, area: Rect, app: &mut App) {
    let palette = app.theme.palette(Section::Content);
    let merchants = app.merchants.rows(&app.store.merchants);

    let rows = merchants.iter().enumerate().map(|(i, m)| {
        let style = if i % 2 == 1 {
            Style::default().bg(color(palette.alternate_row))
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(m.id.to_string()),
            Cell::from(truncate(&m.name, 24)),
            Cell::from(m.kind.as_str()),
            Cell::from(m.contact.clone()),
            Cell::from(m.phone.clone()),
            Cell::from(truncate(&m.address, 30)),
        ])
        .style(style)
    });

    let titles = ["ID", "Name", "Type", "Contact", "Phone", "Address"];
    let title = search_title(
        "Merchants",
        &app.merchants.search,
        app.search == Some(SearchTarget::Merchants),
    );
    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Length(26),
            Constraint::Length(18),
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Min(10),
        ],
    )
    .header(table_header(&titles, palette))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color(palette.border)))
            .style(block_style(palette))
            .title(title),
    )
    .highlight_style(
        Style::default()
            .bg(color(palette.hover))
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    let selected = (!merchants.is_empty()).then_some(app.merchants.selected);
    app.merchants_state.select(selected);
    f.render_stateful_widget(table, area, &mut app.merchants_state);
}

fn render_inventory(f: &mut Frame, area: Rect, app: &mut App) {
    let palette = app.theme.palette(Section::Content);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let tab_style = |tab: InventoryTab| {
        if tab == app.inventory.tab {
            Style::default()
                .fg(color(palette.accent))
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(color(palette.border))
        }
    };
    let tabs = Paragraph::new(Line::from(vec![
        Span::styled("Stock Operation", tab_style(InventoryTab::Operation)),
        Span::raw(" │ "),
        Span::styled("Records", tab_style(InventoryTab::Records)),
        Span::raw("   (r to switch)"),
    ]))
    .block(Block::default().borders(Borders::ALL).style(block_style(palette)));
    f.render_widget(tabs, chunks[0]);

    match app.inventory.tab {
        InventoryTab::Operation => render_stock_levels(f, chunks[1], app),
        InventoryTab::Records => render_records(f, chunks[1], app),
    }
}

fn render_stock_levels(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.theme.palette(Section::Content);
    let rows = app.store.products.all().iter().map(|p| {
        let stock_color = if p.stock == 0 {
            Color::Red
        } else if p.stock <= 10 {
            Color::Yellow
        } else {
            color(palette.foreground)
        };
        Row::new(vec![
            Cell::from(p.name.clone()),
            Cell::from(p.stock.to_string()).style(Style::default().fg(stock_color)),
            Cell::from(p.unit.clone()),
        ])
    });

    let titles = ["Product", "Current Stock", "Unit"];
    let table = Table::new(
        rows,
        [Constraint::Length(26), Constraint::Length(15), Constraint::Min(6)],
    )
    .header(table_header(&titles, palette))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color(palette.border)))
            .style(block_style(palette))
            .title(" Current stock - press n for a new inbound/outbound operation "),
    );

    f.render_widget(table, area);
}

fn render_records(f: &mut Frame, area: Rect, app: &mut App) {
    let palette = app.theme.palette(Section::Content);
    let edge_style = |edge: RangeEdge| {
        if edge == app.inventory.editing {
            Style::default().fg(color(palette.accent)).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color(palette.foreground))
        }
    };
    let title = Line::from(vec![
        Span::raw(" Records "),
        Span::styled(app.inventory.start.to_string(), edge_style(RangeEdge::Start)),
        Span::raw(" → "),
        Span::styled(app.inventory.end.to_string(), edge_style(RangeEdge::End)),
        Span::raw(" (s edge, ←/→ day, PgUp/PgDn month) "),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color(palette.border)))
        .style(block_style(palette))
        .title(title);

    let records = match app.inventory.records(&app.store.ledger) {
        Ok(records) => records,
        Err(e) => {
            let message = Paragraph::new(Span::styled(e.to_string(), Style::default().fg(Color::Red)))
                .block(block);
            f.render_widget(message, area);
            return;
        }
    };

    let rows = records.iter().map(|r| {
        let direction_color = match r.direction {
            StockDirection::Inbound => Color::Green,
            StockDirection::Outbound => Color::Red,
        };
        Row::new(vec![
            Cell::from(r.date.format("%Y-%m-%d").to_string()),
            Cell::from(r.product.clone()),
            Cell::from(r.direction.as_str()).style(Style::default().fg(direction_color)),
            Cell::from(r.quantity.to_string()),
            Cell::from(r.merchant.clone().unwrap_or_default()),
            Cell::from(truncate(&r.notes, 30)),
        ])
    });

    let titles = ["Date", "Product", "Type", "Qty", "Merchant", "Notes"];
    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Length(22),
            Constraint::Min(10),
        ],
    )
    .header(table_header(&titles, palette))
    .block(block)
    .highlight_style(
        Style::default()
            .bg(color(palette.hover))
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    let selected = (!records.is_empty()).then_some(app.inventory.selected);
    app.records_state.select(selected);
    f.render_stateful_widget(table, area, &mut app.records_state);
}

fn render_analysis(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.theme.palette(Section::Content);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let names = app.store.merchants.names();
    let merchant = app
        .analysis
        .merchant_name(&names)
        .unwrap_or("Select merchant...");
    let years: Vec<Span> = ANALYSIS_YEARS
        .iter()
        .map(|y| {
            if *y == app.analysis.year() {
                Span::styled(
                    format!(" {} ", y),
                    Style::default().fg(color(palette.accent)).add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw(format!(" {} ", y))
            }
        })
        .collect();

    let mut controls = vec![
        Span::raw("Merchant: "),
        Span::styled(format!("◀ {} ▶", merchant), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("   Year (y):"),
    ];
    controls.extend(years);
    controls.push(Span::raw("   Enter: generate"));

    let bar = Paragraph::new(Line::from(controls))
        .block(Block::default().borders(Borders::ALL).style(block_style(palette)));
    f.render_widget(bar, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
        .split(chunks[1]);

    render_chart(f, body[0], app);
    render_summary(f, body[1], app);
}

fn render_chart(f: &mut Frame, area: Rect, app: &App) {
    let styles = app.theme.styles();
    let palette = app.theme.palette(Section::Content);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color(palette.border)))
        .style(block_style(palette))
        .title(if app.analysis.title.is_empty() {
            " Monthly trend ".to_string()
        } else {
            format!(" {} ", app.analysis.title)
        });

    let inner = block.inner(area);
    let (width, height) = CHART_VIEWPORT;
    let Ok(viewport) = Viewport::new(width, height) else {
        return;
    };

    let options = ChartOptions::new(ChartPalette::from_theme(styles))
        .with_margin(app.config.chart.margin)
        .unwrap_or_else(|_| ChartOptions::new(ChartPalette::from_theme(styles)));
    let renderer = LineChartRenderer::new(options);

    let mut commands: Vec<DrawCommand> = Vec::new();
    let series = app.analysis.series.clone().unwrap_or_default();
    renderer.render(&series, viewport, &mut commands);

    // canvas units covered by one terminal cell horizontally
    let char_width = width / f64::from(inner.width.max(1));

    let canvas = Canvas::default()
        .block(block)
        .background_color(color(palette.background))
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(move |ctx| {
            for command in &commands {
                match command {
                    DrawCommand::Clear => {}
                    DrawCommand::Line { from, to, color: c } => ctx.draw(&CanvasLine {
                        x1: from.x,
                        y1: height - from.y,
                        x2: to.x,
                        y2: height - to.y,
                        color: color(*c),
                    }),
                    DrawCommand::Circle {
                        center,
                        radius,
                        color: c,
                        filled,
                    } => {
                        // canvas circles are outlines; fill with concentric rings
                        let mut r = *radius;
                        loop {
                            ctx.draw(&Circle {
                                x: center.x,
                                y: height - center.y,
                                radius: r,
                                color: color(*c),
                            });
                            r -= 2.0;
                            if !*filled || r <= 0.0 {
                                break;
                            }
                        }
                    }
                    DrawCommand::Text {
                        at,
                        text,
                        color: c,
                        anchor,
                    } => {
                        let text_width = text.chars().count() as f64 * char_width;
                        let x = match anchor {
                            TextAnchor::Start => at.x,
                            TextAnchor::Middle => at.x - text_width / 2.0,
                            TextAnchor::End => at.x - text_width,
                        };
                        ctx.print(
                            x.max(0.0),
                            height - at.y,
                            Span::styled(text.clone(), Style::default().fg(color(*c))),
                        );
                    }
                }
            }
        });

    f.render_widget(canvas, area);
}

fn render_summary(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.theme.palette(Section::Cards);

    let lines = match &app.analysis.summary {
        Some(summary) => {
            let value_style = Style::default().fg(color(palette.accent)).add_modifier(Modifier::BOLD);
            let mut lines = vec![
                Line::from(""),
                Line::from("Total purchases"),
                Line::from(Span::styled(format!("  {} box", summary.total), value_style)),
                Line::from(""),
                Line::from("Monthly average"),
                Line::from(Span::styled(format!("  {:.1} box", summary.average), value_style)),
                Line::from(""),
                Line::from("Highest month"),
                Line::from(Span::styled(format!("  {} box", summary.max), value_style)),
                Line::from(""),
                Line::from("Peak month"),
                Line::from(Span::styled(format!("  {}", summary.peak_month), value_style)),
            ];
            if !summary.high_volume_months.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from("High volume"));
                lines.push(Line::from(Span::styled(
                    format!("  {}", summary.high_volume_months.join(", ")),
                    Style::default().fg(Color::Yellow),
                )));
            }
            lines
        }
        None => vec![Line::from(""), Line::from("No report generated yet")],
    };

    let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color(palette.border)))
            .style(block_style(palette))
            .title(" Summary "),
    );
    f.render_widget(panel, area);
}

fn render_form(f: &mut Frame, area: Rect, form: &Form, palette: Palette) {
    let height = form.fields.len() as u16 + 6;
    let popup = centered_rect(60, height, area);

    let mut lines = vec![Line::from("")];
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let marker = if focused { "→ " } else { "  " };
        let required = if field.required { "*" } else { " " };

        let value = match (&field.kind, field.value.is_empty()) {
            (FieldKind::Choice(_), true) => format!("◀ {} ▶", field.placeholder),
            (FieldKind::Choice(_), false) => format!("◀ {} ▶", field.value),
            (_, true) if !focused => field.placeholder.to_string(),
            _ if focused => format!("{}█", field.value),
            _ => field.value.clone(),
        };
        let value_style = if field.value.is_empty() && !focused {
            Style::default().fg(color(palette.border))
        } else if focused {
            Style::default().fg(color(palette.accent)).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color(palette.foreground))
        };

        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::raw(format!("{:<12}{} ", field.label, required)),
            Span::styled(value, value_style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tab/↑↓ field  ←/→ choose  Enter save  Esc cancel",
        Style::default().fg(color(palette.hover)),
    )));

    let dialog = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color(palette.accent)))
            .style(block_style(palette))
            .title(format!(" {} ", form.title)),
    );

    f.render_widget(Clear, popup);
    f.render_widget(dialog, popup);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.theme.palette(Section::MainWindow);
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

    let mut status_spans = vec![];
    if let Some(status) = &app.status {
        let style = if status.is_error {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green)
        };
        status_spans.push(Span::styled(format!(" {} ", status.message), style));
        status_spans.push(Span::raw(" | "));
    }

    match app.current_page {
        Page::Products | Page::Merchants => {
            status_spans.extend([
                key("a"),
                Span::raw(" Add | "),
                key("e"),
                Span::raw(" Edit | "),
                key("d"),
                Span::raw(" Delete | "),
                key("/"),
                Span::raw(" Search | "),
            ]);
        }
        Page::Inventory => {
            status_spans.extend([key("n"), Span::raw(" New op | "), key("r"), Span::raw(" Tab | ")]);
        }
        Page::Analysis => {
            status_spans.extend([
                key("←/→"),
                Span::raw(" Merchant | "),
                key("y"),
                Span::raw(" Year | "),
                key("Enter"),
                Span::raw(" Generate | "),
            ]);
        }
        Page::Dashboard => {}
    }

    status_spans.extend([
        key("Tab"),
        Span::raw(" Page | "),
        key("t"),
        Span::raw(" Theme | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ]);

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color(palette.border)))
            .style(block_style(palette)),
    );

    f.render_widget(status_bar, area);
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
