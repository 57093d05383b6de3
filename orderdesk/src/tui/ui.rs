//! Console rendering

use orderdesk_client::ConnectionState;
use ratatui::{prelude::*, widgets::*};
use shared::format::{format_currency, format_datetime, format_time};
use shared::{OrderSummary, StatusTone};

use super::app::{App, filter_count, filter_title};
use crate::state::{DashboardState, DetailModal, LoadState};
use crate::toast::{Severity, Toast};

const MAX_TOASTS: usize = 5;

pub fn draw(f: &mut Frame, app: &mut App, state: &DashboardState, toasts: &[Toast]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(4), // Stat cards
            Constraint::Length(3), // Filter tabs
            Constraint::Min(5),    // Orders
            Constraint::Length(1), // Help / error banner
        ])
        .split(f.area());

    draw_header(f, chunks[0], app, state);
    draw_stats(f, chunks[1], app, state);
    draw_tabs(f, chunks[2], app);
    draw_orders(f, chunks[3], app, state);
    draw_footer(f, chunks[4], state);

    if let Some(modal) = &state.modal {
        draw_modal(f, app, modal);
    }
    draw_toasts(f, toasts);
}

fn tone_color(tone: StatusTone) -> Color {
    match tone {
        StatusTone::Warning => Color::Yellow,
        StatusTone::Info => Color::Blue,
        StatusTone::Progress => Color::Magenta,
        StatusTone::Success => Color::Green,
        StatusTone::Neutral => Color::Gray,
        StatusTone::Danger => Color::Red,
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App, state: &DashboardState) {
    let indicator = match state.connection {
        ConnectionState::Connected => Span::styled(
            " ● Live ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        ConnectionState::Disconnected => Span::styled(
            " ○ Offline ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        ConnectionState::Halted => Span::styled(
            " ✕ Live updates stopped ",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD | Modifier::RAPID_BLINK),
        ),
    };

    let title = Paragraph::new(Line::from(vec![
        Span::raw(" 🍱 OrderDesk "),
        Span::styled(" Dashboard ", Style::default().fg(Color::Yellow)),
        Span::raw(" | "),
        indicator,
        Span::raw(" | Admin: "),
        Span::styled(app.admin_url.as_str(), Style::default().fg(Color::Cyan)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(title, area);
}

fn draw_stats(f: &mut Frame, area: Rect, app: &App, state: &DashboardState) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    let placeholder = || {
        if state.stats.load.is_loading() {
            "…".to_string()
        } else {
            "-".to_string()
        }
    };
    let stats = state.stats.value.as_ref();
    let values = [
        (
            "Pending",
            stats.map_or_else(placeholder, |s| s.pending_orders.to_string()),
            Color::Yellow,
        ),
        (
            "Today's orders",
            stats.map_or_else(placeholder, |s| s.today_orders().to_string()),
            Color::Blue,
        ),
        (
            "Today's revenue",
            stats.map_or_else(placeholder, |s| {
                format_currency(s.today_revenue(), &app.locale)
            }),
            Color::Green,
        ),
        (
            "Customers",
            stats.map_or_else(placeholder, |s| s.total_customers.to_string()),
            Color::Magenta,
        ),
    ];

    for ((title, value, color), area) in values.into_iter().zip(cards.iter()) {
        let card = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
        f.render_widget(card, *area);
    }
}

fn draw_tabs(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<&str> = (0..filter_count()).map(filter_title).collect();
    let tabs = Tabs::new(titles)
        .select(app.filter_index)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
        .block(Block::default().title(" Filter (←/→) ").borders(Borders::ALL));
    f.render_widget(tabs, area);
}

fn order_row<'a>(order: &'a OrderSummary, app: &App) -> Row<'a> {
    Row::new(vec![
        Cell::from(order.order_number.as_str()),
        Cell::from(order.customer.display_name()),
        Cell::from(Span::styled(
            order.status_label().to_string(),
            Style::default().fg(tone_color(order.status.tone())),
        )),
        Cell::from(Span::styled(
            order.payment_status.label(),
            Style::default().fg(tone_color(order.payment_status.tone())),
        )),
        Cell::from(order.item_count.to_string()),
        Cell::from(format_currency(order.total, &app.locale)),
        Cell::from(format_datetime(order.created_at, &app.locale)),
    ])
}

fn draw_orders(f: &mut Frame, area: Rect, app: &mut App, state: &DashboardState) {
    let title = match &state.orders.load {
        LoadState::Loading => " Orders (loading…) ".to_string(),
        _ => format!(" Orders ({}) ", state.orders.value.len()),
    };

    let header = Row::new(vec![
        "Order", "Customer", "Status", "Payment", "Items", "Total", "Created",
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = state
        .orders
        .value
        .iter()
        .map(|order| order_row(order, app))
        .collect();

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    if rows.is_empty() {
        let empty = Paragraph::new("No orders")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let table = Table::new(
        rows,
        [
            Constraint::Length(18),
            Constraint::Min(12),
            Constraint::Length(24),
            Constraint::Length(17),
            Constraint::Length(5),
            Constraint::Length(16),
            Constraint::Length(18),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol("▶ ");

    f.render_stateful_widget(table, area, &mut app.table);
}

fn draw_footer(f: &mut Frame, area: Rect, state: &DashboardState) {
    let line = match state.error_banner() {
        Some(msg) => Line::from(vec![
            Span::styled(
                format!(" ⚠ {msg} "),
                Style::default().fg(Color::White).bg(Color::Red),
            ),
            Span::styled(" press r to retry", Style::default().fg(Color::Red)),
        ]),
        None => Line::from(Span::styled(
            " q quit · ←/→ filter · ↑/↓ select · Enter details · a advance · Esc close · r refresh",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
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

fn field<'a>(label: &'a str, value: impl Into<String>) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<10}"), Style::default().fg(Color::DarkGray)),
        Span::raw(value.into()),
    ])
}

fn draw_modal(f: &mut Frame, app: &App, modal: &DetailModal) {
    let area = centered_rect(64, 70, f.area());
    f.render_widget(Clear, area);

    let number = modal.order_number().unwrap_or("?");
    let mut lines: Vec<Line> = Vec::new();

    if let Some(status) = modal.status() {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<10}", "Status"), Style::default().fg(Color::DarkGray)),
            Span::styled(
                status.label(),
                Style::default()
                    .fg(tone_color(status.tone()))
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    match (&modal.detail, &modal.placeholder) {
        (Some(detail), _) => {
            lines.push(field("Customer", detail.customer.display_name()));
            lines.push(field("Phone", detail.contact_phone().unwrap_or("-")));
            lines.push(field("Address", detail.delivery_address.as_str()));
            lines.push(field("Notes", detail.notes.as_deref().unwrap_or("-")));
            lines.push(field("Payment", detail.payment_status.label()));
            lines.push(field("Placed", format_datetime(detail.created_at, &app.locale)));
            if let Some(updated) = detail.updated_at {
                lines.push(field("Updated", format_time(updated, &app.locale)));
            }
            lines.push(Line::raw(""));
            for item in &detail.items {
                lines.push(Line::from(vec![
                    Span::raw(format!("{:>3} × {:<28}", item.quantity, item.name)),
                    Span::styled(
                        format_currency(item.line_total(), &app.locale),
                        Style::default().fg(Color::White),
                    ),
                ]));
            }
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<34}", "Total"),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format_currency(detail.total, &app.locale),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        (None, Some(summary)) => {
            lines.push(field("Customer", summary.customer.display_name()));
            lines.push(field("Payment", summary.payment_status.label()));
            lines.push(field("Total", format_currency(summary.total, &app.locale)));
        }
        (None, None) => {}
    }

    match &modal.load {
        LoadState::Loading => lines.push(Line::styled(
            "Loading details…",
            Style::default().fg(Color::Yellow),
        )),
        LoadState::Failed(msg) => lines.push(Line::styled(
            format!("Could not load details: {msg}"),
            Style::default().fg(Color::Red),
        )),
        LoadState::Idle | LoadState::Ready => {}
    }

    lines.push(Line::raw(""));
    let hint = match modal.status().and_then(|s| s.next()) {
        _ if modal.advancing => "Updating…".to_string(),
        Some(next) => format!("a: mark as {}   Esc: close", next.label()),
        None => "No further actions   Esc: close".to_string(),
    };
    lines.push(Line::styled(hint, Style::default().fg(Color::Cyan)));

    let popup = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(format!(" Order #{number} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(popup, area);
}

fn draw_toasts(f: &mut Frame, toasts: &[Toast]) {
    let area = f.area();
    let width = 48.min(area.width);
    let x = area.x + area.width.saturating_sub(width + 1);

    let slots = (area.height.saturating_sub(1) / 3) as usize;

    for (i, toast) in toast_stack(toasts, slots).iter().enumerate() {
        let y = area.y + 1 + (i as u16) * 3;
        let rect = Rect::new(x, y, width, 3);
        let color = match toast.severity {
            Severity::Info => Color::Blue,
            Severity::Success => Color::Green,
            Severity::Warning => Color::Yellow,
            Severity::Error => Color::Red,
        };
        f.render_widget(Clear, rect);
        f.render_widget(
            Paragraph::new(toast.message.as_str())
                .style(Style::default().fg(color))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color)),
                ),
            rect,
        );
    }
}

/// Toasts to draw top to bottom: insertion order, newest kept when space runs out
fn toast_stack(toasts: &[Toast], slots: usize) -> &[Toast] {
    let shown = slots.min(MAX_TOASTS);
    &toasts[toasts.len().saturating_sub(shown)..]
}
