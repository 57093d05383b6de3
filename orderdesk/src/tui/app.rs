//! Console input state and key handling

use crossterm::event::KeyCode;
use ratatui::widgets::TableState;
use shared::{Locale, OrderStatus};

use crate::dashboard::Dashboard;
use crate::state::DashboardState;

/// Filter tabs: "All" followed by every status in workflow order
pub fn filter_at(index: usize) -> Option<OrderStatus> {
    index
        .checked_sub(1)
        .and_then(|i| OrderStatus::ALL.get(i).copied())
}

pub fn filter_count() -> usize {
    OrderStatus::ALL.len() + 1
}

pub fn filter_title(index: usize) -> &'static str {
    filter_at(index).map_or("All", OrderStatus::label)
}

pub struct App {
    pub dashboard: Dashboard,
    pub locale: Locale,
    pub admin_url: String,
    pub filter_index: usize,
    pub table: TableState,
}

impl App {
    pub fn new(dashboard: Dashboard, locale: Locale, admin_url: String) -> Self {
        Self {
            dashboard,
            locale,
            admin_url,
            filter_index: 0,
            table: TableState::default().with_selected(Some(0)),
        }
    }

    /// Handle one key press. Returns true when the console should exit.
    pub fn handle_key(&mut self, code: KeyCode, state: &DashboardState) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Left => self.shift_filter(filter_count() - 1),
            KeyCode::Right => self.shift_filter(1),
            KeyCode::Up => self.move_selection(state, -1),
            KeyCode::Down => self.move_selection(state, 1),
            KeyCode::Enter => {
                if let Some(order_id) = self.selected_order(state) {
                    let dashboard = self.dashboard.clone();
                    tokio::spawn(async move { dashboard.open_order(order_id).await });
                }
            }
            KeyCode::Char('a') => {
                let target = state
                    .modal
                    .as_ref()
                    .map(|m| m.order_id)
                    .or_else(|| self.selected_order(state));
                if let Some(order_id) = target {
                    let dashboard = self.dashboard.clone();
                    tokio::spawn(async move {
                        dashboard.advance_order(order_id).await;
                    });
                }
            }
            KeyCode::Esc => self.dashboard.close_order(),
            KeyCode::Char('r') => {
                let dashboard = self.dashboard.clone();
                tokio::spawn(async move { dashboard.refresh_all().await });
            }
            _ => {}
        }
        false
    }

    pub fn selected_order(&self, state: &DashboardState) -> Option<i64> {
        let index = self.table.selected()?;
        state.orders.value.get(index).map(|o| o.id)
    }

    fn shift_filter(&mut self, step: usize) {
        self.filter_index = (self.filter_index + step) % filter_count();
        self.table.select(Some(0));
        let filter = filter_at(self.filter_index);
        let dashboard = self.dashboard.clone();
        tokio::spawn(async move { dashboard.set_filter(filter).await });
    }

    fn move_selection(&mut self, state: &DashboardState, delta: isize) {
        let len = state.orders.value.len();
        if len == 0 {
            self.table.select(None);
            return;
        }
        let current = self.table.selected().unwrap_or(0).min(len - 1);
        let next = current.saturating_add_signed(delta).min(len - 1);
        self.table.select(Some(next));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_tabs() {
        assert_eq!(filter_count(), 7);
        assert_eq!(filter_at(0), None);
        assert_eq!(filter_at(1), Some(OrderStatus::Pending));
        assert_eq!(filter_at(6), Some(OrderStatus::Cancelled));
        assert_eq!(filter_at(7), None);
        assert_eq!(filter_title(0), "All");
        assert_eq!(filter_title(3), OrderStatus::Preparing.label());
    }
}
