//! OrderDesk - live order dashboard
//!
//! # 模块结构
//!
//! ```text
//! orderdesk/src/
//! ├── config.rs      # CLI flags / env
//! ├── dashboard.rs   # view store: fetches, status action, feed reactions
//! ├── state.rs       # view state, load states, detail popup
//! ├── sequence.rs    # stale-response guard
//! ├── toast.rs       # transient notifications
//! ├── logger.rs      # rotating file logs
//! └── tui/           # ratatui console
//! ```

pub mod config;
pub mod dashboard;
pub mod logger;
pub mod sequence;
pub mod state;
pub mod toast;
pub mod tui;

pub use config::Cli;
pub use dashboard::{AdvanceOutcome, Dashboard};
pub use state::{DashboardState, DetailModal, LoadState};
pub use toast::{Severity, Toast, ToastId, Toaster};
