//! Client core for the catchbook daily ledger: sale/expense lines, derived
//! day and period totals, the editing session, the history buffers, the
//! remote day store and CSV export.

pub mod amount;
pub mod api;
pub mod config;
pub mod date;
pub mod error;
pub mod export;
pub mod history;
pub mod ids;
pub mod memory;
pub mod models;
pub mod session;
pub mod totals;

pub use amount::parse_amount;
pub use api::{HttpRemote, RemoteStore};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use history::{HistoryBook, HistoryKey};
pub use ids::LineId;
pub use memory::MemoryStore;
pub use models::{DayRecord, ExpenseLine, ExpensePatch, SaleLine, SalePatch, DEFAULT_CATEGORY};
pub use session::{SaveOutcome, Session};
pub use totals::{aggregate, period_totals, Totals, EARNINGS_RATE};
