//! Wager orchestration: locks, history, spin quotas, and the play state
//! machine that ties the ledger and outcome engine together

pub mod history;
pub mod locks;
pub mod orchestrator;
pub mod spin;

pub use history::{HistoryStore, PlayRecord};
pub use locks::UserLocks;
pub use orchestrator::{PlayReceipt, PlayRequest, SpinReceipt, WagerOrchestrator};
pub use spin::{SpinKind, SpinStatus, SpinTracker};
