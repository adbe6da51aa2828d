pub mod column_config;
pub mod drag_reorder;
pub mod filter_conditions;
pub mod predicate;
pub mod schemes;
pub mod view_session;

pub use column_config::ColumnConfigStore;
pub use drag_reorder::{DragReorderController, DragState, DropOutcome, KeySequence};
pub use filter_conditions::FilterConditionStore;
pub use predicate::RowPredicate;
pub use schemes::SchemeStore;
pub use view_session::{SessionSummary, ViewSession};
