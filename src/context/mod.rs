//! Session-scoped state shared by every view: fetched once, then kept in
//! step with local mutations.

pub mod rules;
pub mod trades;

pub use rules::RulesStore;
pub use trades::TradesStore;
