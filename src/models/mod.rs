pub mod admin;
pub mod broker;
pub mod coaching;
pub mod insight;
pub mod rule;
pub mod suggestion;
pub mod symbol;
pub mod trade;

pub use admin::*;
pub use broker::*;
pub use coaching::*;
pub use insight::*;
pub use rule::*;
pub use suggestion::*;
pub use symbol::*;
pub use trade::*;
