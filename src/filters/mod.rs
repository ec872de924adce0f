pub mod history;
pub mod presets;

pub use history::{FilterPatch, FilterState, HistoryFilters, SortOrder};
pub use presets::{FilterPreset, PresetStore};
