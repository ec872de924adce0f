use serde::{Deserialize, Serialize};

use super::InstrumentType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolMatch {
    pub symbol: String,
    pub name: String,
    pub exchange: Option<String>,
    pub instrument_type: Option<InstrumentType>,
}
