use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

use crate::models::{Emotion, InstrumentType, TradeDirection, TradeSource, TradeStatus};
use crate::wizard::FieldErrors;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Newest,
    Oldest,
    PnlDesc,
    PnlAsc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::Newest,
        SortOrder::Oldest,
        SortOrder::PnlDesc,
        SortOrder::PnlAsc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::PnlDesc => "pnl_desc",
            SortOrder::PnlAsc => "pnl_asc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|o| o.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown sort order: {}", s))
    }
}

/// Trade history filter, mirrored into the page's query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub search: Option<String>,
    pub symbol: Option<String>,
    pub status: Option<TradeStatus>,
    pub direction: Option<TradeDirection>,
    pub instrument_type: Option<InstrumentType>,
    pub source: Option<TradeSource>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_pnl: Option<f64>,
    pub max_pnl: Option<f64>,
    #[serde(default)]
    pub emotions: Vec<Emotion>,
    pub sort: Option<SortOrder>,
}

impl FilterState {
    /// Parse a query string (with or without the leading `?`).
    ///
    /// Empty values count as unset; values that fail to parse are dropped.
    pub fn from_query(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let mut state = FilterState::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            let parsed = match key.as_ref() {
                "search" => {
                    state.search = Some(value.to_string());
                    true
                }
                "symbol" => {
                    state.symbol = Some(value.to_ascii_uppercase());
                    true
                }
                "status" => assign(&mut state.status, value.parse().ok()),
                "direction" => assign(&mut state.direction, value.parse().ok()),
                "instrument" => assign(&mut state.instrument_type, value.parse().ok()),
                "source" => assign(&mut state.source, value.parse().ok()),
                "from" => assign(&mut state.start_date, parse_date(value)),
                "to" => assign(&mut state.end_date, parse_date(value)),
                "minPnl" => assign(&mut state.min_pnl, parse_amount(value)),
                "maxPnl" => assign(&mut state.max_pnl, parse_amount(value)),
                "emotions" => {
                    state.emotions = value
                        .split(',')
                        .filter_map(|e| e.parse::<Emotion>().ok())
                        .collect();
                    true
                }
                "sort" => assign(&mut state.sort, value.parse().ok()),
                _ => true, // Unrelated page parameters
            };

            if !parsed {
                log::debug!("Ignoring invalid filter parameter {}={}", key, value);
            }
        }

        state
    }

    /// The state as it reads back from its own query string: text trimmed,
    /// symbol uppercased, blank text and non-finite amounts unset.
    pub fn normalized(&self) -> Self {
        FilterState {
            search: normalize_text(self.search.clone()),
            symbol: normalize_text(self.symbol.clone()).map(|s| s.to_ascii_uppercase()),
            min_pnl: self.min_pnl.filter(|v| v.is_finite()),
            max_pnl: self.max_pnl.filter(|v| v.is_finite()),
            ..self.clone()
        }
    }

    /// Key/value pairs in a stable order. Unset fields are omitted and
    /// values are written in normalized form.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let state = self.normalized();
        let mut pairs = Vec::new();

        if let Some(search) = state.search {
            pairs.push(("search", search));
        }
        if let Some(symbol) = state.symbol {
            pairs.push(("symbol", symbol));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        if let Some(direction) = self.direction {
            pairs.push(("direction", direction.to_string()));
        }
        if let Some(instrument) = self.instrument_type {
            pairs.push(("instrument", instrument.to_string()));
        }
        if let Some(source) = self.source {
            pairs.push(("source", source.to_string()));
        }
        if let Some(start) = self.start_date {
            pairs.push(("from", start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("to", end.format(DATE_FORMAT).to_string()));
        }
        if let Some(min) = state.min_pnl {
            pairs.push(("minPnl", min.to_string()));
        }
        if let Some(max) = state.max_pnl {
            pairs.push(("maxPnl", max.to_string()));
        }
        if !self.emotions.is_empty() {
            let joined: Vec<&str> = self.emotions.iter().map(|e| e.as_str()).collect();
            pairs.push(("emotions", joined.join(",")));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.to_string()));
        }

        pairs
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_query_pairs())
            .finish()
    }

    /// Number of active filter groups. A date range or a P&L range counts
    /// once however many bounds are set; sort order is not a filter.
    pub fn active_count(&self) -> usize {
        [
            self.search.is_some(),
            self.symbol.is_some(),
            self.status.is_some(),
            self.direction.is_some(),
            self.instrument_type.is_some(),
            self.source.is_some(),
            self.start_date.is_some() || self.end_date.is_some(),
            self.min_pnl.is_some() || self.max_pnl.is_some(),
            !self.emotions.is_empty(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn validation_errors_as_of(&self, today: NaiveDate) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                errors.insert("dateRange", "Start date must be before end date".to_string());
            }
        }
        if let Some(end) = self.end_date {
            if end > today {
                errors.insert("endDate", "End date cannot be in the future".to_string());
            }
        }
        if let (Some(min), Some(max)) = (self.min_pnl, self.max_pnl) {
            if min > max {
                errors.insert(
                    "pnlRange",
                    "Minimum P&L cannot exceed maximum P&L".to_string(),
                );
            }
        }

        errors
    }
}

fn assign<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(v) => {
            *slot = Some(v);
            true
        }
        None => false,
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

fn parse_amount(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Shallow update: `Some(x)` overwrites the field with `x`, `None` leaves it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPatch {
    pub search: Option<Option<String>>,
    pub symbol: Option<Option<String>>,
    pub status: Option<Option<TradeStatus>>,
    pub direction: Option<Option<TradeDirection>>,
    pub instrument_type: Option<Option<InstrumentType>>,
    pub source: Option<Option<TradeSource>>,
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
    pub min_pnl: Option<Option<f64>>,
    pub max_pnl: Option<Option<f64>>,
    pub emotions: Option<Vec<Emotion>>,
    pub sort: Option<Option<SortOrder>>,
}

impl FilterPatch {
    /// Patch setting every field that is set in `state`.
    pub fn from_state(state: &FilterState) -> Self {
        FilterPatch {
            search: state.search.clone().map(Some),
            symbol: state.symbol.clone().map(Some),
            status: state.status.map(Some),
            direction: state.direction.map(Some),
            instrument_type: state.instrument_type.map(Some),
            source: state.source.map(Some),
            start_date: state.start_date.map(Some),
            end_date: state.end_date.map(Some),
            min_pnl: state.min_pnl.map(Some),
            max_pnl: state.max_pnl.map(Some),
            emotions: (!state.emotions.is_empty()).then(|| state.emotions.clone()),
            sort: state.sort.map(Some),
        }
    }

    pub fn apply_to(self, state: &mut FilterState) {
        if let Some(search) = self.search {
            state.search = normalize_text(search);
        }
        if let Some(symbol) = self.symbol {
            state.symbol = normalize_text(symbol).map(|s| s.to_ascii_uppercase());
        }
        if let Some(status) = self.status {
            state.status = status;
        }
        if let Some(direction) = self.direction {
            state.direction = direction;
        }
        if let Some(instrument) = self.instrument_type {
            state.instrument_type = instrument;
        }
        if let Some(source) = self.source {
            state.source = source;
        }
        if let Some(start) = self.start_date {
            state.start_date = start;
        }
        if let Some(end) = self.end_date {
            state.end_date = end;
        }
        if let Some(min) = self.min_pnl {
            state.min_pnl = min.filter(|v| v.is_finite());
        }
        if let Some(max) = self.max_pnl {
            state.max_pnl = max.filter(|v| v.is_finite());
        }
        if let Some(emotions) = self.emotions {
            state.emotions = emotions;
        }
        if let Some(sort) = self.sort {
            state.sort = sort;
        }
    }
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// History page filter controller: state plus its synced query string.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilters {
    state: FilterState,
    query: String,
}

impl HistoryFilters {
    pub fn from_query(query: &str) -> Self {
        let state = FilterState::from_query(query);
        let query = state.to_query_string();
        Self { state, query }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Query string to push into the location bar.
    pub fn query_string(&self) -> &str {
        &self.query
    }

    pub fn update(&mut self, patch: FilterPatch) -> &str {
        patch.apply_to(&mut self.state);
        self.sync_query()
    }

    pub fn clear(&mut self) -> &str {
        self.state = FilterState::default();
        self.sync_query()
    }

    /// Merge a saved preset's filters over the current state.
    pub fn apply_preset(&mut self, filters: &FilterState) -> &str {
        self.update(FilterPatch::from_state(filters))
    }

    pub fn active_filter_count(&self) -> usize {
        self.state.active_count()
    }

    pub fn validation_errors(&self) -> FieldErrors {
        self.state.validation_errors_as_of(Utc::now().date_naive())
    }

    pub fn is_valid(&self) -> bool {
        self.validation_errors().is_empty()
    }

    fn sync_query(&mut self) -> &str {
        self.query = self.state.to_query_string();
        &self.query
    }
}
