use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use crate::api::{ApiError, CoachingGateway};
use crate::cache::{GUIDANCE_TTL, MINDSET_CHECK_TTL, TtlCache};
use crate::events::{EventBus, TradeEvent};
use crate::models::{CoachingGuidance, MindsetCheck, MindsetCheckInput};

/// Mindset check and coaching guidance with their session caches.
///
/// Guidance depends on recent trades and today's mindset, so it is dropped
/// whenever either changes.
pub struct CoachingService {
    gateway: Arc<dyn CoachingGateway>,
    mindset_checks: TtlCache<NaiveDate, Option<MindsetCheck>>,
    guidance: TtlCache<(), CoachingGuidance>,
}

impl CoachingService {
    pub fn new(gateway: Arc<dyn CoachingGateway>) -> Self {
        Self {
            gateway,
            mindset_checks: TtlCache::new(MINDSET_CHECK_TTL),
            guidance: TtlCache::new(GUIDANCE_TTL),
        }
    }

    pub async fn todays_mindset_check(&self) -> Result<Option<MindsetCheck>, ApiError> {
        self.mindset_check_for(today()).await
    }

    /// Keyed by local date so a new day never reuses yesterday's answer.
    pub async fn mindset_check_for(&self, day: NaiveDate) -> Result<Option<MindsetCheck>, ApiError> {
        self.mindset_checks
            .get_or_try_insert_with(day, || self.gateway.todays_mindset_check())
            .await
    }

    pub async fn needs_mindset_check(&self) -> Result<bool, ApiError> {
        Ok(self.todays_mindset_check().await?.is_none())
    }

    pub async fn submit_mindset_check(&self, input: &MindsetCheckInput) -> Result<MindsetCheck, ApiError> {
        let check = self.gateway.submit_mindset_check(input).await?;
        self.mindset_checks.insert(check.date, Some(check.clone()));
        if check.date != today() {
            self.mindset_checks.insert(today(), Some(check.clone()));
        }
        self.guidance.clear();
        Ok(check)
    }

    pub async fn guidance(&self) -> Result<CoachingGuidance, ApiError> {
        self.guidance
            .get_or_try_insert_with((), || self.gateway.guidance())
            .await
    }

    pub fn invalidate_guidance(&self) {
        self.guidance.clear();
    }

    /// Drop everything cached for the signed-in user.
    pub fn invalidate_all(&self) {
        self.mindset_checks.clear();
        self.guidance.clear();
    }

    pub fn handle_event(&self, event: &TradeEvent) {
        log::debug!("Coaching guidance invalidated by {} ({})", event.name(), event.trade_id());
        self.invalidate_guidance();
    }

    /// Consume trade events until the bus is dropped.
    pub async fn run(&self, mut events: broadcast::Receiver<TradeEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => self.handle_event(&event),
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("Coaching listener skipped {} trade events", skipped);
                    self.invalidate_guidance();
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    pub fn spawn_listener(self: &Arc<Self>, bus: &EventBus) -> JoinHandle<()> {
        let service = Arc::clone(self);
        let events = bus.subscribe();
        tokio::spawn(async move { service.run(events).await })
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
