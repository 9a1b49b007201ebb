//! Map navigation handler.

use super::{DomainHandler, HandlerError};
use async_trait::async_trait;
use parlance_core::intent::{Intent, IntentKind};
use parlance_core::result::DomainResult;
use parlance_core::session::CommandContext;
use serde_json::json;

/// Executes navigation intents: panning to an address and zooming.
#[derive(Default)]
pub struct NavigationHandler;

impl NavigationHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DomainHandler for NavigationHandler {
    fn kind(&self) -> IntentKind {
        IntentKind::Navigation
    }

    async fn handle(&self, intent: &Intent, _ctx: &CommandContext) -> Result<DomainResult, HandlerError> {
        if let Some(address) = intent.parameter("address") {
            return Ok(DomainResult::new(
                IntentKind::Navigation,
                format!("Navigating to {address}"),
            )
            .with_data(json!({ "action": "navigate", "address": address })));
        }

        if let Some(level) = intent.parameter("level") {
            if let Ok(value) = level.parse::<f64>() {
                return Ok(DomainResult::new(
                    IntentKind::Navigation,
                    format!("Set zoom level to {value}"),
                )
                .with_data(json!({ "action": "zoom", "level": value })));
            }
            if level == "in" || level == "out" {
                return Ok(DomainResult::new(
                    IntentKind::Navigation,
                    format!("Zoomed {level}"),
                )
                .with_data(json!({ "action": "zoom", "direction": level })));
            }
            return Err(HandlerError::Failed(format!("unsupported zoom level '{level}'")));
        }

        // Bare navigation with no target recenters the map.
        Ok(DomainResult::new(IntentKind::Navigation, "Centering the map")
            .with_data(json!({ "action": "center" })))
    }
}
