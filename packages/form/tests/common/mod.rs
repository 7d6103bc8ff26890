//! Shared helpers for form integration tests

use formwire::{ErrorMap, FormHandler, StatusMap, Value};
use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a subscriber honoring `RUST_LOG`, once per test binary
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Change(Value),
    Status(StatusMap),
    Errors(ErrorMap),
    Submit(Value),
    ValidSubmit(Value),
    InvalidSubmit(Value, ErrorMap),
}

/// Handler that records every notification in order
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
}

impl Recorder {
    pub fn changes(&self) -> Vec<&Value> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Change(model) => Some(model),
                _ => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<&StatusMap> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Status(status) => Some(status),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<&ErrorMap> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Errors(errors) => Some(errors),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl FormHandler for Recorder {
    fn on_change(&mut self, model: &Value) {
        self.events.push(Event::Change(model.clone()));
    }

    fn on_status_change(&mut self, status: &StatusMap) {
        self.events.push(Event::Status(status.clone()));
    }

    fn on_errors_change(&mut self, errors: &ErrorMap) {
        self.events.push(Event::Errors(errors.clone()));
    }

    fn on_submit(&mut self, model: &Value) {
        self.events.push(Event::Submit(model.clone()));
    }

    fn on_valid_submit(&mut self, model: &Value) {
        self.events.push(Event::ValidSubmit(model.clone()));
    }

    fn on_invalid_submit(&mut self, model: &Value, errors: &ErrorMap) {
        self.events.push(Event::InvalidSubmit(model.clone(), errors.clone()));
    }
}
