use serde::Serialize;

use crate::models::event::Event;

#[derive(Debug, Serialize, PartialEq)]
pub struct EventSummary {
    pub id: String,
    pub title: String,
    pub count: usize,
}

/// Organizer dashboard payload. Computed on demand, never stored.
#[derive(Debug, Serialize, PartialEq)]
pub struct DashboardStats {
    pub total_events: usize,
    pub total_registrations: usize,
    pub event_summary: Vec<EventSummary>,
}

impl DashboardStats {
    /// Summaries are ordered by registration count, highest first. Equal
    /// counts keep the order of `events`.
    pub fn from_events(events: &[Event]) -> Self {
        let mut event_summary: Vec<EventSummary> = events
            .iter()
            .map(|event| EventSummary {
                id: event.id.to_hex(),
                title: event.display_title().to_string(),
                count: event.registrations.len(),
            })
            .collect();
        event_summary.sort_by(|a, b| b.count.cmp(&a.count));

        DashboardStats {
            total_events: events.len(),
            total_registrations: event_summary.iter().map(|summary| summary.count).sum(),
            event_summary,
        }
    }
}
