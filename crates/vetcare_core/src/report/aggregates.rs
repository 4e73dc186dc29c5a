//! Chart series and dashboard aggregation over the record store.

use crate::store::record_store::{today, RecordStore};
use std::collections::BTreeMap;

/// Headline numbers for the clinic dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_pets: usize,
    pub total_clients: usize,
    pub appointments_today: usize,
    pub pending_vaccines: usize,
}

/// Computes the dashboard headline numbers for today.
pub fn dashboard_summary(store: &RecordStore<'_>) -> DashboardSummary {
    DashboardSummary {
        total_pets: store.pets().len(),
        total_clients: store.clients().len(),
        appointments_today: store.appointments_by_date(today()).len(),
        pending_vaccines: store.pending_vaccines().len(),
    }
}

/// Pet count per species, labels in first-seen collection order.
pub fn pets_by_species(store: &RecordStore<'_>) -> Vec<(String, usize)> {
    tally_in_order(store.pets().iter().map(|pet| pet.species.as_str()))
}

/// Vaccine count per vaccine kind, labels in first-seen collection order.
pub fn vaccines_by_kind(store: &RecordStore<'_>) -> Vec<(String, usize)> {
    tally_in_order(store.vaccines().iter().map(|vaccine| vaccine.kind.as_str()))
}

/// Appointment count per `YYYY-MM` month, ascending by month.
pub fn appointments_by_month(store: &RecordStore<'_>) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for appointment in store.appointments() {
        let month = appointment.date.format("%Y-%m").to_string();
        *counts.entry(month).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

/// Counts labels preserving the order each label first appears in.
fn tally_in_order<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut series: Vec<(String, usize)> = Vec::new();
    for label in labels {
        match series
            .iter_mut()
            .find(|(existing, _)| existing.as_str() == label)
        {
            Some((_, count)) => *count += 1,
            None => series.push((label.to_string(), 1)),
        }
    }
    series
}
