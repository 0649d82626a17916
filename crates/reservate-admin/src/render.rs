//! Plain-text rendering of reservations for the terminal

use crate::views::ReservationSummary;
use reservate_core::Reservation;
use std::fmt::Write;

/// Date layout used in tables
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One row per reservation with code, date, client, total and state
#[must_use]
pub fn reservation_table(reservations: &[Reservation]) -> String {
    let mut out = format!(
        "{:<10} {:<16} {:<28} {:>10} {:<12}\n",
        "CODE", "DATE", "CLIENT", "TOTAL", "STATE"
    );

    for r in reservations {
        let _ = writeln!(
            out,
            "{:<10} {:<16} {:<28} {:>10.2} {:<12}",
            r.code,
            r.reservation_date.format(DATE_FORMAT),
            truncate(&r.client_name(), 28),
            r.total_price,
            r.state.label()
        );
    }

    let _ = write!(out, "{} reservation(s)", reservations.len());
    out
}

/// Every field of one reservation
#[must_use]
pub fn reservation_detail(reservation: &Reservation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Code:     {}", reservation.code);
    let _ = writeln!(out, "Id:       {}", reservation.id);
    let _ = writeln!(
        out,
        "Date:     {}",
        reservation.reservation_date.format(DATE_FORMAT)
    );
    let _ = writeln!(out, "State:    {}", reservation.state.label());

    match &reservation.client {
        Some(client) => {
            let _ = writeln!(out, "Client:   {} (#{})", client.full_name(), client.id);
        }
        None => {
            let _ = writeln!(out, "Client:   -");
        }
    }
    if let Some(mechanic) = &reservation.mechanic {
        let _ = writeln!(
            out,
            "Mechanic: {} {} ({})",
            mechanic.name, mechanic.last_name, mechanic.employee_code
        );
    }

    let _ = writeln!(out, "Services:");
    for service in &reservation.services {
        let _ = writeln!(out, "  - {:<30} {:>10.2}", service.title, service.price);
    }
    let _ = write!(out, "Total:    {:.2}", reservation.total_price);
    out
}

/// Dashboard counters
#[must_use]
pub fn summary(counts: &ReservationSummary) -> String {
    let rows = [
        ("Pending", counts.pending),
        ("Confirmed", counts.confirmed),
        ("In progress", counts.in_progress),
        ("Completed", counts.completed),
        ("Cancelled", counts.cancelled),
        ("Total", counts.total),
    ];

    let mut out = String::new();
    for (label, count) in rows {
        let _ = writeln!(out, "{label:<12} {count:>6}");
    }
    let _ = write!(out, "{:<12} {:>6.2}", "Revenue", counts.revenue);
    out
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut shortened: String = value.chars().take(width.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}
