//! Plain-text rendering of courses, conflicts and import reports for the TUI.

use crate::domain::{Conflict, Course};
use crate::usecases::ImportReport;
use chrono::NaiveDate;

/// `05 March 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

/// One course as a multi-line card. Ending-soon courses get a marker in the title line.
pub fn course_card(
    course: &Course,
    teacher: &str,
    room: &str,
    today: NaiveDate,
    ending_soon_days: i64,
) -> String {
    let marker = if course.is_ending_soon(today, ending_soon_days) {
        "  [ENDING SOON]"
    } else {
        ""
    };
    let days = course
        .weekdays
        .iter()
        .map(|d| d.name())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "■ {}{}\n  Dates:   {} - {}\n  Teacher: {}\n  Room:    {}\n  Shift:   {}\n  Days:    {}\n",
        course.name,
        marker,
        format_date(course.start_date),
        format_date(course.end_date),
        teacher,
        room,
        course.shift.label(),
        days
    )
}

/// User-facing rejection message.
pub fn conflict_message(conflict: &Conflict) -> String {
    format!(
        "Scheduling conflict: the {} is already booked by '{}' ({} shift, {}) from {} to {}.",
        conflict.shared,
        conflict.course_name,
        conflict.shift.label(),
        conflict
            .weekdays
            .iter()
            .map(|d| d.name())
            .collect::<Vec<_>>()
            .join(", "),
        format_date(conflict.overlap.start),
        format_date(conflict.overlap.end)
    )
}

pub fn import_summary(report: &ImportReport) -> String {
    let mut out = format!(
        "Imported {} course(s), skipped {}.\n",
        report.imported,
        report.skipped()
    );
    for (name, conflict) in &report.conflicts {
        out.push_str(&format!("  ✗ {}: {}\n", name, conflict_message(conflict)));
    }
    for (name, reason) in &report.invalid {
        out.push_str(&format!("  ✗ {}: {}\n", name, reason));
    }
    out
}
