use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::domain::Report;

/// Days before the due date at which a report counts as expiring soon.
pub const EXPIRY_WARNING_DAYS: i64 = 30;

/// Severity of a report's next-inspection deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    /// The next inspection is overdue.
    Expired,
    /// The next inspection is due within [`EXPIRY_WARNING_DAYS`].
    ExpiringSoon,
    /// The next inspection is further away.
    Valid,
}

impl Status {
    /// Classifies a next-inspection date relative to `now`.
    ///
    /// The date is taken as midnight UTC at its start, so a report due today
    /// is already expired once the day has begun.
    #[must_use]
    pub fn classify(next_inspection: NaiveDate, now: DateTime<Utc>) -> Self {
        let due = next_inspection.and_time(NaiveTime::MIN).and_utc();
        if due < now {
            Self::Expired
        } else if due < now + Duration::days(EXPIRY_WARNING_DAYS) {
            Self::ExpiringSoon
        } else {
            Self::Valid
        }
    }

    /// Classifies a report by its next-inspection date.
    #[must_use]
    pub fn of(report: &Report, now: DateTime<Utc>) -> Self {
        Self::classify(report.header.next_inspection_date, now)
    }

    /// Badge text shown next to a report.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Expired => "Exspirované",
            Self::ExpiringSoon => "Končiaca platnosť",
            Self::Valid => "V poriadku",
        }
    }
}

/// Dashboard counters over a collection of reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    /// Number of reports.
    pub total: usize,
    /// Reports whose next inspection is further than the warning window.
    pub valid: usize,
    /// Reports due within the warning window.
    pub expiring_soon: usize,
    /// Overdue reports.
    pub expired: usize,
}

impl StatusCounts {
    /// Classifies every report and counts the outcomes.
    pub fn tally<'a>(reports: impl IntoIterator<Item = &'a Report>, now: DateTime<Utc>) -> Self {
        reports
            .into_iter()
            .fold(Self::default(), |mut counts, report| {
                counts.total += 1;
                match Status::of(report, now) {
                    Status::Expired => counts.expired += 1,
                    Status::ExpiringSoon => counts.expiring_soon += 1,
                    Status::Valid => counts.valid += 1,
                }
                counts
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::ReportKind;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 9, 30, 0).unwrap()
    }

    fn in_days(days: i64) -> NaiveDate {
        now().date_naive() + Duration::days(days)
    }

    #[test]
    fn ten_days_ahead_is_expiring_soon() {
        assert_eq!(Status::classify(in_days(10), now()), Status::ExpiringSoon);
    }

    #[test]
    fn forty_days_ahead_is_valid() {
        assert_eq!(Status::classify(in_days(40), now()), Status::Valid);
    }

    #[test]
    fn yesterday_is_expired() {
        assert_eq!(Status::classify(in_days(-1), now()), Status::Expired);
    }

    #[test]
    fn window_boundary_is_exclusive() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap();
        let edge = now.date_naive() + Duration::days(EXPIRY_WARNING_DAYS);

        assert_eq!(Status::classify(edge, now), Status::Valid);
        assert_eq!(Status::classify(now.date_naive(), now), Status::ExpiringSoon);
    }

    #[test]
    fn classification_never_improves_as_time_passes() {
        let due = in_days(20);
        let mut previous = Status::Valid;
        for hours in (-24 * 60..24 * 60).step_by(7) {
            let status = Status::classify(due, now() + Duration::hours(hours));
            assert!(status <= previous, "{status:?} after {previous:?}");
            previous = status;
        }
        assert_eq!(previous, Status::Expired);
    }

    #[test]
    fn tally_counts_every_report_once() {
        let today = now().date_naive();
        let mut reports = Vec::new();
        for days in [-5, -1, 3, 29, 31, 365] {
            let mut report = Report::draft(ReportKind::PressureVessel, today);
            report.header.next_inspection_date = in_days(days);
            reports.push(report);
        }

        let counts = StatusCounts::tally(&reports, now());

        assert_eq!(
            counts,
            StatusCounts {
                total: 6,
                valid: 2,
                expiring_soon: 2,
                expired: 2,
            }
        );
    }
}
