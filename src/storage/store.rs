//! The in-memory report collection and its persistent mirror.

use std::io;

use chrono::{DateTime, Datelike, Utc};
use rand::Rng;

use crate::{
    domain::{Report, ReportId, ReportKind, StatusCounts},
    storage::{KeyValueStore, demo::demo_reports},
};

/// Key under which the serialized collection is stored.
pub const STORAGE_KEY: &str = "tlak_revizie_db";

/// Errors from writing the collection.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be written.
    #[error("failed to write the report store: {0}")]
    Io(#[from] io::Error),

    /// The collection could not be serialized.
    #[error("failed to serialize reports: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A saved report cannot change its type.
    #[error("report {id} is a {stored} report and cannot be saved as {requested}")]
    KindMismatch {
        /// The report identifier.
        id: ReportId,
        /// Kind of the stored report.
        stored: ReportKind,
        /// Kind of the report being saved.
        requested: ReportKind,
    },
}

/// Ordered collection of reports, newest first, mirrored to a
/// [`KeyValueStore`] after every change.
#[derive(Debug)]
pub struct ReportStore<S> {
    backend: S,
    reports: Vec<Report>,
}

impl<S: KeyValueStore> ReportStore<S> {
    /// Loads the collection from the backend.
    ///
    /// An absent, empty or unreadable collection is replaced by the demo
    /// records. Failures are logged, never returned.
    pub fn load(backend: S) -> Self {
        Self::load_at(backend, Utc::now())
    }

    /// As [`ReportStore::load`], with an explicit clock for the demo data.
    #[tracing::instrument(level = "debug", skip(backend))]
    pub fn load_at(backend: S, now: DateTime<Utc>) -> Self {
        let reports = match backend.get(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Report>>(&raw) {
                Ok(reports) if !reports.is_empty() => Some(reports),
                Ok(_) => {
                    tracing::debug!("Stored collection is empty");
                    None
                }
                Err(e) => {
                    tracing::debug!("Failed to parse stored reports: {e}");
                    None
                }
            },
            Ok(None) => {
                tracing::debug!("No stored reports");
                None
            }
            Err(e) => {
                tracing::debug!("Failed to read stored reports: {e}");
                None
            }
        };

        let reports = reports.unwrap_or_else(|| {
            tracing::info!("Seeding demo reports");
            demo_reports(now)
        });
        tracing::debug!("Loaded {} reports", reports.len());

        Self { backend, reports }
    }

    /// Writes the whole collection to the backend.
    ///
    /// Nothing is written while the collection is empty, so previously saved
    /// data survives until a record is added again.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    pub fn persist(&mut self) -> Result<(), StoreError> {
        if self.reports.is_empty() {
            tracing::debug!("Collection is empty, skipping write");
            return Ok(());
        }
        let json = serde_json::to_string(&self.reports)?;
        self.backend.set(STORAGE_KEY, &json)?;
        Ok(())
    }

    /// Inserts or replaces a report; see [`ReportStore::upsert_at`].
    ///
    /// # Errors
    ///
    /// See [`ReportStore::upsert_at`].
    pub fn upsert(&mut self, report: Report) -> Result<&Report, StoreError> {
        self.upsert_at(report, Utc::now())
    }

    /// Inserts or replaces a report and persists the collection.
    ///
    /// When persisting fails the collection is left as it was before the
    /// call.
    ///
    /// A report with an empty identifier receives a fresh id, `now` as its
    /// creation time and, when its number is empty, a generated number of the
    /// form `TNS-2024/042`; it is then placed at the front. A report whose id
    /// is already stored replaces that record in place. Any other id is
    /// placed at the front unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::KindMismatch`] if the stored record with the
    /// same id has another kind, or an error if persisting fails.
    pub fn upsert_at(
        &mut self,
        mut report: Report,
        now: DateTime<Utc>,
    ) -> Result<&Report, StoreError> {
        if report.id().is_empty() {
            report.assign_identity(ReportId::generate(), now);
            if report.header.report_number.is_empty() {
                report.header.report_number = generate_number(report.kind(), now);
            }
            tracing::debug!(
                "Assigned id {} to {}",
                report.id(),
                report.header.report_number
            );
        }

        match self.position(report.id()) {
            Some(index) => {
                let stored = self.reports[index].kind();
                if stored != report.kind() {
                    return Err(StoreError::KindMismatch {
                        id: report.id().clone(),
                        stored,
                        requested: report.kind(),
                    });
                }
                let previous = std::mem::replace(&mut self.reports[index], report);
                self.persist_or(|reports| reports[index] = previous)?;
                tracing::info!("Updated report {}", self.reports[index].header.report_number);
                Ok(&self.reports[index])
            }
            None => {
                self.reports.insert(0, report);
                self.persist_or(|reports| {
                    reports.remove(0);
                })?;
                tracing::info!("Created report {}", self.reports[0].header.report_number);
                Ok(&self.reports[0])
            }
        }
    }

    /// Deletes a report. Returns the removed record, if it was present. The
    /// record stays in the collection if persisting fails.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn remove(&mut self, id: &ReportId) -> Result<Option<Report>, StoreError> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };
        let removed = self.reports.remove(index);
        if let Err(e) = self.persist() {
            self.reports.insert(index, removed);
            return Err(e);
        }
        tracing::info!("Deleted report {}", removed.header.report_number);
        Ok(Some(removed))
    }

    /// Replaces the collection with the demo records and persists it.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn seed_demo(&mut self, now: DateTime<Utc>) -> Result<(), StoreError> {
        let previous = std::mem::replace(&mut self.reports, demo_reports(now));
        self.persist_or(|reports| *reports = previous)
    }

    /// Persists the collection, applying `undo` to it if that fails.
    fn persist_or(&mut self, undo: impl FnOnce(&mut Vec<Report>)) -> Result<(), StoreError> {
        self.persist().inspect_err(|e| {
            tracing::warn!("{e}; change reverted");
            undo(&mut self.reports);
        })
    }

    /// The underlying backend.
    pub const fn backend(&self) -> &S {
        &self.backend
    }
}

impl<S> ReportStore<S> {
    /// All reports, newest first.
    #[must_use]
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Looks up a report by id.
    #[must_use]
    pub fn get(&self, id: &ReportId) -> Option<&Report> {
        self.reports.iter().find(|report| report.id() == id)
    }

    /// Resolves a report by exact id, falling back to exact report number.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&Report> {
        self.get(&ReportId::from(key)).or_else(|| {
            self.reports
                .iter()
                .find(|report| report.header.report_number == key)
        })
    }

    /// Reports whose operator, serial number, report number or site name
    /// contains `term`, ignoring case. Collection order is preserved.
    pub fn search<'a>(&'a self, term: &str) -> impl Iterator<Item = &'a Report> + use<'a, S> {
        let needle = term.trim().to_lowercase();
        self.reports
            .iter()
            .filter(move |report| needle.is_empty() || report.matches(&needle))
    }

    /// Dashboard counters at `now`.
    #[must_use]
    pub fn counts(&self, now: DateTime<Utc>) -> StatusCounts {
        StatusCounts::tally(&self.reports, now)
    }

    fn position(&self, id: &ReportId) -> Option<usize> {
        if id.is_empty() {
            return None;
        }
        self.reports.iter().position(|report| report.id() == id)
    }
}

fn generate_number(kind: ReportKind, now: DateTime<Utc>) -> String {
    let sequence: u16 = rand::thread_rng().gen_range(0..1000);
    format!("{}-{}/{sequence:03}", kind.code(), now.year())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use regex::Regex;

    use super::*;
    use crate::{
        domain::{Field, Status},
        storage::{FailingStore, FileStore, MemoryStore},
    };

    fn now() -> DateTime<Utc> {
        "2024-06-10T09:30:00Z".parse().unwrap()
    }

    fn today() -> NaiveDate {
        now().date_naive()
    }

    fn empty_store() -> ReportStore<MemoryStore> {
        let mut store = ReportStore::load_at(MemoryStore::default(), now());
        store.reports.clear();
        store
    }

    fn draft(kind: ReportKind, operator: &str) -> Report {
        let mut report = Report::draft(kind, today());
        report.header.operator_name = operator.to_string();
        report
    }

    #[test]
    fn absent_collection_seeds_demo() {
        let store = ReportStore::load_at(MemoryStore::default(), now());
        assert_eq!(store.reports().len(), 5);
        assert_eq!(store.reports()[0].id().as_str(), "demo-1");
    }

    #[test]
    fn empty_or_malformed_collection_seeds_demo() {
        for raw in ["[]", "", "{not json", "[{\"id\": 3}]"] {
            let backend = MemoryStore::with(STORAGE_KEY, raw);
            let store = ReportStore::load_at(backend, now());
            assert_eq!(store.reports().len(), 5, "input {raw:?}");
        }
    }

    #[test]
    fn new_draft_gets_identity_and_number() {
        let mut store = empty_store();
        let saved = store
            .upsert_at(draft(ReportKind::PressureVessel, "ACME"), now())
            .unwrap()
            .clone();

        assert!(!saved.id().is_empty());
        assert_eq!(saved.created_at(), now());
        let pattern = Regex::new(r"^TNS-2024/\d{3}$").unwrap();
        assert!(
            pattern.is_match(&saved.header.report_number),
            "{}",
            saved.header.report_number
        );
    }

    #[test]
    fn gas_number_uses_gz_prefix_and_keeps_manual_number() {
        let mut store = empty_store();
        let generated = store
            .upsert_at(draft(ReportKind::GasInstallation, "A"), now())
            .unwrap()
            .header
            .report_number
            .clone();
        assert!(generated.starts_with("GZ-2024/"));

        let mut manual = draft(ReportKind::GasInstallation, "B");
        manual.header.report_number = "VLASTNE-1".to_string();
        let saved = store.upsert_at(manual, now()).unwrap();
        assert_eq!(saved.header.report_number, "VLASTNE-1");
    }

    #[test]
    fn new_reports_go_first_and_updates_stay_in_place() {
        let mut store = empty_store();
        let first = store
            .upsert_at(draft(ReportKind::PressureVessel, "First"), now())
            .unwrap()
            .clone();
        store
            .upsert_at(draft(ReportKind::GasInstallation, "Second"), now())
            .unwrap();
        store
            .upsert_at(draft(ReportKind::PressureVessel, "Third"), now())
            .unwrap();

        let mut edited = first.clone();
        edited.header.operator_name = "First, renamed".to_string();
        store.upsert_at(edited, now()).unwrap();

        let operators: Vec<_> = store
            .reports()
            .iter()
            .map(|r| r.header.operator_name.as_str())
            .collect();
        assert_eq!(operators, ["Third", "Second", "First, renamed"]);
        assert_eq!(store.reports()[2].header.report_number, first.header.report_number);
    }

    #[test]
    fn creation_time_does_not_decrease() {
        let mut store = empty_store();
        let later = now() + chrono::TimeDelta::seconds(5);
        store
            .upsert_at(draft(ReportKind::PressureVessel, "A"), now())
            .unwrap();
        store
            .upsert_at(draft(ReportKind::PressureVessel, "B"), later)
            .unwrap();

        assert!(store.reports()[0].created_at() >= store.reports()[1].created_at());
    }

    #[test]
    fn kind_cannot_change_on_update() {
        let mut store = empty_store();
        let saved = store
            .upsert_at(draft(ReportKind::PressureVessel, "A"), now())
            .unwrap()
            .clone();

        let mut other = draft(ReportKind::GasInstallation, "A");
        other.assign_identity(saved.id().clone(), saved.created_at());

        let error = store.upsert_at(other, now()).unwrap_err();
        assert!(matches!(error, StoreError::KindMismatch { .. }));
        assert_eq!(store.get(saved.id()).unwrap().kind(), ReportKind::PressureVessel);
    }

    #[test]
    fn remove_deletes_only_that_report() {
        let mut store = ReportStore::load_at(MemoryStore::default(), now());
        let id = ReportId::from("demo-3");

        let removed = store.remove(&id).unwrap().unwrap();
        assert_eq!(removed.header.operator_name, "Bytové družstvo Petržalka");
        assert_eq!(store.reports().len(), 4);
        assert!(store.get(&id).is_none());
        assert!(store.remove(&id).unwrap().is_none());
    }

    #[test]
    fn removing_last_report_keeps_persisted_data() {
        let mut store = empty_store();
        let saved = store
            .upsert_at(draft(ReportKind::PressureVessel, "Only"), now())
            .unwrap()
            .clone();

        store.remove(saved.id()).unwrap();
        assert!(store.reports().is_empty());

        let raw = store.backend().get(STORAGE_KEY).unwrap().unwrap();
        let persisted: Vec<Report> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, vec![saved]);
    }

    #[test]
    fn search_matches_site_name_only() {
        let store = ReportStore::load_at(MemoryStore::default(), now());

        let hits: Vec<_> = store.search("kompresorov").map(Report::id).collect();
        assert_eq!(hits, [&ReportId::from("demo-5")]);
    }

    #[test]
    fn search_is_case_insensitive_and_ordered() {
        let store = ReportStore::load_at(MemoryStore::default(), now());

        let hits: Vec<_> = store.search("BRATISLAVA").collect();
        assert!(hits.is_empty(), "addresses are not searched");

        let hits: Vec<_> = store
            .search("rev-20")
            .map(|r| r.id().as_str())
            .collect();
        assert_eq!(hits, ["demo-1", "demo-2", "demo-5"]);

        let serial: Vec<_> = store.search("ac-778").map(|r| r.id().as_str()).collect();
        assert_eq!(serial, ["demo-2"]);

        assert_eq!(store.search("  ").count(), 5);
    }

    #[test]
    fn find_by_id_or_number() {
        let store = ReportStore::load_at(MemoryStore::default(), now());

        assert_eq!(store.find("demo-4").unwrap().header.report_number, "GZ-2022-118");
        assert_eq!(store.find("GZ-2022-118").unwrap().id().as_str(), "demo-4");
        assert!(store.find("gz-2022-118").is_none());
    }

    #[test]
    fn counts_cover_collection() {
        let store = ReportStore::load_at(MemoryStore::default(), now());
        let counts = store.counts(now());

        assert_eq!(counts.total, 5);
        assert_eq!(
            counts.valid + counts.expiring_soon + counts.expired,
            counts.total
        );
        assert_eq!(
            Status::of(&store.reports()[1], now()),
            Status::Expired
        );
    }

    #[test]
    fn file_store_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = ReportStore::load_at(FileStore::new(tmp.path()), now());
        let mut report = draft(ReportKind::PressureVessel, "Round Trip");
        report
            .set_field(Field::Measurement(crate::domain::MeasurementPoint::ShellMiddle), "3,75")
            .unwrap();
        let precise: DateTime<Utc> = "2024-06-10T09:30:00.123456789Z".parse().unwrap();
        store.upsert_at(report, precise).unwrap();

        let reloaded = ReportStore::load_at(FileStore::new(tmp.path()), now());
        assert_eq!(reloaded.reports(), store.reports());
        assert_eq!(reloaded.reports().len(), 6);
    }

    #[test]
    fn seed_demo_replaces_collection() {
        let mut store = empty_store();
        store
            .upsert_at(draft(ReportKind::PressureVessel, "Mine"), now())
            .unwrap();

        store.seed_demo(now()).unwrap();

        assert_eq!(store.reports().len(), 5);
        assert!(store.search("mine").next().is_none());
    }

    fn failing_store(failures: usize) -> ReportStore<FailingStore> {
        ReportStore::load_at(FailingStore::new(MemoryStore::default(), failures), now())
    }

    #[test]
    fn failed_insert_is_not_kept() {
        let mut store = failing_store(1);

        let error = store
            .upsert_at(draft(ReportKind::PressureVessel, "Mine"), now())
            .unwrap_err();
        assert!(matches!(error, StoreError::Io(_)));
        assert_eq!(store.reports().len(), 5);
        assert!(store.search("mine").next().is_none());

        store
            .upsert_at(draft(ReportKind::PressureVessel, "Mine"), now())
            .unwrap();
        assert_eq!(store.reports().len(), 6);
        assert_eq!(store.search("mine").count(), 1);
    }

    #[test]
    fn failed_update_keeps_previous_record() {
        let mut store = failing_store(1);
        let mut edited = store.find("demo-2").unwrap().clone();
        let before = edited.clone();
        edited.header.operator_name = "Renamed".to_string();

        assert!(store.upsert_at(edited, now()).is_err());
        assert_eq!(store.find("demo-2"), Some(&before));
    }

    #[test]
    fn failed_remove_keeps_record_in_place() {
        let mut store = failing_store(1);
        let id = ReportId::from("demo-3");
        let order: Vec<_> = store.reports().iter().map(|r| r.id().clone()).collect();

        assert!(store.remove(&id).is_err());
        let after: Vec<_> = store.reports().iter().map(|r| r.id().clone()).collect();
        assert_eq!(after, order);

        assert!(store.remove(&id).unwrap().is_some());
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn failed_seed_keeps_collection() {
        let mut store = failing_store(1);
        store.reports.truncate(1);

        assert!(store.seed_demo(now()).is_err());
        assert_eq!(store.reports().len(), 1);
    }

    #[test]
    fn legacy_records_load_instead_of_demo_data() {
        let raw = r#"[
            {"id": "MINE-1", "reportDate": "2023-05-01", "nextInspectionDate": "2024-05-01",
             "reportNumber": "REV-1", "operatorName": "Strojáreň", "serialNumber": "S-1"},
            {"id": "MINE-2", "reportType": "GZ", "reportDate": "", "nextInspectionDate": "",
             "reportNumber": "GZ-1", "operatorName": "Kotolňa"}
        ]"#;
        let mut store = ReportStore::load_at(MemoryStore::with(STORAGE_KEY, raw), now());

        let ids: Vec<_> = store.reports().iter().map(|r| r.id().as_str()).collect();
        assert_eq!(ids, ["MINE-1", "MINE-2"]);
        assert_eq!(store.reports()[0].kind(), ReportKind::PressureVessel);
        assert_eq!(store.reports()[1].kind(), ReportKind::GasInstallation);

        store
            .upsert_at(draft(ReportKind::GasInstallation, "New"), now())
            .unwrap();
        let persisted = store.backend().get(STORAGE_KEY).unwrap().unwrap();
        assert!(persisted.contains("MINE-1"));
        assert!(persisted.contains("MINE-2"));
        assert!(!persisted.contains("demo-1"));
    }
}
