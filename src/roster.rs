use crate::score::ResultRecord;
use crate::util::mean;

/// Class-wide averages over every completed assessment this process has seen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassSummary {
    pub avg_accuracy_pct: f64,
    pub avg_reaction_secs: f64,
}

/// Append-only record of completed assessments, in completion order, kept
/// for the lifetime of the process. The dashboard and CSV export both read
/// from here; nothing writes back into the core.
#[derive(Debug, Default)]
pub struct ClassRoster {
    records: Vec<ResultRecord>,
}

impl ClassRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: ResultRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Arithmetic means over all stored records, or `None` before the first
    /// assessment completes.
    pub fn summary(&self) -> Option<ClassSummary> {
        let accuracies: Vec<f64> = self.records.iter().map(|r| r.accuracy_pct).collect();
        let reactions: Vec<f64> = self.records.iter().map(|r| r.avg_reaction_secs).collect();

        Some(ClassSummary {
            avg_accuracy_pct: mean(&accuracies)?,
            avg_reaction_secs: mean(&reactions)?,
        })
    }

    /// Serialize the dashboard to CSV, one row per student in completion
    /// order, with a header row.
    pub fn to_csv(&self) -> Result<Vec<u8>, csv::Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::FocusLevel;
    use chrono::Local;

    fn record(name: &str, accuracy: f64, reaction: f64, level: FocusLevel) -> ResultRecord {
        ResultRecord {
            student_name: name.to_string(),
            student_class: "6B".to_string(),
            accuracy_pct: accuracy,
            avg_reaction_secs: reaction,
            focus_level: level,
            recorded_at: Local::now(),
        }
    }

    #[test]
    fn test_empty_roster_has_no_summary() {
        let roster = ClassRoster::new();

        assert!(roster.is_empty());
        assert_eq!(roster.summary(), None);
    }

    #[test]
    fn test_summary_averages_two_records() {
        let mut roster = ClassRoster::new();
        roster.record(record("Asha", 80.0, 1.0, FocusLevel::High));
        roster.record(record("Ravi", 60.0, 2.0, FocusLevel::Moderate));

        let summary = roster.summary().unwrap();
        assert_eq!(summary.avg_accuracy_pct, 70.0);
        assert_eq!(summary.avg_reaction_secs, 1.5);
    }

    #[test]
    fn test_records_keep_completion_order() {
        let mut roster = ClassRoster::new();
        roster.record(record("First", 90.0, 0.4, FocusLevel::High));
        roster.record(record("Second", 50.0, 0.9, FocusLevel::Developing));
        roster.record(record("Third", 70.0, 0.6, FocusLevel::Moderate));

        let names: Vec<&str> = roster
            .records()
            .iter()
            .map(|r| r.student_name.as_str())
            .collect();
        assert_eq!(names, ["First", "Second", "Third"]);
    }

    #[test]
    fn test_single_record_summary_is_that_record() {
        let mut roster = ClassRoster::new();
        roster.record(record("Solo", 85.0, 0.75, FocusLevel::High));

        let summary = roster.summary().unwrap();
        assert_eq!(summary.avg_accuracy_pct, 85.0);
        assert_eq!(summary.avg_reaction_secs, 0.75);
    }

    #[test]
    fn test_csv_export_has_header_and_rows() {
        let mut roster = ClassRoster::new();
        roster.record(record("Asha", 90.0, 0.42, FocusLevel::High));
        roster.record(record("Ravi", 55.0, 0.91, FocusLevel::Developing));

        let bytes = roster.to_csv().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("student_name,student_class,accuracy_pct"));
        assert!(lines.next().unwrap().starts_with("Asha,6B,90.0,0.42,High"));
        assert!(lines.next().unwrap().starts_with("Ravi,6B,55.0,0.91,Developing"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_csv_export_of_empty_roster() {
        let roster = ClassRoster::new();
        let bytes = roster.to_csv().unwrap();

        // No rows were serialized, so no header was emitted either
        assert!(bytes.is_empty());
    }
}
