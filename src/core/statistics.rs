// Label statistics - per-letter sample counts derived from a dataset snapshot

use crate::models::dataset::{Dataset, LabelStatistics};

/// Count rows per alphabet label. Every label appears in the result.
///
/// Recomputed from scratch on each call; linear in the row count.
pub fn compute_counts(dataset: &Dataset) -> LabelStatistics {
    let mut stats = LabelStatistics::zeroed();

    for row in dataset.rows() {
        match row.sign_label() {
            Some(label) => *stats.counts.entry(label).or_insert(0) += 1,
            None => stats.unrecognized_rows += 1,
        }
    }
    stats.total_rows = dataset.len();

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dataset_store::tests::row;
    use crate::models::dataset::SignLabel;

    #[test]
    fn test_counts_for_empty_dataset() {
        let stats = compute_counts(&Dataset::new());
        assert_eq!(stats.total_rows, 0);
        assert_eq!(stats.counts.len(), SignLabel::ALL.len());
        assert!(stats.counts.values().all(|c| *c == 0));
    }

    #[test]
    fn test_counts_per_label() {
        let dataset = Dataset::from_rows(vec![row(1.0, "a"), row(2.0, "a"), row(3.0, "b")]);
        let stats = compute_counts(&dataset);

        assert_eq!(stats.count(SignLabel::A), 2);
        assert_eq!(stats.count(SignLabel::B), 1);
        for label in SignLabel::ALL.iter().skip(2) {
            assert_eq!(stats.count(*label), 0, "label {}", label);
        }
        assert_eq!(stats.total_rows, 3);
        assert_eq!(stats.unrecognized_rows, 0);
    }

    #[test]
    fn test_counts_report_foreign_letters() {
        let dataset = Dataset::from_rows(vec![
            row(1.0, "j"),
            row(2.0, "c"),
            row(3.0, ""),
            row(4.0, "A"),
        ]);
        let stats = compute_counts(&dataset);

        assert_eq!(stats.count(SignLabel::C), 1);
        assert_eq!(stats.count(SignLabel::A), 0);
        assert_eq!(stats.unrecognized_rows, 3);
        assert_eq!(stats.total_rows, 4);
    }
}
