use crate::types::{
    AggregateRow, ColumnSpec, Dimension, Kpis, RatingMatrixRow, Record, TimeSeries, GRADES,
};
use crate::util::round1;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Frequency summary of one categorical column.
///
/// Missing values are excluded from both the counts and the percentage
/// denominator. Rows are ordered by frequency descending (ties by label) and
/// a synthetic `Total` row is appended, so even an empty column yields one
/// row instead of an empty table.
pub fn aggregate<'a, I>(values: I) -> Vec<AggregateRow>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts: HashMap<&'a str, u64> = HashMap::new();
    for value in values.into_iter().flatten() {
        *counts.entry(value).or_insert(0) += 1;
    }
    let total: u64 = counts.values().sum();

    let mut rows: Vec<AggregateRow> = counts
        .into_iter()
        .map(|(label, frequency)| AggregateRow {
            label: label.to_string(),
            frequency,
            percentage: if total == 0 {
                0.0
            } else {
                frequency as f64 / total as f64 * 100.0
            },
        })
        .collect();
    rows.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.label.cmp(&b.label))
    });

    let share_sum: f64 = rows.iter().map(|r| r.percentage).sum();
    rows.push(AggregateRow {
        label: "Total".to_string(),
        frequency: total,
        percentage: share_sum,
    });
    rows
}

/// Column specs for a frequency summary table. The percentage column carries
/// the fixed one-decimal display hint.
pub fn aggregate_columns(label: &str) -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::text(label, "label"),
        ColumnSpec::numeric("Frequency", "frequency", None),
        ColumnSpec::numeric("Percentage", "percentage", Some(1)),
    ]
}

/// Joint value counts of the six rating dimensions, reindexed over the fixed
/// grade axis. Grade/dimension pairs absent from the snapshot count as zero,
/// so the table always has exactly one row per grade in S..D order.
pub fn rating_matrix(records: &[Record]) -> Vec<RatingMatrixRow> {
    let mut counts: HashMap<(usize, &str), u64> = HashMap::new();
    for record in records {
        for (i, dimension) in Dimension::ALL.iter().enumerate() {
            if let Some(grade) = record.rating(*dimension) {
                *counts.entry((i, grade)).or_insert(0) += 1;
            }
        }
    }

    GRADES
        .iter()
        .map(|grade| {
            let cell = |i: usize| counts.get(&(i, *grade)).copied().unwrap_or(0);
            RatingMatrixRow {
                rating: grade.to_string(),
                stamina: cell(0),
                tenacity: cell(1),
                precision: cell(2),
                reaction: cell(3),
                accuracy: cell(4),
                agility: cell(5),
            }
        })
        .collect()
}

pub fn rating_columns() -> Vec<ColumnSpec> {
    let mut columns = vec![ColumnSpec::text("Rating", "rating")];
    for dimension in Dimension::ALL {
        columns.push(ColumnSpec::numeric(dimension.id(), dimension.id(), None));
    }
    columns
}

/// Headline numbers: response count, completion against the eligible
/// population, and flagged-issue count. A zero population reports 0.0
/// completion instead of dividing by zero.
pub fn kpis(records: &[Record], eligible_population: u64) -> Kpis {
    let total_responses = records.len() as u64;
    let completion_pct = if eligible_population == 0 {
        0.0
    } else {
        round1(total_responses as f64 / eligible_population as f64 * 100.0)
    };
    let total_issues = records.iter().filter(|r| r.error).count() as u64;
    Kpis {
        total_responses,
        completion_pct,
        total_issues,
    }
}

/// Daily and cumulative response counts over the observed date range.
///
/// Days between the first and last response with no submissions appear with
/// a zero daily count, so the cumulative series covers every calendar day.
/// Records without a parsable timestamp are skipped.
pub fn time_series(records: &[Record]) -> TimeSeries {
    let mut counts: HashMap<NaiveDate, u64> = HashMap::new();
    for record in records {
        if let Some(ts) = record.timestamp {
            *counts.entry(ts.date()).or_insert(0) += 1;
        }
    }
    let (Some(&first), Some(&last)) = (counts.keys().min(), counts.keys().max()) else {
        return TimeSeries::default();
    };

    let mut series = TimeSeries::default();
    let mut running = 0u64;
    let mut day = first;
    while day <= last {
        let n = counts.get(&day).copied().unwrap_or(0);
        running += n;
        series.days.push(day);
        series.daily.push(n);
        series.cumulative.push(running);
        let Some(next) = day.succ_opt() else { break };
        day = next;
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(country: Option<&str>, timestamp: Option<&str>) -> Record {
        Record {
            timestamp: crate::util::parse_timestamp(timestamp),
            country: country.map(str::to_string),
            speciality: None,
            stamina: None,
            tenacity: None,
            precision: None,
            reaction: None,
            accuracy: None,
            agility: None,
            first_collab: None,
            error: false,
            error_reason: None,
        }
    }

    #[test]
    fn aggregate_counts_shares_and_total() {
        let values = [
            Some("Sweden"),
            Some("Japan"),
            Some("Sweden"),
            None,
            Some("Chile"),
            Some("Sweden"),
        ];
        let rows = aggregate(values);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].label, "Sweden");
        assert_eq!(rows[0].frequency, 3);
        assert_eq!(rows[1].label, "Chile");
        assert_eq!(rows[2].label, "Japan");

        let data = &rows[..rows.len() - 1];
        let freq_sum: u64 = data.iter().map(|r| r.frequency).sum();
        let pct_sum: f64 = data.iter().map(|r| r.percentage).sum();
        assert_eq!(freq_sum, 5);
        assert!((pct_sum - 100.0).abs() < 0.1);

        let total = rows.last().unwrap();
        assert_eq!(total.label, "Total");
        assert_eq!(total.frequency, 5);
        assert!((total.percentage - 100.0).abs() < 0.1);
    }

    #[test]
    fn aggregate_orders_ties_by_label() {
        let rows = aggregate([Some("b"), Some("a"), Some("c"), Some("a")]);
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["a", "b", "c", "Total"]);
    }

    #[test]
    fn aggregate_of_nothing_is_the_zero_total_row() {
        let empty: [Option<&str>; 0] = [];
        for rows in [aggregate(empty), aggregate([None::<&str>, None])] {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].label, "Total");
            assert_eq!(rows[0].frequency, 0);
            assert_eq!(rows[0].percentage, 0.0);
        }
    }

    #[test]
    fn rating_matrix_keeps_the_full_grade_axis() {
        let mut r = record(None, None);
        r.stamina = Some("S".to_string());
        r.agility = Some("D".to_string());
        let mut r2 = record(None, None);
        r2.stamina = Some("S".to_string());

        let matrix = rating_matrix(&[r, r2]);
        let grades: Vec<&str> = matrix.iter().map(|row| row.rating.as_str()).collect();
        assert_eq!(grades, GRADES);

        assert_eq!(matrix[0].stamina, 2);
        assert_eq!(matrix[4].agility, 1);
        // Everything the snapshot never mentioned stays zero.
        assert_eq!(matrix[0].tenacity, 0);
        assert_eq!(matrix[2].precision, 0);
    }

    #[test]
    fn rating_matrix_of_empty_snapshot_is_all_zero() {
        let matrix = rating_matrix(&[]);
        assert_eq!(matrix.len(), GRADES.len());
        for row in &matrix {
            for dimension in Dimension::ALL {
                assert_eq!(row.count(dimension), 0);
            }
        }
    }

    #[test]
    fn kpis_round_completion_to_one_decimal() {
        let records: Vec<Record> = (0..128).map(|_| record(None, None)).collect();
        let k = kpis(&records, 12800);
        assert_eq!(k.total_responses, 128);
        assert_eq!(k.completion_pct, 1.0);
        assert_eq!(k.total_issues, 0);
    }

    #[test]
    fn kpis_count_flagged_issues() {
        let mut records = vec![record(None, None), record(None, None)];
        records[1].error = true;
        let k = kpis(&records, 0);
        assert_eq!(k.total_issues, 1);
        assert_eq!(k.completion_pct, 0.0);
    }

    #[test]
    fn kpis_of_empty_snapshot_are_zero() {
        let k = kpis(&[], 12800);
        assert_eq!(k.total_responses, 0);
        assert_eq!(k.completion_pct, 0.0);
        assert_eq!(k.total_issues, 0);
    }

    #[test]
    fn time_series_single_record_is_a_single_day() {
        let series = time_series(&[record(None, Some("2021-08-07 10:30:00"))]);
        assert_eq!(series.days.len(), 1);
        assert_eq!(series.daily, vec![1]);
        assert_eq!(series.cumulative, vec![1]);
    }

    #[test]
    fn time_series_zero_fills_gap_days() {
        let records = vec![
            record(None, Some("2021-08-01 09:00:00")),
            record(None, Some("2021-08-01 17:00:00")),
            record(None, Some("2021-08-04 12:00:00")),
            record(None, None),
        ];
        let series = time_series(&records);

        assert_eq!(series.days.len(), 4);
        assert_eq!(series.daily, vec![2, 0, 0, 1]);
        assert_eq!(series.cumulative, vec![2, 2, 2, 3]);

        // Cumulative never decreases and ends at the timestamped count.
        assert!(series.cumulative.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*series.cumulative.last().unwrap(), 3);
    }

    #[test]
    fn time_series_of_empty_snapshot_is_empty() {
        let series = time_series(&[]);
        assert!(series.days.is_empty());
        assert!(series.daily.is_empty());
        assert!(series.cumulative.is_empty());
    }
}
