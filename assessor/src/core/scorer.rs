//! Psychometric scoring: chosen option position to integer score.

use crate::core::types::ScaleItem;

/// Score the selected option of a scale item.
///
/// Selection is communicated positionally (the instruction index), so the
/// score is read at the given position in the option order, not by label.
/// A missing item, an empty option mapping, or an out-of-range index all
/// score 0, the neutral no-signal value.
pub fn score_selection(item: Option<&ScaleItem>, selected_index: usize) -> i64 {
    let Some(item) = item else {
        return 0;
    };
    item.options
        .get(selected_index)
        .map(|option| option.score)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::yes_no_item;

    #[test]
    fn score_is_read_by_position() {
        let item = yes_no_item("q");
        assert_eq!(score_selection(Some(&item), 0), 1);
        assert_eq!(score_selection(Some(&item), 1), 0);
    }

    #[test]
    fn missing_item_scores_zero() {
        assert_eq!(score_selection(None, 0), 0);
        assert_eq!(score_selection(None, 7), 0);
    }

    #[test]
    fn out_of_range_index_scores_zero() {
        let item = yes_no_item("q");
        assert_eq!(score_selection(Some(&item), 2), 0);
    }

    #[test]
    fn item_without_options_scores_zero() {
        let item: ScaleItem = serde_json::from_str(r#"{"question": "bare"}"#).expect("parse");
        assert_eq!(score_selection(Some(&item), 0), 0);
    }

    #[test]
    fn scoring_is_idempotent() {
        let item = yes_no_item("q");
        let first = score_selection(Some(&item), 0);
        let second = score_selection(Some(&item), 0);
        assert_eq!(first, second);
    }

    #[test]
    fn scores_beyond_the_binary_domain_pass_through() {
        let item: ScaleItem = serde_json::from_str(
            r#"{"question": "q", "options": {"never": 0, "sometimes": 2, "always": 5}}"#,
        )
        .expect("parse");
        assert_eq!(score_selection(Some(&item), 1), 2);
        assert_eq!(score_selection(Some(&item), 2), 5);
    }
}
