// Cheap record pre-filter conditions
use pillx_core::CatalogRecord;
use pillx_similarity::{edit_distance, normalize};

pub trait Filter {
    fn matches(&self, record: &CatalogRecord) -> bool;
}

pub struct RecordFilter {
    condition: FilterCondition,
}

/// Imprint text in these conditions is expected to be normalized already
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    /// Record shape label is one of these
    ShapeIn(Vec<String>),
    /// Record color field contains this token as a substring
    ColorContains(String),
    /// Text is a substring of either normalized imprint field
    ImprintContains(String),
    /// Text is a substring of, or within `max_distance` edits of, a non-empty imprint field
    ImprintNear { text: String, max_distance: usize },
    And(Vec<FilterCondition>),
    Or(Vec<FilterCondition>),
}

impl RecordFilter {
    pub fn new(condition: FilterCondition) -> Self {
        Self { condition }
    }

    pub fn condition(&self) -> &FilterCondition {
        &self.condition
    }

    fn imprints(record: &CatalogRecord) -> [String; 2] {
        [normalize(record.primary_imprint()), normalize(record.secondary_imprint())]
    }

    fn matches_condition(condition: &FilterCondition, record: &CatalogRecord) -> bool {
        match condition {
            FilterCondition::ShapeIn(labels) => {
                labels.iter().any(|label| *label == record.shape())
            }
            FilterCondition::ColorContains(token) => {
                record.color().contains(token.as_str())
            }
            FilterCondition::ImprintContains(text) => {
                !text.is_empty()
                    && Self::imprints(record)
                        .iter()
                        .any(|imprint| imprint.contains(text.as_str()))
            }
            FilterCondition::ImprintNear { text, max_distance } => {
                !text.is_empty()
                    && Self::imprints(record).iter().any(|imprint| {
                        !imprint.is_empty()
                            && (imprint.contains(text.as_str())
                                || edit_distance(text, imprint) <= *max_distance)
                    })
            }
            FilterCondition::And(conditions) => {
                conditions.iter().all(|c| Self::matches_condition(c, record))
            }
            FilterCondition::Or(conditions) => {
                conditions.iter().any(|c| Self::matches_condition(c, record))
            }
        }
    }
}

impl Filter for RecordFilter {
    fn matches(&self, record: &CatalogRecord) -> bool {
        Self::matches_condition(&self.condition, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CatalogRecord {
        CatalogRecord::new("타이레놀", "장방형", "하양 노랑").with_imprints("TY", "5-00")
    }

    #[test]
    fn test_shape_in() {
        let filter = RecordFilter::new(FilterCondition::ShapeIn(vec!["원형".into(), "장방형".into()]));
        assert!(filter.matches(&record()));
        let filter = RecordFilter::new(FilterCondition::ShapeIn(vec!["원형".into()]));
        assert!(!filter.matches(&record()));
    }

    #[test]
    fn test_color_contains_is_substring() {
        assert!(RecordFilter::new(FilterCondition::ColorContains("노랑".into())).matches(&record()));
        assert!(!RecordFilter::new(FilterCondition::ColorContains("검정".into())).matches(&record()));
    }

    #[test]
    fn test_imprint_contains_uses_normalized_fields() {
        assert!(RecordFilter::new(FilterCondition::ImprintContains("500".into())).matches(&record()));
        assert!(RecordFilter::new(FilterCondition::ImprintContains("T".into())).matches(&record()));
        assert!(!RecordFilter::new(FilterCondition::ImprintContains("TY500".into())).matches(&record()));
        assert!(!RecordFilter::new(FilterCondition::ImprintContains(String::new())).matches(&record()));
    }

    #[test]
    fn test_imprint_near() {
        let near = |text: &str| {
            RecordFilter::new(FilterCondition::ImprintNear { text: text.into(), max_distance: 2 })
                .matches(&record())
        };
        assert!(near("TY"));
        assert!(near("508"));
        assert!(near("TYX"));
        assert!(!near("ABCDE"));
    }

    #[test]
    fn test_imprint_near_ignores_blank_fields() {
        let blank = CatalogRecord::new("A", "원형", "하양");
        let filter = RecordFilter::new(FilterCondition::ImprintNear { text: "A".into(), max_distance: 2 });
        assert!(!filter.matches(&blank));
    }

    #[test]
    fn test_and_or() {
        let shape = FilterCondition::ShapeIn(vec!["원형".into()]);
        let color = FilterCondition::ColorContains("하양".into());
        assert!(RecordFilter::new(FilterCondition::Or(vec![shape.clone(), color.clone()])).matches(&record()));
        assert!(!RecordFilter::new(FilterCondition::And(vec![shape, color])).matches(&record()));
        assert!(!RecordFilter::new(FilterCondition::Or(vec![])).matches(&record()));
    }
}
