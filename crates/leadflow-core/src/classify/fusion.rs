//! Cultural-context confidence fusion.

use leadflow_types::client::CulturalContext;

/// How much one confidence must exceed the other before that side is taken
/// wholesale instead of merged.
const TAKEOVER_MARGIN: f64 = 0.1;

/// Merge two cultural contexts.
///
/// When one side's confidence exceeds the other's by more than the margin,
/// that side wins wholesale. Otherwise fields merge preferring the newer
/// value when present, list fields union with deduplication, and the result
/// keeps the maximum confidence.
pub fn merge_cultural_context(old: &CulturalContext, new: &CulturalContext) -> CulturalContext {
    let old_confidence = old.confidence.unwrap_or(0.0);
    let new_confidence = new.confidence.unwrap_or(0.0);

    if new_confidence > old_confidence + TAKEOVER_MARGIN {
        return new.clone();
    }
    if old_confidence > new_confidence + TAKEOVER_MARGIN {
        return old.clone();
    }

    CulturalContext {
        likely_origin: new.likely_origin.clone().or_else(|| old.likely_origin.clone()),
        region: new.region.clone().or_else(|| old.region.clone()),
        communication_style: new
            .communication_style
            .clone()
            .or_else(|| old.communication_style.clone()),
        dietary_restrictions: union_dedup(&old.dietary_restrictions, &new.dietary_restrictions),
        cultural_notes: union_dedup(&old.cultural_notes, &new.cultural_notes),
        confidence: if old.confidence.is_none() && new.confidence.is_none() {
            None
        } else {
            Some(old_confidence.max(new_confidence))
        },
    }
}

fn union_dedup(a: &[String], b: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(a.len() + b.len());
    for item in a.iter().chain(b.iter()) {
        if !merged.contains(item) {
            merged.push(item.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(confidence: f64) -> CulturalContext {
        CulturalContext {
            likely_origin: Some("Israel".to_string()),
            region: Some("Middle East".to_string()),
            communication_style: Some("informal".to_string()),
            dietary_restrictions: vec!["kosher".to_string()],
            cultural_notes: vec!["Hebrew-speaking".to_string()],
            confidence: Some(confidence),
        }
    }

    #[test]
    fn test_merge_is_idempotent_for_equal_inputs() {
        let ctx = context(0.7);
        let merged = merge_cultural_context(&ctx, &ctx);
        assert_eq!(merged, ctx);
    }

    #[test]
    fn test_clear_winner_taken_wholesale() {
        let old = context(0.5);
        let new = CulturalContext {
            likely_origin: Some("Russia".to_string()),
            region: None,
            communication_style: None,
            dietary_restrictions: Vec::new(),
            cultural_notes: Vec::new(),
            confidence: Some(0.9),
        };

        // new wins by >0.1: returned unchanged, even where old had more detail.
        let merged = merge_cultural_context(&old, &new);
        assert_eq!(merged, new);

        // Symmetric: old wins by >0.1.
        let merged = merge_cultural_context(&new, &old);
        assert_eq!(merged, old);
    }

    #[test]
    fn test_close_confidences_merge_field_by_field() {
        let old = context(0.6);
        let new = CulturalContext {
            likely_origin: None,
            region: Some("Levant".to_string()),
            communication_style: None,
            dietary_restrictions: vec!["kosher".to_string(), "vegetarian".to_string()],
            cultural_notes: vec!["observant".to_string()],
            confidence: Some(0.65),
        };

        let merged = merge_cultural_context(&old, &new);
        // Newer value preferred when present, older fills gaps.
        assert_eq!(merged.region.as_deref(), Some("Levant"));
        assert_eq!(merged.likely_origin.as_deref(), Some("Israel"));
        assert_eq!(merged.communication_style.as_deref(), Some("informal"));
        // Lists union with dedup.
        assert_eq!(
            merged.dietary_restrictions,
            vec!["kosher".to_string(), "vegetarian".to_string()]
        );
        assert_eq!(
            merged.cultural_notes,
            vec!["Hebrew-speaking".to_string(), "observant".to_string()]
        );
        // Max confidence kept.
        assert_eq!(merged.confidence, Some(0.65));
    }

    #[test]
    fn test_exact_margin_does_not_take_over() {
        let old = context(0.6);
        let mut new = context(0.7);
        new.likely_origin = None;

        // 0.7 is not > 0.6 + 0.1, so merge rather than takeover.
        let merged = merge_cultural_context(&old, &new);
        assert_eq!(merged.likely_origin.as_deref(), Some("Israel"));
    }

    #[test]
    fn test_missing_confidences_treated_as_zero() {
        let old = CulturalContext {
            likely_origin: Some("somewhere".to_string()),
            ..Default::default()
        };
        let new = context(0.8);

        let merged = merge_cultural_context(&old, &new);
        assert_eq!(merged, new);
    }

    #[test]
    fn test_both_missing_confidence_stays_none() {
        let old = CulturalContext {
            likely_origin: Some("a".to_string()),
            ..Default::default()
        };
        let new = CulturalContext {
            region: Some("b".to_string()),
            ..Default::default()
        };

        let merged = merge_cultural_context(&old, &new);
        assert_eq!(merged.confidence, None);
        assert_eq!(merged.likely_origin.as_deref(), Some("a"));
        assert_eq!(merged.region.as_deref(), Some("b"));
    }
}
