//! Directive composition from the active adjustment set.
//!
//! `build_directive` is pure, total, and deterministic: it never fails,
//! never touches I/O, and degrades to the baseline directive when there is
//! nothing to apply. Unknown composite keys are skipped (logged at debug)
//! so a catalog entry shipped ahead of its phrase entry cannot break
//! generation.

use tracing::debug;

use crate::catalog::{AdjustmentsState, Gender};

use super::phrases::{default_phrases, Tier};

/// Directive returned when no adjustment is active: same subject, no
/// modifications. Compared verbatim by callers and tests, do not reword
/// casually.
pub const BASELINE_DIRECTIVE: &str =
    "Professional portrait photo of the same person. Photorealistic, natural lighting.";

/// Gender-specific preservation clause. Empty for an unspecified subject.
fn gender_clause(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "Male subject - keep beard and facial hair intact.",
        Gender::Female => "Female subject - keep makeup intact.",
        Gender::Unspecified => "",
    }
}

/// Synthesize the natural-language generation directive for the current
/// adjustment selections and subject-gender hint.
///
/// The template deliberately states the identity mandate both before and
/// after the change list; the generation backend over-transforms without
/// that redundancy.
pub fn build_directive(adjustments: &AdjustmentsState, gender: Gender) -> String {
    let table = default_phrases();

    let mut parts: Vec<&str> = Vec::new();
    for (key, value) in adjustments.active() {
        match table.get(key) {
            Some(set) => parts.push(set.for_tier(Tier::for_intensity(value.intensity))),
            None => debug!("No phrase entry for adjustment '{}', skipping", key),
        }
    }

    if parts.is_empty() {
        return BASELINE_DIRECTIVE.to_string();
    }

    let preamble = match gender_clause(gender) {
        "" => "Highly detailed professional portrait.".to_string(),
        clause => format!("Highly detailed professional portrait. {}", clause),
    };

    format!(
        "{preamble}\n\
         PRESERVE IDENTITY: It is CRITICAL to keep the EXACT same person, face shape, \
         unique facial features, and personal characteristics.\n\
         The subject must remain 100% recognizable as the same individual.\n\
         ONLY apply the following aesthetic enhancements: {enhancements}.\n\
         The result must look like the SAME person after a successful clinical aesthetic procedure.\n\
         DO NOT transform into a different person. Keep same hair, skin texture, skin tone, \
         eye color, clothing, and background.\n\
         Extreme photorealism, natural clinical lighting, high resolution, no artifacts.",
        preamble = preamble,
        enhancements = parts.join(". "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AdjustmentValue;

    fn single(area: &str, option: &str, intensity: u8, enabled: bool) -> AdjustmentsState {
        let mut state = AdjustmentsState::new();
        state.set(AdjustmentValue::new(area, option, intensity, enabled));
        state
    }

    #[test]
    fn test_empty_adjustments_return_baseline_verbatim() {
        let state = AdjustmentsState::new();
        assert_eq!(build_directive(&state, Gender::Unspecified), BASELINE_DIRECTIVE);
        // Baseline is gender-independent
        assert_eq!(build_directive(&state, Gender::Male), BASELINE_DIRECTIVE);
        assert_eq!(build_directive(&state, Gender::Female), BASELINE_DIRECTIVE);
    }

    #[test]
    fn test_disabled_and_zero_intensity_entries_yield_baseline() {
        assert_eq!(
            build_directive(&single("nose", "slim", 0, true), Gender::Female),
            BASELINE_DIRECTIVE
        );
        assert_eq!(
            build_directive(&single("nose", "slim", 80, false), Gender::Male),
            BASELINE_DIRECTIVE
        );
    }

    #[test]
    fn test_tier_banding_selects_phrase_variant() {
        let low = build_directive(&single("nose", "slim", 35, true), Gender::Unspecified);
        assert!(low.contains("slightly slimmer nose"));
        assert!(!low.contains("noticeably slimmer"));
        assert!(!low.contains("significantly slimmer"));

        let medium = build_directive(&single("nose", "slim", 36, true), Gender::Unspecified);
        assert!(medium.contains("noticeably slimmer and refined nose"));

        let high = build_directive(&single("nose", "slim", 71, true), Gender::Unspecified);
        assert!(high.contains("significantly slimmer nose with refined bridge"));
    }

    #[test]
    fn test_single_entry_contributes_no_other_areas_phrase() {
        let directive = build_directive(&single("chin", "define", 50, true), Gender::Unspecified);
        assert!(directive.contains("noticeably more defined chin contour"));
        assert!(!directive.contains("nose"));
        assert!(!directive.contains("lips"));
    }

    #[test]
    fn test_nose_slim_high_male_scenario() {
        let directive = build_directive(&single("nose", "slim", 80, true), Gender::Male);
        assert!(directive.contains("significantly slimmer nose with refined bridge"));
        assert!(directive.contains("keep beard and facial hair intact"));
        assert!(!directive.contains("keep makeup intact"));
    }

    #[test]
    fn test_gender_clauses() {
        let state = single("lips", "volume", 50, true);

        let male = build_directive(&state, Gender::Male);
        assert!(male.contains("Male subject - keep beard and facial hair intact."));

        let female = build_directive(&state, Gender::Female);
        assert!(female.contains("Female subject - keep makeup intact."));
        assert!(!female.contains("facial hair"));

        let unspecified = build_directive(&state, Gender::Unspecified);
        assert!(!unspecified.contains("Male subject"));
        assert!(!unspecified.contains("Female subject"));
    }

    #[test]
    fn test_identity_mandate_present_for_all_genders() {
        let state = single("lips", "volume", 50, true);
        for gender in [Gender::Male, Gender::Female, Gender::Unspecified] {
            let directive = build_directive(&state, gender);
            assert!(directive.contains("PRESERVE IDENTITY"));
            assert!(directive.contains("100% recognizable as the same individual"));
            assert!(directive.contains("DO NOT transform into a different person"));
        }
    }

    #[test]
    fn test_template_attribute_list_and_quality_clause() {
        let directive = build_directive(&single("nose", "slim", 80, true), Gender::Unspecified);
        assert!(directive
            .contains("Keep same hair, skin texture, skin tone, eye color, clothing, and background"));
        assert!(directive
            .contains("Extreme photorealism, natural clinical lighting, high resolution, no artifacts."));
    }

    #[test]
    fn test_unknown_key_is_skipped_silently() {
        let mut state = AdjustmentsState::new();
        state.set(AdjustmentValue::new("nose", "slim", 80, true));
        state.set(AdjustmentValue::new("ears", "point", 90, true));

        let directive = build_directive(&state, Gender::Unspecified);
        assert!(directive.contains("significantly slimmer nose with refined bridge"));
        // The unmapped entry contributes nothing
        assert!(!directive.contains("ears"));
        assert!(!directive.contains("point"));
        // Exactly one enhancement phrase between the colon and the period
        let list = directive
            .split("aesthetic enhancements: ")
            .nth(1)
            .and_then(|rest| rest.split(".\n").next())
            .unwrap();
        assert_eq!(list, "significantly slimmer nose with refined bridge");
    }

    #[test]
    fn test_all_unknown_keys_degrade_to_baseline() {
        let directive = build_directive(&single("ears", "point", 90, true), Gender::Male);
        assert_eq!(directive, BASELINE_DIRECTIVE);
    }

    #[test]
    fn test_phrases_join_in_key_order() {
        let mut state = AdjustmentsState::new();
        state.set(AdjustmentValue::new("nose", "slim", 80, true));
        state.set(AdjustmentValue::new("chin", "define", 20, true));

        let directive = build_directive(&state, Gender::Unspecified);
        assert!(directive.contains(
            "slightly more defined chin. significantly slimmer nose with refined bridge"
        ));
    }

    #[test]
    fn test_deterministic() {
        let mut state = AdjustmentsState::new();
        state.set(AdjustmentValue::new("nose", "slim", 80, true));
        state.set(AdjustmentValue::new("jawline", "define", 55, true));

        let a = build_directive(&state, Gender::Female);
        let b = build_directive(&state, Gender::Female);
        assert_eq!(a, b);
    }
}
