//! Step sequence builder.
//!
//! `build_steps` is a pure function of `(Intent, Mode, Variant)`: no I/O, no
//! randomness, safe to call on every render.

use super::{Intent, Mode, StepId, Variant};

const JOURNALING_FULL: &[StepId] = &[StepId::Privacy, StepId::Passcode, StepId::DataReclamation];
const THERAPY_FULL: &[StepId] = &[StepId::Privacy, StepId::Passcode];
const LEGACY_FULL: &[StepId] = &[StepId::Privacy, StepId::Passcode, StepId::Extension];
const QUICK: &[StepId] = &[StepId::Passcode];

const LEADING: [StepId; 2] = [StepId::Welcome, StepId::Intent];

/// Middle segment of the flow for an intent at a given setup depth.
fn middle_segment(intent: Intent, mode: Mode) -> &'static [StepId] {
    match (mode, intent) {
        (Mode::Full, Intent::Journaling) => JOURNALING_FULL,
        (Mode::Full, Intent::Therapy) => THERAPY_FULL,
        (Mode::Full, Intent::Legacy) => LEGACY_FULL,
        (Mode::Quick, _) => QUICK,
    }
}

/// Computes the ordered, deduplicated list of wizard steps.
///
/// The result always starts with `welcome, intent` and ends with `summary`.
/// The streamlined variant on a full setup gets `extension` spliced in right
/// before `summary` when the intent's path does not already include it.
///
/// 计算有序且去重的向导步骤列表。
pub fn build_steps(intent: Intent, mode: Mode, variant: Variant) -> Vec<StepId> {
    let middle = middle_segment(intent, mode);

    let mut steps = Vec::with_capacity(LEADING.len() + middle.len() + 2);
    steps.extend_from_slice(&LEADING);
    steps.extend_from_slice(middle);
    steps.push(StepId::Summary);

    if variant == Variant::Streamlined && mode == Mode::Full && !steps.contains(&StepId::Extension)
    {
        let summary_at = steps.len() - 1;
        steps.insert(summary_at, StepId::Extension);
    }

    let mut seen = Vec::with_capacity(steps.len());
    steps.retain(|step| {
        if seen.contains(step) {
            false
        } else {
            seen.push(*step);
            true
        }
    });
    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_inputs() -> Vec<(Intent, Mode, Variant)> {
        let mut inputs = Vec::new();
        for intent in Intent::ALL {
            for mode in Mode::ALL {
                for variant in Variant::ALL {
                    inputs.push((*intent, *mode, *variant));
                }
            }
        }
        inputs
    }

    #[test]
    fn test_every_flow_starts_with_welcome_intent_and_ends_with_summary() {
        for (intent, mode, variant) in all_inputs() {
            let steps = build_steps(intent, mode, variant);
            assert_eq!(&steps[..2], &[StepId::Welcome, StepId::Intent]);
            assert_eq!(steps.last(), Some(&StepId::Summary));
        }
    }

    #[test]
    fn test_every_flow_is_deduplicated_and_deterministic() {
        for (intent, mode, variant) in all_inputs() {
            let steps = build_steps(intent, mode, variant);
            for step in &steps {
                assert_eq!(steps.iter().filter(|s| *s == step).count(), 1);
            }
            assert_eq!(steps, build_steps(intent, mode, variant));
        }
    }

    #[test]
    fn test_quick_mode_always_has_four_steps() {
        for intent in Intent::ALL {
            for variant in Variant::ALL {
                let steps = build_steps(*intent, Mode::Quick, *variant);
                assert_eq!(
                    steps,
                    vec![
                        StepId::Welcome,
                        StepId::Intent,
                        StepId::Passcode,
                        StepId::Summary
                    ]
                );
            }
        }
    }

    #[test]
    fn test_streamlined_full_contains_extension_exactly_once() {
        for intent in Intent::ALL {
            let steps = build_steps(*intent, Mode::Full, Variant::Streamlined);
            let count = steps.iter().filter(|s| **s == StepId::Extension).count();
            assert_eq!(count, 1, "intent {intent}");
            assert_eq!(steps[steps.len() - 2], StepId::Extension);
        }
    }

    #[test]
    fn test_legacy_full_control() {
        let steps = build_steps(Intent::Legacy, Mode::Full, Variant::Control);
        assert_eq!(
            steps,
            vec![
                StepId::Welcome,
                StepId::Intent,
                StepId::Privacy,
                StepId::Passcode,
                StepId::Extension,
                StepId::Summary,
            ]
        );
    }

    #[test]
    fn test_therapy_quick() {
        let steps = build_steps(Intent::Therapy, Mode::Quick, Variant::Control);
        assert_eq!(
            steps,
            vec![
                StepId::Welcome,
                StepId::Intent,
                StepId::Passcode,
                StepId::Summary
            ]
        );
    }

    #[test]
    fn test_journaling_full_streamlined_injects_extension() {
        let steps = build_steps(Intent::Journaling, Mode::Full, Variant::Streamlined);
        assert_eq!(
            steps,
            vec![
                StepId::Welcome,
                StepId::Intent,
                StepId::Privacy,
                StepId::Passcode,
                StepId::DataReclamation,
                StepId::Extension,
                StepId::Summary,
            ]
        );
    }

    #[test]
    fn test_streamlined_quick_is_not_extended() {
        let steps = build_steps(Intent::Legacy, Mode::Quick, Variant::Streamlined);
        assert!(!steps.contains(&StepId::Extension));
    }

    #[test]
    fn test_control_full_therapy_has_no_extension() {
        let steps = build_steps(Intent::Therapy, Mode::Full, Variant::Control);
        assert!(!steps.contains(&StepId::Extension));
        assert_eq!(steps.len(), 5);
    }
}
