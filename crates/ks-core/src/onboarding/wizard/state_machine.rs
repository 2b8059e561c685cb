//! Wizard state machine.
//!
//! Defines a pure state transition function for the onboarding wizard. Side
//! effects are returned as [`WizardAction`]s and executed by the controller.

use serde::Serialize;

use crate::onboarding::{Draft, Intent, Mode, StepId};

/// Wizard lifecycle.
///
/// 向导生命周期。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardPhase {
    /// On a step of the current flow.
    ///
    /// 处于当前流程的某一步。
    Active,
    /// Finished through the last step or a backup import.
    ///
    /// 通过最后一步或备份导入完成。
    Completed,
    /// Explicitly abandoned.
    ///
    /// 用户主动放弃。
    Skipped,
}

impl WizardPhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WizardPhase::Active)
    }
}

/// Wizard state: lifecycle plus the resumable draft.
///
/// 向导状态：生命周期加可恢复草稿。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub phase: WizardPhase,
    pub draft: Draft,
}

impl WizardState {
    pub fn active(draft: Draft) -> Self {
        Self {
            phase: WizardPhase::Active,
            draft,
        }
    }
}

/// Events that drive the wizard.
///
/// 驱动向导的事件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    /// Advance to the following step.
    ///
    /// 前进到下一步。
    Next,
    /// Return to the previous step.
    ///
    /// 返回上一步。
    Back,
    /// User abandoned and the confirmation collaborator agreed.
    ///
    /// 用户放弃且已确认跳过。
    SkipConfirmed,
    /// Intent picked on the intent step.
    ///
    /// 在动机页选择了使用动机。
    SelectIntent { intent: Intent },
    /// Setup depth changed.
    ///
    /// 切换了设置深度。
    SelectMode { mode: Mode },
    /// Data reclamation toggled.
    ///
    /// 切换了数据回收开关。
    SetDataReclamation { enabled: bool },
    /// Passcode sub-flow finished successfully.
    ///
    /// 密码设置子流程成功完成。
    PasscodeConfirmed,
    /// Backup import finished successfully.
    ///
    /// 备份导入成功完成。
    BackupImported,
}

/// Side effects produced by state transitions.
///
/// 状态转换产生的副作用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    /// Stop the dwell clock for a step and record the elapsed time.
    ///
    /// 停止该步骤的停留计时并记录耗时。
    LeaveStep { step: StepId },
    /// Start the dwell clock for a step and record it as viewed.
    ///
    /// 开始该步骤的停留计时并记为已浏览。
    EnterStep { step: StepId },
    /// Write the draft to the store.
    ///
    /// 将草稿写入存储。
    PersistDraft,
    /// Close the analytics record as completed.
    ///
    /// 将分析记录标记为已完成。
    CompleteSession,
    /// Close the analytics record as skipped at `drop_off`.
    ///
    /// 将分析记录标记为在 `drop_off` 处跳过。
    SkipSession { drop_off: StepId },
    /// Set the completion flag.
    ///
    /// 写入完成标记。
    MarkOnboardingComplete,
    /// Remove the persisted draft.
    ///
    /// 删除已持久化的草稿。
    ClearDraft,
    /// Tell the router the wizard finished.
    ///
    /// 通知路由引导已完成。
    NotifyCompleted,
    /// Tell the router the wizard was skipped.
    ///
    /// 通知路由引导已跳过。
    NotifySkipped,
}

/// Unmet precondition that blocks `Next`.
///
/// 阻止 `Next` 的未满足前置条件。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepGate {
    /// The intent step needs an explicit choice; the default does not count.
    ///
    /// 动机页需要用户明确选择，默认值不算。
    IntentNotChosen,
    /// The passcode step needs the confirmation sub-flow to finish.
    ///
    /// 密码页需要完成确认子流程。
    PasscodeNotConfirmed,
}

/// Pure wizard state machine.
///
/// 纯函数向导状态机。
pub struct WizardStateMachine;

impl WizardStateMachine {
    /// Precondition blocking `Next` on the current step, if any.
    pub fn gate(draft: &Draft) -> Option<StepGate> {
        match draft.current_step() {
            StepId::Intent if !draft.intent_chosen => Some(StepGate::IntentNotChosen),
            StepId::Passcode if !draft.passcode_confirmed => Some(StepGate::PasscodeNotConfirmed),
            _ => None,
        }
    }

    pub fn transition(state: WizardState, event: WizardEvent) -> (WizardState, Vec<WizardAction>) {
        if state.phase.is_terminal() {
            return (state, Vec::new());
        }

        let WizardState { phase, mut draft } = state;
        draft.clamp_step_index();
        let current = draft.current_step();

        match event {
            WizardEvent::Next => {
                if Self::gate(&draft).is_some() {
                    return (WizardState { phase, draft }, Vec::new());
                }
                if draft.is_last_step() {
                    return Self::finish(draft, current);
                }
                draft.current_step_index += 1;
                let entered = draft.current_step();
                (
                    WizardState::active(draft),
                    vec![
                        WizardAction::LeaveStep { step: current },
                        WizardAction::EnterStep { step: entered },
                        WizardAction::PersistDraft,
                    ],
                )
            }
            WizardEvent::Back => {
                if draft.current_step_index == 0 {
                    return (WizardState::active(draft), Vec::new());
                }
                draft.current_step_index -= 1;
                let entered = draft.current_step();
                (
                    WizardState::active(draft),
                    vec![
                        WizardAction::LeaveStep { step: current },
                        WizardAction::EnterStep { step: entered },
                        WizardAction::PersistDraft,
                    ],
                )
            }
            WizardEvent::SkipConfirmed => (
                WizardState {
                    phase: WizardPhase::Skipped,
                    draft,
                },
                vec![
                    WizardAction::LeaveStep { step: current },
                    WizardAction::SkipSession { drop_off: current },
                    WizardAction::MarkOnboardingComplete,
                    WizardAction::ClearDraft,
                    WizardAction::NotifySkipped,
                ],
            ),
            WizardEvent::SelectIntent { intent } => {
                draft.intent = intent;
                draft.intent_chosen = true;
                Self::recompute(draft, current)
            }
            WizardEvent::SelectMode { mode } => {
                draft.mode = mode;
                Self::recompute(draft, current)
            }
            WizardEvent::SetDataReclamation { enabled } => {
                draft.data_reclamation_enabled = enabled;
                (WizardState::active(draft), vec![WizardAction::PersistDraft])
            }
            WizardEvent::PasscodeConfirmed => {
                draft.passcode_confirmed = true;
                (WizardState::active(draft), vec![WizardAction::PersistDraft])
            }
            WizardEvent::BackupImported => {
                if current != StepId::Welcome {
                    return (WizardState::active(draft), Vec::new());
                }
                Self::finish(draft, current)
            }
        }
    }

    /// Re-runs the flow builder after an intent/mode change and clamps the index.
    fn recompute(mut draft: Draft, before: StepId) -> (WizardState, Vec<WizardAction>) {
        draft.clamp_step_index();
        let after = draft.current_step();
        let mut actions = Vec::with_capacity(3);
        if after != before {
            actions.push(WizardAction::LeaveStep { step: before });
            actions.push(WizardAction::EnterStep { step: after });
        }
        actions.push(WizardAction::PersistDraft);
        (WizardState::active(draft), actions)
    }

    fn finish(draft: Draft, current: StepId) -> (WizardState, Vec<WizardAction>) {
        (
            WizardState {
                phase: WizardPhase::Completed,
                draft,
            },
            vec![
                WizardAction::LeaveStep { step: current },
                WizardAction::MarkOnboardingComplete,
                WizardAction::CompleteSession,
                WizardAction::ClearDraft,
                WizardAction::NotifyCompleted,
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::OnboardingSessionId;
    use crate::onboarding::Variant;

    fn state_at(index: usize) -> WizardState {
        let mut draft = Draft::new(OnboardingSessionId::from("s"), Variant::Control, 0);
        draft.intent_chosen = true;
        draft.passcode_confirmed = true;
        draft.current_step_index = index;
        WizardState::active(draft)
    }

    #[test]
    fn wizard_state_machine_next_advances_and_tracks_dwell() {
        let (next, actions) = WizardStateMachine::transition(state_at(0), WizardEvent::Next);
        assert_eq!(next.draft.current_step_index, 1);
        assert_eq!(
            actions,
            vec![
                WizardAction::LeaveStep {
                    step: StepId::Welcome
                },
                WizardAction::EnterStep {
                    step: StepId::Intent
                },
                WizardAction::PersistDraft,
            ]
        );
    }

    #[test]
    fn wizard_state_machine_next_on_last_step_completes() {
        // journaling / full / control: welcome, intent, privacy, passcode, dataReclamation, summary
        let (next, actions) = WizardStateMachine::transition(state_at(5), WizardEvent::Next);
        assert_eq!(next.phase, WizardPhase::Completed);
        assert_eq!(
            actions,
            vec![
                WizardAction::LeaveStep {
                    step: StepId::Summary
                },
                WizardAction::MarkOnboardingComplete,
                WizardAction::CompleteSession,
                WizardAction::ClearDraft,
                WizardAction::NotifyCompleted,
            ]
        );
    }

    #[test]
    fn wizard_state_machine_next_blocked_without_explicit_intent() {
        let mut state = state_at(1);
        state.draft.intent_chosen = false;
        assert_eq!(
            WizardStateMachine::gate(&state.draft),
            Some(StepGate::IntentNotChosen)
        );
        let (next, actions) = WizardStateMachine::transition(state.clone(), WizardEvent::Next);
        assert_eq!(next, state);
        assert!(actions.is_empty());
    }

    #[test]
    fn wizard_state_machine_next_blocked_until_passcode_confirmed() {
        let mut state = state_at(3);
        state.draft.passcode_confirmed = false;
        assert_eq!(
            WizardStateMachine::gate(&state.draft),
            Some(StepGate::PasscodeNotConfirmed)
        );
        let (next, actions) = WizardStateMachine::transition(state, WizardEvent::Next);
        assert_eq!(next.draft.current_step_index, 3);
        assert!(actions.is_empty());

        let (confirmed, actions) =
            WizardStateMachine::transition(next, WizardEvent::PasscodeConfirmed);
        assert_eq!(actions, vec![WizardAction::PersistDraft]);
        assert_eq!(WizardStateMachine::gate(&confirmed.draft), None);
    }

    #[test]
    fn wizard_state_machine_back_at_first_step_is_noop() {
        let (next, actions) = WizardStateMachine::transition(state_at(0), WizardEvent::Back);
        assert_eq!(next.draft.current_step_index, 0);
        assert!(actions.is_empty());
    }

    #[test]
    fn wizard_state_machine_back_records_dwell_for_left_step() {
        let (next, actions) = WizardStateMachine::transition(state_at(2), WizardEvent::Back);
        assert_eq!(next.draft.current_step_index, 1);
        assert_eq!(
            actions[0],
            WizardAction::LeaveStep {
                step: StepId::Privacy
            }
        );
    }

    #[test]
    fn wizard_state_machine_skip_attributes_drop_off_to_current_step() {
        let (next, actions) =
            WizardStateMachine::transition(state_at(3), WizardEvent::SkipConfirmed);
        assert_eq!(next.phase, WizardPhase::Skipped);
        assert!(actions.contains(&WizardAction::SkipSession {
            drop_off: StepId::Passcode
        }));
        assert!(actions.contains(&WizardAction::MarkOnboardingComplete));
        assert!(actions.contains(&WizardAction::ClearDraft));
        assert_eq!(actions.last(), Some(&WizardAction::NotifySkipped));
    }

    #[test]
    fn wizard_state_machine_mode_change_clamps_index() {
        // full flow has 6 steps; on dataReclamation (index 4) switch to quick (4 steps)
        let (next, actions) = WizardStateMachine::transition(
            state_at(4),
            WizardEvent::SelectMode { mode: Mode::Quick },
        );
        assert_eq!(next.draft.current_step_index, 3);
        assert_eq!(next.draft.current_step(), StepId::Summary);
        assert_eq!(
            actions,
            vec![
                WizardAction::LeaveStep {
                    step: StepId::DataReclamation
                },
                WizardAction::EnterStep {
                    step: StepId::Summary
                },
                WizardAction::PersistDraft,
            ]
        );
    }

    #[test]
    fn wizard_state_machine_select_intent_marks_choice() {
        let mut state = state_at(1);
        state.draft.intent_chosen = false;
        let (next, actions) = WizardStateMachine::transition(
            state,
            WizardEvent::SelectIntent {
                intent: Intent::Journaling,
            },
        );
        assert!(next.draft.intent_chosen);
        assert_eq!(actions, vec![WizardAction::PersistDraft]);
    }

    #[test]
    fn wizard_state_machine_backup_import_only_on_welcome() {
        let (next, actions) =
            WizardStateMachine::transition(state_at(2), WizardEvent::BackupImported);
        assert_eq!(next.phase, WizardPhase::Active);
        assert!(actions.is_empty());

        let (next, actions) =
            WizardStateMachine::transition(state_at(0), WizardEvent::BackupImported);
        assert_eq!(next.phase, WizardPhase::Completed);
        assert_eq!(actions.last(), Some(&WizardAction::NotifyCompleted));
    }

    #[test]
    fn wizard_state_machine_ignores_events_after_terminal() {
        let (done, _) = WizardStateMachine::transition(state_at(0), WizardEvent::SkipConfirmed);
        let (again, actions) = WizardStateMachine::transition(done.clone(), WizardEvent::Next);
        assert_eq!(again, done);
        assert!(actions.is_empty());
    }
}
