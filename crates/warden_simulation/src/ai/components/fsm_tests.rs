//! Tests for guard FSM components (transition table, entry table, facing).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::fsm::{
        transition_rule, EntryAction, Facing, GuardState, IndicatorColor, TransitionRule,
    };

    #[test]
    fn test_guard_state_default() {
        let state = GuardState::default();
        assert_eq!(state, GuardState::Idle);
    }

    #[test]
    fn test_patrol_redirect_rule() {
        assert_eq!(
            transition_rule(GuardState::Patrol, false),
            TransitionRule::Redirect {
                requested: GuardState::Patrol,
                applied: GuardState::Watch,
            }
        );
        assert_eq!(
            transition_rule(GuardState::Patrol, true),
            TransitionRule::Accept(GuardState::Patrol)
        );
    }

    #[test]
    fn test_non_patrol_requests_always_accepted() {
        for state in GuardState::ALL {
            if state == GuardState::Patrol {
                continue;
            }
            assert_eq!(transition_rule(state, false).applied(), state);
        }
    }

    #[test]
    fn test_states_requiring_target() {
        let requiring: Vec<_> = GuardState::ALL
            .into_iter()
            .filter(|state| state.requires_target())
            .collect();

        assert_eq!(
            requiring,
            vec![GuardState::Warning, GuardState::Alert, GuardState::Subdue]
        );
    }

    #[test]
    fn test_entry_table() {
        assert_eq!(GuardState::Idle.entry_action(), EntryAction::SampleIdleWait);
        assert_eq!(GuardState::Subdue.entry_action(), EntryAction::RestrainTarget);
        assert_eq!(GuardState::Watch.entry_action(), EntryAction::Nothing);
        assert_eq!(GuardState::Patrol.entry_action(), EntryAction::PickWaypoint);
    }

    #[test]
    fn test_indicator_colors() {
        assert_eq!(GuardState::Warning.indicator(), Some(IndicatorColor::Yellow));
        assert_eq!(GuardState::Subdue.indicator(), Some(IndicatorColor::Black));
        assert_eq!(GuardState::Watch.indicator(), None); // Watch цвет не трогает
    }

    #[test]
    fn test_subdue_excluded_from_capture() {
        assert!(!GuardState::Subdue.can_capture());
        assert!(GuardState::Idle.can_capture());
        assert!(GuardState::Watch.can_capture());
    }

    #[test]
    fn test_facing_from_direction() {
        assert_eq!(Facing::from_direction(Vec2::new(-0.3, 0.9), Facing::Right), Facing::Left);
        assert_eq!(Facing::from_direction(Vec2::new(0.3, -0.9), Facing::Left), Facing::Right);
        // Чисто вертикальное направление: facing не меняется
        assert_eq!(Facing::from_direction(Vec2::Y, Facing::Left), Facing::Left);
        assert_eq!(Facing::Left.axis(), Vec2::new(-1.0, 0.0));
    }
}
