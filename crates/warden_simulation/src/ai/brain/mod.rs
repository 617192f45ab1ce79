//! Guard brain: engine-agnostic state machine + perception evaluator.
//!
//! Архитектура:
//! - StateMachine: `request_transition` + transition table + entry-action table
//! - PerceptionEvaluator: `tick` (capture → warning → alert → return → patrol)
//! - Tasks: idle wait и alert re-check как suspended tasks с cancellation token
//!
//! Brain ничего не знает про ECS: мир приходит через `GuardEnvironment`.

pub mod environment;
pub mod geometry;
pub mod perception;
pub mod sandbox;
pub mod tasks;


use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::ai::components::{transition_rule, EntryAction, Facing, GuardState, TransitionRule};
use crate::ai::config::GuardConfig;
use crate::ai::errors::{ConfigurationError, GuardError, PerceptionError};
use crate::logger;

pub use environment::{
    GuardEnvironment, Indicator, LineOfSight, MotionDriver, RayHit, TargetHandle, TargetRegistry,
};
pub use tasks::{AlertRecheck, CancellationToken, RecheckOutcome, SuspendedTask, TaskPoll, TaskSlot};

/// Применённый переход
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: GuardState,
    pub to: GuardState,
    /// Что просили (отличается от `to` при redirect)
    pub requested: GuardState,
}

/// Уровень diagnostic отчёта
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// Запись для diagnostic sink
#[derive(Debug, Clone, PartialEq)]
pub struct GuardDiagnostic {
    pub severity: Severity,
    /// Состояние guard'а в момент отчёта
    pub state: GuardState,
    pub error: GuardError,
}

/// Guard brain: состояние + agent context + suspended tasks
#[derive(Debug, Clone)]
pub struct GuardBrain<T> {
    config: GuardConfig,
    state: GuardState,
    started: bool,

    facing: Facing,
    velocity_intent: Vec2,

    active_target: Option<T>,
    last_known_target_position: Vec2,
    approach_direction: Vec2,
    patrol_destination: Option<Vec2>,
    idle_wait: Option<f32>,

    entry_task: TaskSlot,
    recheck: Option<AlertRecheck>,

    rng: ChaCha8Rng,
    transitions: Vec<Transition>,
    diagnostics: Vec<GuardDiagnostic>,
}

impl<T: TargetHandle> GuardBrain<T> {
    /// Создаёт brain в Idle (entry action Idle выполнится на `start`/первом тике)
    ///
    /// `fallback_seed` используется если в конфиге нет `rng_seed`.
    pub fn new(config: GuardConfig, fallback_seed: u64) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let seed = config.rng_seed.unwrap_or(fallback_seed);

        Ok(Self {
            config,
            state: GuardState::Idle,
            started: false,
            facing: Facing::default(),
            velocity_intent: Vec2::ZERO,
            active_target: None,
            last_known_target_position: Vec2::ZERO,
            approach_direction: Vec2::ZERO,
            patrol_destination: None,
            idle_wait: None,
            entry_task: TaskSlot::default(),
            recheck: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            transitions: Vec::new(),
            diagnostics: Vec::new(),
        })
    }

    /// Spawn: запускает entry action начального Idle (один раз)
    pub fn start<E: GuardEnvironment<T>>(&mut self, env: &mut E) {
        if self.started {
            return;
        }
        self.started = true;

        if let Some(color) = self.state.indicator() {
            env.set_indicator_color(color);
        }
        self.run_entry_action(env, None);
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn velocity_intent(&self) -> Vec2 {
        self.velocity_intent
    }

    pub fn active_target(&self) -> Option<T> {
        self.active_target
    }

    pub fn last_known_target_position(&self) -> Vec2 {
        self.last_known_target_position
    }

    pub fn approach_direction(&self) -> Vec2 {
        self.approach_direction
    }

    pub fn patrol_destination(&self) -> Option<Vec2> {
        self.patrol_destination
    }

    /// Ожидание, выбранное при последнем входе в Idle
    pub fn idle_wait(&self) -> Option<f32> {
        self.idle_wait
    }

    pub fn is_waiting(&self) -> bool {
        self.entry_task.is_pending()
    }

    pub fn is_rechecking(&self) -> bool {
        self.recheck.as_ref().is_some_and(|recheck| !recheck.is_cancelled())
    }

    /// Текущий re-check раунд (0-based)
    pub fn recheck_round(&self) -> Option<u32> {
        self.recheck
            .as_ref()
            .filter(|recheck| !recheck.is_cancelled())
            .map(AlertRecheck::round)
    }

    pub fn drain_transitions(&mut self) -> Vec<Transition> {
        std::mem::take(&mut self.transitions)
    }

    pub fn drain_diagnostics(&mut self) -> Vec<GuardDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Единственная точка смены состояния
    ///
    /// - Patrol без `can_patrol` / без waypoint'ов → Watch (configuration report)
    /// - Warning/Alert/Subdue без цели в registry → переход отменяется (perception report)
    /// - Иначе: cancel entry task предыдущего состояния, новое состояние, entry action
    pub fn request_transition<E: GuardEnvironment<T>>(&mut self, env: &mut E, requested: GuardState) {
        let mut next = match transition_rule(requested, self.config.can_patrol) {
            TransitionRule::Accept(state) => state,
            TransitionRule::Redirect { applied, .. } => {
                self.report(Severity::Warning, ConfigurationError::PatrolDisabled.into());
                applied
            }
        };

        if next == GuardState::Patrol && self.config.patrol_waypoints.is_empty() {
            self.report(Severity::Error, ConfigurationError::NoPatrolWaypoints.into());
            next = GuardState::Watch;
        }

        // Цель резолвим ДО коммита: отменённый переход не трогает состояние и задачи
        let resolved = if next.requires_target() {
            match self.resolve_target(env, next) {
                Some(resolved) => Some(resolved),
                None => {
                    self.report(
                        Severity::Error,
                        PerceptionError::TargetUnresolved { state: next }.into(),
                    );
                    return;
                }
            }
        } else {
            None
        };

        self.entry_task.cancel();
        if matches!(next, GuardState::Alert | GuardState::Subdue) {
            self.cancel_recheck();
        }

        let from = self.state;
        self.state = next;
        self.started = true;
        self.transitions.push(Transition { from, to: next, requested });
        logger::log(&format!("Guard: {:?} → {:?}", from, next));

        if let Some(color) = next.indicator() {
            env.set_indicator_color(color);
        }
        self.run_entry_action(env, resolved);
    }

    /// Registry lookup + позиция (нужна Warning для last known position)
    fn resolve_target<E: GuardEnvironment<T>>(
        &self,
        env: &E,
        state: GuardState,
    ) -> Option<(T, Option<Vec2>)> {
        let target = env.resolve_active_target()?;
        let position = env.target_position(target);

        if state == GuardState::Warning && position.is_none() {
            return None;
        }
        Some((target, position))
    }

    fn run_entry_action<E: GuardEnvironment<T>>(
        &mut self,
        env: &mut E,
        resolved: Option<(T, Option<Vec2>)>,
    ) {
        match self.state.entry_action() {
            EntryAction::SampleIdleWait => {
                let wait = self.sample_idle_wait();
                self.idle_wait = Some(wait);
                self.entry_task.spawn(SuspendedTask::after_secs(wait));
                self.set_velocity(env, Vec2::ZERO);
            }

            EntryAction::CaptureLastKnownPosition => {
                let Some((target, Some(target_position))) = resolved else {
                    return;
                };
                self.active_target = Some(target);
                self.last_known_target_position = target_position;
                self.approach_direction =
                    (target_position - env.agent_position()).normalize_or_zero();
            }

            EntryAction::ResolveTarget => {
                if let Some((target, _)) = resolved {
                    self.active_target = Some(target);
                }
            }

            EntryAction::RestrainTarget => {
                let Some((target, _)) = resolved else {
                    return;
                };
                self.active_target = Some(target);
                self.set_velocity(env, Vec2::ZERO);

                // Без физического тела Subdue всё равно применяется, просто без restraint
                if env.freeze_motion(target).is_err() {
                    self.report(Severity::Error, ConfigurationError::TargetNotRestrainable.into());
                }
            }

            EntryAction::AnnounceReturn => {
                logger::log_info("Guard: returning to post");
            }

            EntryAction::Nothing => {
                self.set_velocity(env, Vec2::ZERO);
            }

            EntryAction::PickWaypoint => {
                self.patrol_destination = self.config.patrol_waypoints.choose(&mut self.rng).copied();
            }
        }
    }

    fn sample_idle_wait(&mut self) -> f32 {
        let (min_wait, max_wait) = (self.config.min_wait, self.config.max_wait);
        if min_wait >= max_wait {
            return min_wait;
        }
        self.rng.gen_range(min_wait..=max_wait)
    }

    fn cancel_recheck(&mut self) {
        if let Some(mut recheck) = self.recheck.take() {
            recheck.cancel();
        }
    }

    fn set_velocity<E: GuardEnvironment<T>>(&mut self, env: &mut E, velocity: Vec2) {
        self.velocity_intent = velocity;
        env.set_velocity_intent(velocity);
    }

    fn report(&mut self, severity: Severity, error: GuardError) {
        let message = format!("Guard [{:?}]: {}", self.state, error);
        match severity {
            Severity::Warning => logger::log_warning(&message),
            Severity::Error => logger::log_error(&message),
        }

        self.diagnostics.push(GuardDiagnostic {
            severity,
            state: self.state,
            error,
        });
    }
}
