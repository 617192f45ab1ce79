//! Perception evaluator: per-tick проверки и движение.
//!
//! Порядок внутри тика (short-circuit по приоритету):
//! 0. suspended tasks (idle wait, alert re-check)
//! 1. capture check: завершает тик
//! 2. Warning → 3. Alert → 4. Return (каждый блок видит состояние после предыдущего)
//! 5. patrol movement

use bevy::prelude::*;

use super::environment::{GuardEnvironment, TargetHandle};
use super::tasks::{AlertRecheck, RecheckOutcome, TaskPoll};
use super::GuardBrain;
use crate::ai::components::{Facing, GuardState};
use crate::ai::config::PatrolMovement;
use crate::logger;

impl<T: TargetHandle> GuardBrain<T> {
    /// Один тик симуляции (`delta` в секундах)
    pub fn tick<E: GuardEnvironment<T>>(&mut self, env: &mut E, delta: f32) {
        // Ожидание, созданное на spawn, отсчитывается со следующего тика
        let spawned_now = !self.started;
        self.start(env);
        if !spawned_now {
            self.advance_tasks(env, delta);
        }

        if self.check_capture(env) {
            return;
        }

        if self.state == GuardState::Warning {
            self.evaluate_warning(env);
        }
        if self.state == GuardState::Alert {
            self.evaluate_alert(env);
        }
        if self.state == GuardState::Return {
            self.evaluate_return(env);
        }
        self.evaluate_patrol(env);
    }

    fn advance_tasks<E: GuardEnvironment<T>>(&mut self, env: &mut E, delta: f32) {
        // Idle wait истёк → перезапускаем Idle (новое ожидание)
        if self.entry_task.poll(delta) == TaskPoll::Ready && self.state == GuardState::Idle {
            self.request_transition(env, GuardState::Idle);
        }

        let Some(mut recheck) = self.recheck.take() else {
            return;
        };

        let round = recheck.round();
        let outcome = recheck.poll(delta, || self.target_within_alert_distance(&*env));
        match outcome {
            RecheckOutcome::Waiting | RecheckOutcome::NextRound => {
                if outcome == RecheckOutcome::NextRound {
                    logger::log(&format!("Guard: re-check round {}: target still away", round));
                }
                if !recheck.is_cancelled() {
                    self.recheck = Some(recheck);
                }
            }
            RecheckOutcome::Reacquired => {
                logger::log(&format!("Guard: target reacquired on re-check round {}", round));
                self.request_transition(env, GuardState::Alert);
            }
            RecheckOutcome::Exhausted => {
                logger::log(&format!("Guard: re-check exhausted after {} rounds", round + 1));
                self.request_transition(env, GuardState::Return);
            }
        }
    }

    /// Capture check: цель ближе catch_distance → Subdue
    fn check_capture<E: GuardEnvironment<T>>(&mut self, env: &mut E) -> bool {
        if !self.state.can_capture() {
            return false;
        }
        let Some(distance) = self.distance_to_active_target(env) else {
            return false;
        };

        // Протухший handle: registry уже не отдаёт цель, Subdue не с кем делать
        if distance < self.config.catch_distance && env.resolve_active_target().is_some() {
            self.request_transition(env, GuardState::Subdue);
            return self.state == GuardState::Subdue;
        }
        false
    }

    fn evaluate_warning<E: GuardEnvironment<T>>(&mut self, env: &mut E) {
        let position = env.agent_position();

        if position.distance(self.last_known_target_position) > self.config.arrival_radius {
            // Идём по направлению, зафиксированному при входе в Warning
            let velocity = self.approach_direction * self.config.move_speed;
            self.velocity_intent = velocity;
            env.set_velocity_intent(velocity);
            self.facing = Facing::from_direction(self.approach_direction, self.facing);

            let hit = env.raycast(position, self.facing.axis(), self.config.catch_distance);
            if hit.is_some_and(|hit| hit.is_target()) {
                self.request_transition(env, GuardState::Alert);
            }
            return;
        }

        // Дошли до last known position: смотрим где цель сейчас
        let live_distance = env
            .resolve_active_target()
            .and_then(|target| env.target_position(target))
            .map(|target_position| target_position.distance(position));

        match live_distance {
            Some(distance) if distance < self.config.alert_distance => {
                self.request_transition(env, GuardState::Alert);
            }
            _ => self.request_transition(env, GuardState::Idle),
        }
    }

    fn evaluate_alert<E: GuardEnvironment<T>>(&mut self, env: &mut E) {
        let target_position = self
            .active_target
            .and_then(|target| env.target_position(target));

        let lost = match target_position {
            Some(target_position) => {
                let distance = self.steer(env, target_position, true);
                distance > self.config.alert_distance
            }
            // Handle протух: цель потеряна
            None => true,
        };

        if lost {
            self.start_recheck();
            self.request_transition(env, GuardState::Idle);
        }
    }

    fn evaluate_return<E: GuardEnvironment<T>>(&mut self, env: &mut E) {
        let post = self.config.return_position;
        let distance = env.agent_position().distance(post);

        if distance > self.config.arrival_radius {
            self.steer(env, post, true);
        } else {
            self.request_transition(env, GuardState::Idle);
        }
    }

    fn evaluate_patrol<E: GuardEnvironment<T>>(&mut self, env: &mut E) {
        let Some(destination) = self.patrol_destination else {
            return;
        };
        if self.config.patrol_movement == PatrolMovement::Gated && self.state != GuardState::Patrol {
            return;
        }

        let distance = env.agent_position().distance(destination);
        if distance < self.config.arrival_radius {
            self.patrol_destination = None;
            self.request_transition(env, GuardState::Idle);
        } else {
            self.steer(env, destination, false);
        }
    }

    /// Спавнит re-check (предыдущий отменяется)
    fn start_recheck(&mut self) {
        self.cancel_recheck();
        logger::log(&format!(
            "Guard: target lost, re-checking {} times",
            self.config.alert_check_count
        ));
        self.recheck = Some(AlertRecheck::new(
            self.config.alert_check_count,
            self.config.alert_check_interval,
        ));
    }

    /// Velocity к точке на move_speed; возвращает дистанцию до точки
    fn steer<E: GuardEnvironment<T>>(&mut self, env: &mut E, toward: Vec2, update_facing: bool) -> f32 {
        let offset = toward - env.agent_position();
        let direction = offset.normalize_or_zero();
        let velocity = direction * self.config.move_speed;

        self.velocity_intent = velocity;
        env.set_velocity_intent(velocity);
        if update_facing {
            self.facing = Facing::from_direction(direction, self.facing);
        }
        offset.length()
    }

    fn distance_to_active_target<E: GuardEnvironment<T>>(&self, env: &E) -> Option<f32> {
        let target = self.active_target?;
        let target_position = env.target_position(target)?;
        Some(target_position.distance(env.agent_position()))
    }

    fn target_within_alert_distance<E: GuardEnvironment<T>>(&self, env: &E) -> bool {
        self.distance_to_active_target(env)
            .is_some_and(|distance| distance < self.config.alert_distance)
    }
}
