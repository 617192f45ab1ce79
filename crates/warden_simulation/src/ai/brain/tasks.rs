//! Suspended tasks (замена корутин): resume condition + cancellation token.
//!
//! Никаких потоков: задача продвигается только когда её poll'ит tick driver.
//! Cancel идемпотентен и безопасен для уже завершённой задачи.

/// Cancellation token (owned flag)
///
/// Принадлежит одной задаче; клон задачи получает независимую копию.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CancellationToken {
    cancelled: bool,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Когда задача продолжится
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResumeCondition {
    /// Через N секунд симуляции
    Elapsed { remaining: f32 },
    /// Через N тиков
    Ticks { remaining: u32 },
}

impl ResumeCondition {
    /// Продвигает условие на один тик; true = можно продолжать
    fn advance(&mut self, delta: f32) -> bool {
        match self {
            ResumeCondition::Elapsed { remaining } => {
                *remaining -= delta;
                *remaining <= 0.0
            }
            ResumeCondition::Ticks { remaining } => {
                *remaining = remaining.saturating_sub(1);
                *remaining == 0
            }
        }
    }
}

/// Результат poll'а задачи
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPoll {
    Pending,
    Ready,
    Cancelled,
}

/// Приостановленная задача
#[derive(Debug, Clone)]
pub struct SuspendedTask {
    resume: ResumeCondition,
    token: CancellationToken,
    finished: bool,
}

impl SuspendedTask {
    pub fn new(resume: ResumeCondition) -> Self {
        Self {
            resume,
            token: CancellationToken::new(),
            finished: false,
        }
    }

    pub fn after_secs(secs: f32) -> Self {
        Self::new(ResumeCondition::Elapsed { remaining: secs })
    }

    pub fn after_ticks(ticks: u32) -> Self {
        Self::new(ResumeCondition::Ticks { remaining: ticks })
    }

    pub fn cancel(&mut self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn resume_condition(&self) -> ResumeCondition {
        self.resume
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Ready возвращается ровно один раз; после этого задача считается завершённой
    pub fn poll(&mut self, delta: f32) -> TaskPoll {
        if self.token.is_cancelled() {
            return TaskPoll::Cancelled;
        }
        if self.finished {
            return TaskPoll::Pending;
        }
        if self.resume.advance(delta) {
            self.finished = true;
            TaskPoll::Ready
        } else {
            TaskPoll::Pending
        }
    }
}

/// Слот под entry task текущего состояния (максимум одна задача in flight)
#[derive(Debug, Clone, Default)]
pub struct TaskSlot {
    task: Option<SuspendedTask>,
}

impl TaskSlot {
    /// Новая задача вытесняет предыдущую (предыдущая отменяется)
    pub fn spawn(&mut self, task: SuspendedTask) {
        self.cancel();
        self.task = Some(task);
    }

    /// No-op если слот пуст или задача уже завершена
    pub fn cancel(&mut self) {
        if let Some(mut task) = self.task.take() {
            task.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.task
            .as_ref()
            .is_some_and(|task| !task.is_finished() && !task.is_cancelled())
    }

    /// Poll текущей задачи; завершённые/отменённые задачи освобождают слот
    pub fn poll(&mut self, delta: f32) -> TaskPoll {
        let Some(task) = self.task.as_mut() else {
            return TaskPoll::Pending;
        };

        let poll = task.poll(delta);
        if poll != TaskPoll::Pending {
            self.task = None;
        }
        poll
    }
}

/// Исход одного re-check раунда
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecheckOutcome {
    /// Раунд ещё ждёт
    Waiting,
    /// Цель снова в радиусе → Alert
    Reacquired,
    /// Последний раунд без цели → Return
    Exhausted,
    /// Раунд без цели, дальше следующий
    NextRound,
}

/// Timed re-check sub-routine после потери цели в Alert
///
/// Живёт независимо от текущего состояния guard'а (спавнится как side effect
/// перехода Alert → Idle, а не как entry action).
#[derive(Debug, Clone)]
pub struct AlertRecheck {
    rounds: u32,
    round: u32,
    interval: f32,
    wait: SuspendedTask,
    token: CancellationToken,
}

impl AlertRecheck {
    pub fn new(rounds: u32, interval: f32) -> Self {
        Self {
            rounds,
            round: 0,
            interval,
            wait: SuspendedTask::after_secs(interval),
            token: CancellationToken::new(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn cancel(&mut self) {
        self.token.cancel();
    }

    /// Индекс текущего раунда (0-based)
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Продвигает ожидание; `measure` вызывается только когда раунд дождался
    ///
    /// `measure` возвращает true если цель снова ближе alert_distance.
    pub fn poll(&mut self, delta: f32, measure: impl FnOnce() -> bool) -> RecheckOutcome {
        if self.token.is_cancelled() {
            return RecheckOutcome::Waiting;
        }
        if self.wait.poll(delta) != TaskPoll::Ready {
            return RecheckOutcome::Waiting;
        }

        if measure() {
            self.token.cancel();
            return RecheckOutcome::Reacquired;
        }

        if self.round + 1 >= self.rounds {
            self.token.cancel();
            return RecheckOutcome::Exhausted;
        }

        self.round += 1;
        self.wait = SuspendedTask::after_secs(self.interval);
        RecheckOutcome::NextRound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_task_ready_once() {
        let mut task = SuspendedTask::after_secs(1.0);

        assert_eq!(task.poll(0.5), TaskPoll::Pending);
        assert_eq!(task.poll(0.5), TaskPoll::Ready);
        assert_eq!(task.poll(0.5), TaskPoll::Pending); // Ready только один раз
        assert!(task.is_finished());
    }

    #[test]
    fn test_tick_task() {
        let mut task = SuspendedTask::after_ticks(3);

        assert_eq!(task.poll(0.0), TaskPoll::Pending);
        assert_eq!(task.poll(0.0), TaskPoll::Pending);
        assert_eq!(task.poll(0.0), TaskPoll::Ready);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut slot = TaskSlot::default();
        slot.cancel(); // пустой слот: no-op

        slot.spawn(SuspendedTask::after_secs(1.0));
        assert!(slot.is_pending());

        slot.cancel();
        slot.cancel();
        assert!(!slot.is_pending());
        assert_eq!(slot.poll(5.0), TaskPoll::Pending);
    }

    #[test]
    fn test_spawn_replaces_previous_task() {
        let mut slot = TaskSlot::default();
        slot.spawn(SuspendedTask::after_secs(1.0));
        slot.spawn(SuspendedTask::after_secs(3.0));

        // Первая задача дождалась бы на 1.5s, вторая ещё нет
        assert_eq!(slot.poll(1.5), TaskPoll::Pending);
        assert_eq!(slot.poll(1.5), TaskPoll::Ready);
        assert!(!slot.is_pending());
    }

    #[test]
    fn test_cancel_after_completion_is_noop() {
        let mut slot = TaskSlot::default();
        slot.spawn(SuspendedTask::after_secs(0.5));

        assert_eq!(slot.poll(1.0), TaskPoll::Ready);
        slot.cancel();
        assert!(!slot.is_pending());
        assert_eq!(slot.poll(1.0), TaskPoll::Pending);
    }

    #[test]
    fn test_cloned_task_cancels_independently() {
        let mut original = SuspendedTask::after_secs(1.0);
        let mut copy = original.clone();

        copy.cancel();

        assert!(copy.is_cancelled());
        assert!(!original.is_cancelled());
        assert_eq!(copy.poll(1.0), TaskPoll::Cancelled);
        assert_eq!(original.poll(1.0), TaskPoll::Ready);
    }

    #[test]
    fn test_cloned_recheck_keeps_own_rounds() {
        let mut original = AlertRecheck::new(2, 1.0);
        let mut copy = original.clone();

        copy.cancel();

        assert!(!original.is_cancelled());
        assert_eq!(original.poll(1.0, || false), RecheckOutcome::NextRound);
        assert_eq!(original.poll(1.0, || false), RecheckOutcome::Exhausted);
    }

    #[test]
    fn test_recheck_exhausts_after_all_rounds() {
        let mut recheck = AlertRecheck::new(3, 1.0);
        let mut outcomes = Vec::new();

        for _ in 0..10 {
            let outcome = recheck.poll(1.0, || false);
            outcomes.push(outcome);
            if outcome == RecheckOutcome::Exhausted {
                break;
            }
        }

        assert_eq!(
            outcomes,
            vec![
                RecheckOutcome::NextRound,
                RecheckOutcome::NextRound,
                RecheckOutcome::Exhausted,
            ]
        );
        assert!(recheck.is_cancelled());
    }

    #[test]
    fn test_recheck_reacquires_early() {
        let mut recheck = AlertRecheck::new(5, 1.0);

        assert_eq!(recheck.poll(0.5, || true), RecheckOutcome::Waiting); // measure не вызывается
        assert_eq!(recheck.poll(0.5, || true), RecheckOutcome::Reacquired);
        assert_eq!(recheck.poll(1.0, || true), RecheckOutcome::Waiting);
    }

    #[test]
    fn test_cancelled_recheck_never_measures() {
        let mut recheck = AlertRecheck::new(2, 1.0);
        recheck.cancel();

        let outcome = recheck.poll(10.0, || panic!("cancelled recheck must not measure"));
        assert_eq!(outcome, RecheckOutcome::Waiting);
    }
}
