//! The boss brain: per-phase routines driving the current action.
//!
//! [`BossBrain::tick`] runs once per simulation step and returns the commands the
//! host should apply (movement, projectiles, hazard hitboxes). The brain never
//! touches the world itself, so it can be stepped in tests without an engine.

use crate::action::{ActionSpec, BossAction, ChainCounter, select_action};
use crate::config::{EncounterConfig, PhaseBehavior};
use crate::phase::BossPhase;
use crate::prediction::{TargetMotion, aim_throw, blend_aim, predict_position, skewed_fraction};
use glam::Vec2;
use rand::Rng;

/// Idle length used when a phase has no Idle row of its own.
pub const FALLBACK_IDLE_SECS: f32 = 1.0;
/// How far from the target a `Moving` destination may land.
pub const MOVE_SPREAD: f32 = 3.0;

/// Snapshot of the world the brain decides on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BrainContext {
    /// Boss feet position.
    pub boss_position: Vec2,
    pub target: TargetMotion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HazardKind {
    /// The boss body while charging.
    ChargeBody,
    /// Floor-level wave during an earthquake.
    Shockwave,
    /// Column of debris around the boss.
    Tornado,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossCommand {
    ActionStarted(BossAction),
    MoveToward { x: f32, speed: f32 },
    Stop,
    ThrowRock { origin: Vec2, velocity: Vec2 },
    SummonWall { x: f32 },
    Charge { direction: f32, speed: f32 },
    Hazard { kind: HazardKind, active: bool },
}

#[derive(Debug, Clone)]
pub struct BossBrain {
    phase: BossPhase,
    action: BossAction,
    timer: f32,
    duration: f32,
    chain: ChainCounter,
    /// Windup finished and the action's effect has fired.
    committed: bool,
    /// Recovery started and hitboxes are off again.
    recovered: bool,
    /// Reached the move target (or, in cutscenes, finished the scripted bit).
    settled: bool,
    move_target: f32,
    charge_direction: f32,
    live_hazard: Option<HazardKind>,
}

impl Default for BossBrain {
    fn default() -> Self {
        Self {
            phase: BossPhase::Inactive,
            action: BossAction::Idle,
            timer: 0.0,
            duration: 0.0,
            chain: ChainCounter::default(),
            committed: false,
            recovered: false,
            settled: false,
            move_target: 0.0,
            charge_direction: 1.0,
            live_hazard: None,
        }
    }
}

impl BossBrain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action(&self) -> BossAction {
        self.action
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn chain(&self) -> ChainCounter {
        self.chain
    }

    pub fn live_hazard(&self) -> Option<HazardKind> {
        self.live_hazard
    }

    pub fn tick<R: Rng>(
        &mut self,
        phase: BossPhase,
        dt: f32,
        ctx: &BrainContext,
        config: &EncounterConfig,
        rng: &mut R,
    ) -> Vec<BossCommand> {
        let mut out = Vec::new();
        if phase != self.phase {
            self.enter_phase(phase, ctx, config, rng, &mut out);
        }

        match phase {
            BossPhase::Inactive | BossPhase::Defeated => {}
            BossPhase::OpeningCutscene => self.opening_routine(ctx, config, &mut out),
            BossPhase::Phase1 => {
                self.combat_routine(&config.phases.phase1, dt, ctx, config, rng, &mut out)
            }
            BossPhase::Phase2 => {
                self.combat_routine(&config.phases.phase2, dt, ctx, config, rng, &mut out)
            }
            BossPhase::Phase3 => {
                self.combat_routine(&config.phases.phase3, dt, ctx, config, rng, &mut out)
            }
            BossPhase::ClosingCutscene => self.closing_routine(&mut out),
        }
        out
    }

    /// Replaces the current action, as if it had just been picked.
    pub fn begin_action<R: Rng>(
        &mut self,
        spec: ActionSpec,
        ctx: &BrainContext,
        config: &EncounterConfig,
        rng: &mut R,
    ) -> Vec<BossCommand> {
        let mut out = Vec::new();
        self.switch_off_hazard(&mut out);
        self.chain.record(spec.action.category());
        self.start_action(spec, ctx, config, rng, &mut out);
        out
    }

    fn enter_phase<R: Rng>(
        &mut self,
        phase: BossPhase,
        ctx: &BrainContext,
        config: &EncounterConfig,
        rng: &mut R,
        out: &mut Vec<BossCommand>,
    ) {
        self.switch_off_hazard(out);
        self.phase = phase;
        self.chain.reset();
        self.timer = 0.0;
        self.settled = false;

        if let Some(behavior) = config.phases.get(phase) {
            // Every phase opens with a breather.
            let idle = behavior
                .spec(BossAction::Idle)
                .copied()
                .unwrap_or(ActionSpec::new(BossAction::Idle, 0.0, FALLBACK_IDLE_SECS));
            self.chain.record(idle.action.category());
            self.start_action(idle, ctx, config, rng, out);
        } else {
            self.action = BossAction::Idle;
            self.duration = 0.0;
        }
    }

    fn opening_routine(
        &mut self,
        ctx: &BrainContext,
        config: &EncounterConfig,
        out: &mut Vec<BossCommand>,
    ) {
        if self.settled {
            return;
        }
        let center = config.arena.center_x();
        if (ctx.boss_position.x - center).abs() <= config.boss.arrive_distance {
            self.settled = true;
            out.push(BossCommand::Stop);
        } else {
            out.push(BossCommand::MoveToward {
                x: center,
                speed: config.boss.move_speed,
            });
        }
    }

    fn closing_routine(&mut self, out: &mut Vec<BossCommand>) {
        if self.settled {
            return;
        }
        self.settled = true;
        self.switch_off_hazard(out);
        out.push(BossCommand::Stop);
    }

    fn combat_routine<R: Rng>(
        &mut self,
        behavior: &PhaseBehavior,
        dt: f32,
        ctx: &BrainContext,
        config: &EncounterConfig,
        rng: &mut R,
        out: &mut Vec<BossCommand>,
    ) {
        self.timer += dt.max(0.0);
        let windup_at = config.hazards.windup_fraction * self.duration;
        let recovery_at = config.hazards.recovery_fraction * self.duration;
        let gravity = config.gravity;
        let arena = &config.arena;

        match self.action {
            BossAction::Idle => {}
            BossAction::Moving => {
                if !self.settled {
                    if (ctx.boss_position.x - self.move_target).abs() <= config.boss.arrive_distance
                    {
                        self.settled = true;
                        out.push(BossCommand::Stop);
                    } else {
                        out.push(BossCommand::MoveToward {
                            x: self.move_target,
                            speed: config.boss.move_speed * behavior.speed_scale,
                        });
                    }
                }
            }
            BossAction::RockThrowAttack => {
                if self.commit(windup_at) {
                    let origin = ctx.boss_position + Vec2::new(0.0, config.boss.throw_height);
                    for _ in 0..behavior.rocks_per_throw {
                        let fraction = skewed_fraction(rng.random::<f32>());
                        let shot = aim_throw(origin, &ctx.target, gravity, arena, fraction);
                        out.push(BossCommand::ThrowRock {
                            origin,
                            velocity: shot.velocity,
                        });
                    }
                }
            }
            BossAction::WallSummon => {
                if self.commit(windup_at) {
                    // Lead by how long the wall takes to finish rising.
                    let lead = (self.duration - windup_at).max(0.0);
                    let predicted = predict_position(&ctx.target, gravity, lead, arena);
                    let fraction = skewed_fraction(rng.random::<f32>());
                    let aim = blend_aim(ctx.target.position, predicted, fraction);
                    out.push(BossCommand::SummonWall {
                        x: arena.clamp_x(aim.x),
                    });
                }
            }
            BossAction::ChargeAttack => {
                if self.commit(windup_at) {
                    out.push(BossCommand::Charge {
                        direction: self.charge_direction,
                        speed: config.boss.charge_speed * behavior.speed_scale,
                    });
                    self.switch_on_hazard(HazardKind::ChargeBody, out);
                }
                if self.recover(recovery_at) {
                    self.switch_off_hazard(out);
                    out.push(BossCommand::Stop);
                }
            }
            BossAction::Earthquake => {
                if self.commit(windup_at) {
                    self.switch_on_hazard(HazardKind::Shockwave, out);
                }
                if self.recover(recovery_at) {
                    self.switch_off_hazard(out);
                }
            }
            BossAction::RockTornado => {
                if self.commit(windup_at) {
                    self.switch_on_hazard(HazardKind::Tornado, out);
                }
                if self.recover(recovery_at) {
                    self.switch_off_hazard(out);
                }
            }
        }

        if self.timer >= self.duration {
            self.switch_off_hazard(out);
            self.choose_next(behavior, ctx, config, rng, out);
        }
    }

    fn choose_next<R: Rng>(
        &mut self,
        behavior: &PhaseBehavior,
        ctx: &BrainContext,
        config: &EncounterConfig,
        rng: &mut R,
        out: &mut Vec<BossCommand>,
    ) {
        let forced = config.chains.forced_category(self.chain);
        let roll = rng.random::<f32>();
        let spec = match select_action(&behavior.actions, forced, roll) {
            Some(spec) => *spec,
            None => {
                tracing::warn!(
                    phase = %self.phase,
                    ?forced,
                    "no eligible boss action, falling back to Idle"
                );
                ActionSpec::new(BossAction::Idle, 0.0, FALLBACK_IDLE_SECS)
            }
        };
        self.chain.record(spec.action.category());
        self.start_action(spec, ctx, config, rng, out);
    }

    fn start_action<R: Rng>(
        &mut self,
        spec: ActionSpec,
        ctx: &BrainContext,
        config: &EncounterConfig,
        rng: &mut R,
        out: &mut Vec<BossCommand>,
    ) {
        self.action = spec.action;
        self.duration = spec.duration;
        self.timer = 0.0;
        self.committed = false;
        self.recovered = false;
        self.settled = false;
        out.push(BossCommand::ActionStarted(spec.action));

        match spec.action {
            BossAction::Moving => {
                let offset = rng.random_range(-MOVE_SPREAD..=MOVE_SPREAD);
                self.move_target = config.arena.clamp_x(ctx.target.position.x + offset);
            }
            BossAction::ChargeAttack => {
                let dx = ctx.target.position.x - ctx.boss_position.x;
                self.charge_direction = if dx < 0.0 { -1.0 } else { 1.0 };
                out.push(BossCommand::Stop);
            }
            BossAction::Idle
            | BossAction::RockThrowAttack
            | BossAction::WallSummon
            | BossAction::Earthquake
            | BossAction::RockTornado => out.push(BossCommand::Stop),
        }
    }

    /// True exactly once, on the tick the windup completes.
    fn commit(&mut self, windup_at: f32) -> bool {
        if self.committed || self.timer < windup_at {
            return false;
        }
        self.committed = true;
        true
    }

    /// True exactly once, on the tick recovery starts after a commit.
    fn recover(&mut self, recovery_at: f32) -> bool {
        if !self.committed || self.recovered || self.timer < recovery_at {
            return false;
        }
        self.recovered = true;
        true
    }

    fn switch_on_hazard(&mut self, kind: HazardKind, out: &mut Vec<BossCommand>) {
        self.switch_off_hazard(out);
        self.live_hazard = Some(kind);
        out.push(BossCommand::Hazard { kind, active: true });
    }

    fn switch_off_hazard(&mut self, out: &mut Vec<BossCommand>) {
        if let Some(kind) = self.live_hazard.take() {
            out.push(BossCommand::Hazard {
                kind,
                active: false,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionCategory, ChainLimits};
    use crate::config::PhaseTable;
    use pretty_assertions::assert_eq;
    use rand::{SeedableRng, rngs::StdRng};

    fn ctx(boss_x: f32, target_x: f32) -> BrainContext {
        BrainContext {
            boss_position: Vec2::new(boss_x, 0.0),
            target: TargetMotion {
                position: Vec2::new(target_x, 0.0),
                velocity: Vec2::ZERO,
                gliding: false,
                rest_height: 0.0,
            },
        }
    }

    fn started(commands: &[BossCommand]) -> Vec<BossAction> {
        commands
            .iter()
            .filter_map(|c| match c {
                BossCommand::ActionStarted(a) => Some(*a),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn dormant_phases_do_nothing() {
        let mut brain = BossBrain::new();
        let config = EncounterConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        for phase in [BossPhase::Inactive, BossPhase::Defeated] {
            let out = brain.tick(phase, 0.5, &ctx(0.0, 3.0), &config, &mut rng);
            assert!(out.is_empty(), "{out:?}");
        }
    }

    #[test]
    fn opening_walks_to_center_then_stops_once() {
        let mut brain = BossBrain::new();
        let config = EncounterConfig::default();
        let mut rng = StdRng::seed_from_u64(1);

        let out = brain.tick(BossPhase::OpeningCutscene, 0.1, &ctx(-8.0, -11.0), &config, &mut rng);
        assert_eq!(
            out,
            vec![BossCommand::MoveToward {
                x: 0.0,
                speed: config.boss.move_speed
            }]
        );
        let out = brain.tick(BossPhase::OpeningCutscene, 0.1, &ctx(0.05, -11.0), &config, &mut rng);
        assert_eq!(out, vec![BossCommand::Stop]);
        let out = brain.tick(BossPhase::OpeningCutscene, 0.1, &ctx(0.05, -11.0), &config, &mut rng);
        assert!(out.is_empty(), "{out:?}");
    }

    #[test]
    fn combat_phases_open_with_idle() {
        let mut brain = BossBrain::new();
        let config = EncounterConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let out = brain.tick(BossPhase::Phase1, 0.0, &ctx(0.0, 5.0), &config, &mut rng);
        assert_eq!(
            out,
            vec![BossCommand::ActionStarted(BossAction::Idle), BossCommand::Stop]
        );
        assert_eq!(brain.action(), BossAction::Idle);
        assert_eq!(brain.duration(), 1.2);
        assert_eq!(brain.chain().value(), -1);
    }

    #[test]
    fn rock_throw_fires_at_end_of_windup() {
        let config = EncounterConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut brain = BossBrain::new();
        let c = ctx(-4.0, 6.0);
        brain.tick(BossPhase::Phase2, 0.0, &c, &config, &mut rng);
        brain.begin_action(
            ActionSpec::new(BossAction::RockThrowAttack, 1.0, 2.0),
            &c,
            &config,
            &mut rng,
        );

        // windup = 0.4 * 2.0
        let early = brain.tick(BossPhase::Phase2, 0.5, &c, &config, &mut rng);
        assert!(early.is_empty(), "{early:?}");

        let late = brain.tick(BossPhase::Phase2, 0.5, &c, &config, &mut rng);
        let throws: Vec<_> = late
            .iter()
            .filter_map(|cmd| match cmd {
                BossCommand::ThrowRock { origin, velocity } => Some((*origin, *velocity)),
                _ => None,
            })
            .collect();
        assert_eq!(throws.len(), config.phases.phase2.rocks_per_throw as usize);

        // A standing target gets no lead, so every rock is a minimum-speed shot at it.
        for (origin, velocity) in throws {
            let d = c.target.position - origin;
            let expected = config.gravity * (d.length() + d.y);
            assert!((velocity.length_squared() - expected).abs() < 1e-2 * expected);
        }

        // Nothing more until the next action.
        let quiet = brain.tick(BossPhase::Phase2, 0.5, &c, &config, &mut rng);
        assert!(quiet.is_empty(), "{quiet:?}");
    }

    #[test]
    fn charge_toggles_its_hitbox_within_the_window() {
        let config = EncounterConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut brain = BossBrain::new();
        let c = ctx(2.0, -6.0);
        brain.tick(BossPhase::Phase2, 0.0, &c, &config, &mut rng);
        let start = brain.begin_action(
            ActionSpec::new(BossAction::ChargeAttack, 1.0, 2.0),
            &c,
            &config,
            &mut rng,
        );
        assert_eq!(
            start,
            vec![
                BossCommand::ActionStarted(BossAction::ChargeAttack),
                BossCommand::Stop
            ]
        );

        let commit = brain.tick(BossPhase::Phase2, 0.8, &c, &config, &mut rng);
        assert_eq!(
            commit,
            vec![
                BossCommand::Charge {
                    direction: -1.0,
                    speed: config.boss.charge_speed * config.phases.phase2.speed_scale
                },
                BossCommand::Hazard {
                    kind: HazardKind::ChargeBody,
                    active: true
                },
            ]
        );
        assert_eq!(brain.live_hazard(), Some(HazardKind::ChargeBody));

        let recover = brain.tick(BossPhase::Phase2, 1.0, &c, &config, &mut rng);
        assert_eq!(
            recover,
            vec![
                BossCommand::Hazard {
                    kind: HazardKind::ChargeBody,
                    active: false
                },
                BossCommand::Stop
            ]
        );
        assert_eq!(brain.live_hazard(), None);

        let next = brain.tick(BossPhase::Phase2, 0.4, &c, &config, &mut rng);
        assert_eq!(started(&next).len(), 1);
    }

    #[test]
    fn phase_change_switches_hazards_off() {
        let config = EncounterConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut brain = BossBrain::new();
        let c = ctx(0.0, 4.0);
        brain.tick(BossPhase::Phase3, 0.0, &c, &config, &mut rng);
        brain.begin_action(
            ActionSpec::new(BossAction::Earthquake, 1.0, 2.0),
            &c,
            &config,
            &mut rng,
        );
        let on = brain.tick(BossPhase::Phase3, 1.0, &c, &config, &mut rng);
        assert!(on.contains(&BossCommand::Hazard {
            kind: HazardKind::Shockwave,
            active: true
        }));

        let closing = brain.tick(BossPhase::ClosingCutscene, 0.1, &c, &config, &mut rng);
        assert_eq!(
            closing,
            vec![
                BossCommand::Hazard {
                    kind: HazardKind::Shockwave,
                    active: false
                },
                BossCommand::Stop
            ]
        );
        let after = brain.tick(BossPhase::ClosingCutscene, 0.1, &c, &config, &mut rng);
        assert!(after.is_empty(), "{after:?}");
    }

    #[test]
    fn phase_change_starts_a_fresh_chain() {
        let mut config = EncounterConfig::default();
        config.chains = ChainLimits {
            min_attack: 2,
            max_attack: 3,
            min_non_attack: 1,
            max_non_attack: 2,
        };
        let mut rng = StdRng::seed_from_u64(10);
        let c = ctx(0.0, 4.0);

        // A single attack, one short of min_attack, is cut off by the phase change.
        let mut brain = BossBrain::new();
        brain.tick(BossPhase::Phase2, 0.0, &c, &config, &mut rng);
        brain.begin_action(
            ActionSpec::new(BossAction::RockThrowAttack, 1.0, 2.0),
            &c,
            &config,
            &mut rng,
        );
        assert_eq!(brain.chain().attack_streak(), 1);
        assert_eq!(
            config.chains.forced_category(brain.chain()),
            Some(ActionCategory::Attack)
        );

        let out = brain.tick(BossPhase::Phase3, 0.0, &c, &config, &mut rng);
        assert_eq!(started(&out), vec![BossAction::Idle]);
        assert_eq!(brain.chain().value(), -1);
        assert_eq!(config.chains.forced_category(brain.chain()), None);

        // A maxed-out non-attack streak does not carry the opening Idle past max_non_attack.
        let mut brain = BossBrain::new();
        brain.tick(BossPhase::Phase2, 0.0, &c, &config, &mut rng);
        brain.begin_action(
            ActionSpec::new(BossAction::Moving, 1.0, 2.0),
            &c,
            &config,
            &mut rng,
        );
        assert_eq!(brain.chain().non_attack_streak(), 2);

        brain.tick(BossPhase::Phase3, 0.0, &c, &config, &mut rng);
        assert_eq!(brain.action(), BossAction::Idle);
        assert_eq!(brain.chain().non_attack_streak(), 1);
        assert_eq!(config.chains.forced_category(brain.chain()), None);
    }

    #[test]
    fn moving_heads_near_the_target_and_stops() {
        let config = EncounterConfig::default();
        let mut rng = StdRng::seed_from_u64(6);
        let mut brain = BossBrain::new();
        let c = ctx(0.0, 11.5);
        brain.tick(BossPhase::Phase1, 0.0, &c, &config, &mut rng);
        brain.begin_action(
            ActionSpec::new(BossAction::Moving, 1.0, 5.0),
            &c,
            &config,
            &mut rng,
        );

        let out = brain.tick(BossPhase::Phase1, 0.1, &c, &config, &mut rng);
        let [BossCommand::MoveToward { x, speed }] = out.as_slice() else {
            panic!("expected a single move, got {out:?}");
        };
        assert!(*x >= 11.5 - MOVE_SPREAD && *x <= config.arena.right);
        assert_eq!(*speed, config.boss.move_speed);

        let arrived = ctx(*x, 11.5);
        let out = brain.tick(BossPhase::Phase1, 0.1, &arrived, &config, &mut rng);
        assert_eq!(out, vec![BossCommand::Stop]);
    }

    #[test]
    fn empty_table_falls_back_to_idle() {
        let mut config = EncounterConfig::default();
        config.phases = PhaseTable {
            phase1: PhaseBehavior {
                actions: vec![],
                ..PhaseBehavior::phase1()
            },
            ..PhaseTable::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        let mut brain = BossBrain::new();
        let c = ctx(0.0, 3.0);
        let first = brain.tick(BossPhase::Phase1, 0.0, &c, &config, &mut rng);
        assert_eq!(started(&first), vec![BossAction::Idle]);
        assert_eq!(brain.duration(), FALLBACK_IDLE_SECS);
        let next = brain.tick(BossPhase::Phase1, 2.0, &c, &config, &mut rng);
        assert_eq!(started(&next), vec![BossAction::Idle]);
    }

    #[test]
    fn streak_bounds_hold_across_ten_thousand_actions() {
        let mut config = EncounterConfig::default();
        config.chains = ChainLimits {
            min_attack: 2,
            max_attack: 3,
            min_non_attack: 1,
            max_non_attack: 2,
        };
        let mut rng = StdRng::seed_from_u64(0x6eb);
        let mut brain = BossBrain::new();
        let c = ctx(-3.0, 5.0);

        let mut picks = Vec::new();
        // Every step outlasts any action, so each tick completes exactly one.
        while picks.len() < 10_000 {
            let out = brain.tick(BossPhase::Phase3, 10.0, &c, &config, &mut rng);
            picks.extend(started(&out).into_iter().map(BossAction::category));
            assert!(brain.chain().attack_streak() <= config.chains.max_attack);
            assert!(brain.chain().non_attack_streak() <= config.chains.max_non_attack);
        }

        let mut run: Option<(ActionCategory, u32)> = None;
        for category in picks {
            run = match run {
                Some((current, len)) if current == category => Some((current, len + 1)),
                Some((current, len)) => {
                    let (min, max) = match current {
                        ActionCategory::Attack => (2, 3),
                        ActionCategory::NonAttack => (1, 2),
                    };
                    assert!((min..=max).contains(&len), "{current} streak of {len}");
                    Some((category, 1))
                }
                None => Some((category, 1)),
            };
        }
    }

    #[test]
    fn hazards_never_outlive_their_action() {
        let config = EncounterConfig::default();
        let mut rng = StdRng::seed_from_u64(9);
        let mut brain = BossBrain::new();
        let c = ctx(1.0, -5.0);
        for _ in 0..5_000 {
            let out = brain.tick(BossPhase::Phase3, 1.0 / 30.0, &c, &config, &mut rng);
            if !started(&out).is_empty() {
                // A fresh action never inherits a live hitbox.
                assert_eq!(brain.live_hazard(), None);
            }
        }
    }
}
