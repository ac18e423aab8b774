use super::*;

/// Horizontal motion requested by the brain.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub enum Mover {
    #[default]
    Still,
    Toward {
        x: f32,
        speed: f32,
    },
    Charge {
        direction: f32,
        speed: f32,
    },
}

/// Moves the boss along the floor; a charge stops at the arena wall.
pub(super) fn move_boss(
    time: Res<Time>,
    settings: Res<Settings>,
    mut bosses: Query<(&mut Mover, &mut Transform, &Hurtbox), With<Boss>>,
) {
    let dt = time.delta_secs();
    let arena = settings.encounter.arena;

    for (mut mover, mut tf, hurtbox) in bosses.iter_mut() {
        let x = tf.translation.x;
        let next = match *mover {
            Mover::Still => continue,
            Mover::Toward { x: goal, speed } => {
                let step = speed * dt;
                let dx = goal - x;
                if dx.abs() <= step {
                    *mover = Mover::Still;
                    goal
                } else {
                    x + dx.signum() * step
                }
            }
            Mover::Charge { direction, speed } => x + direction * speed * dt,
        };

        let lo = arena.left + hurtbox.half_size.x;
        let hi = arena.right - hurtbox.half_size.x;
        let clamped = next.clamp(lo, hi.max(lo));
        if clamped != next && matches!(*mover, Mover::Charge { .. }) {
            debug!("geb slams into the wall at x = {clamped:.1}");
            *mover = Mover::Still;
        }
        tf.translation.x = clamped;
    }
}
