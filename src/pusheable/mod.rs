//! Bodies the avatar can grab, steer and drop off ledges.

mod body;
mod systems;

pub use body::{BodyMode, ParticleState, PusheableBody};
pub use systems::{carry_bound_avatars, integrate_bodies, SetPushConstraint};
pub(crate) use systems::{
    apply_push_constraint, hide_particles_in_book_mode, hide_particles_on_push,
    show_particles_in_player_mode, show_particles_on_release,
};
