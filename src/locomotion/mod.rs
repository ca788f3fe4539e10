//! Avatar locomotion: smoothed horizontal motion, jumps and mode switching.

mod jump;
mod motor;
mod systems;

pub use jump::JumpProfile;
pub use motor::{step_avatar, turn_towards, AvatarState, ControlMode, StepContext, StepReport};
pub use systems::{
    apply_jump_requests, integrate_locomotion, toggle_control_mode, update_locomotion_signals,
    MOVEMENT_ACTIONS,
};
