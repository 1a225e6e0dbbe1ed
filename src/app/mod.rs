pub mod display;
pub mod player;
pub mod setup;

pub use display::{present_mode, sync_vsync_settings};
pub use player::tint_player_by_mode;
pub use setup::setup;
