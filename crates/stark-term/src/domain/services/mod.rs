mod actions;
mod app_state;
mod events;
mod persistence;
mod sessions;

pub use actions::*;
pub use app_state::*;
pub use events::*;
pub use persistence::*;
pub use sessions::*;
