pub mod player;
pub mod session;
pub mod skill_check;
pub mod snapshot;
