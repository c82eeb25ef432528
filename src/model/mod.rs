pub mod activity;
pub mod config;
pub mod record;
pub mod scene;
pub mod state;

pub use activity::*;
pub use config::*;
pub use record::*;
pub use scene::*;
pub use state::*;
