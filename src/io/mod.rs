pub mod config_io;
pub mod fsutil;
pub mod record_io;
pub mod scene_io;
pub mod watcher;
