pub mod commands;
pub mod matcher;
pub mod reconcile;
pub mod scan;
pub mod view;
