pub mod api;
pub mod chart;
pub mod config;
pub mod error;
pub mod event;
pub mod export;
pub mod gauge;
pub mod indicator;
pub mod input;
pub mod layout;
pub mod model;
pub mod normalize;
pub mod runtime;
pub mod snapshot;
pub mod status;
pub mod ui;
