//! Statistics module - trailing-week rollups.

mod week_stats_model;
mod week_stats_service;

pub use week_stats_model::WeekStats;
pub use week_stats_service::WeekStatsService;
