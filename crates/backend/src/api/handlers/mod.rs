// Dashboard handlers (d402-d409)
pub mod d402_daily_pacing;
pub mod d403_advisor;
pub mod d404_month_summary;
pub mod d405_purchase;
pub mod d406_next_months;
pub mod d407_history;
pub mod d408_heatmap;
pub mod d409_year_comparison;

// Utilities
pub mod error;
pub mod sheets;
