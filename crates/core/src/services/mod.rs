pub mod analytics_service;
pub mod demo_service;
pub mod feed_service;
pub mod quote_service;
pub mod ranking_service;
pub mod watchlist_service;
