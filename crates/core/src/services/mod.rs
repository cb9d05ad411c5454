pub mod analytics_service;
pub mod notes_service;
pub mod portfolio_service;
pub mod price_cache_service;
pub mod watchlist_service;
