pub mod use_app;
pub mod use_daily_entry;
pub mod use_loader;
pub mod use_notices;
