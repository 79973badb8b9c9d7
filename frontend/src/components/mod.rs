pub mod notice_tray;
pub mod pages;
pub mod sidebar;
pub mod status_badge;
