pub mod actions;
pub mod charts;
pub mod consequences;
pub mod popup;
