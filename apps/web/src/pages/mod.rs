//! Page Renderer: server-rendered HTML for the landing page and dashboard.

pub mod cache;
pub mod handlers;
pub mod views;
