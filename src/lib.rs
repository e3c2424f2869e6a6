// Library root - Grid layout engine and HTTP service for the widget dashboard

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
