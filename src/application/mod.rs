// Application layer - Use cases over the grid layout domain
pub mod dashboard_service;
pub mod grid_controller;
pub mod layout_repository;
