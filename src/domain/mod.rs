// Domain layer - grid layout model and pure layout rules
pub mod dashboard;
pub mod grid;
pub mod migration;
pub mod placement;
pub mod widget;
