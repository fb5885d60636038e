pub mod action_plan;
pub mod event;
pub mod organization;
pub mod production_line;
pub mod shift;
