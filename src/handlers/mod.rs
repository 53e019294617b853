pub mod menu;
pub mod profile;
