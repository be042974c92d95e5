pub mod app;
pub mod center_panel;
pub mod left_panel;
pub mod modals;
pub mod settings;
pub mod settings_io;
