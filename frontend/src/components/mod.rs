pub mod analyzer;
pub mod check_options;
pub mod handlers;
pub mod header;
pub mod home;
pub mod results;
pub mod theme_toggle;
pub mod upload_section;
pub mod utils;
