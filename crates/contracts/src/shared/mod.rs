pub mod tabs;
pub mod tabs_config;
