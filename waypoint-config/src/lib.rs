pub mod app_config;

pub use app_config::{BookingSettings, CatalogSettings, PipelineSettings, RandomSettings, Settings};
