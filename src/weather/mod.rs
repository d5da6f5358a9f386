pub mod handlers;
mod models;
mod service;

pub use models::WeatherRecord;
pub use service::WeatherService;
