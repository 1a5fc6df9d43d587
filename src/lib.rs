pub mod catalog;
pub mod config;
pub mod controller;
pub mod logging;
pub mod reference;
pub mod scrape;
pub mod selection;

// Re-export main types for convenience
pub use catalog::{Catalog, CatalogError, ScrapeType};
pub use config::Config;
pub use controller::FormController;
pub use reference::{PassageRef, ReferenceError};
pub use scrape::{ScrapeBackend, ScrapeError, ScrapeRequest, SimulatedBackend};
pub use selection::{Field, Selection};
