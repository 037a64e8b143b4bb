//! Planner - plan integration, planning sessions and the weather store.

pub mod integration;
pub mod session;
pub mod weather;

pub use integration::{MapSurface, OverlayLevel, Presentation, TileOverlay};
pub use session::{PlanOutcome, PlanStatus, PlanTicket, PlannerEvent, PlanningSession};
pub use weather::{FlightCategory, StaticWeatherSource, WeatherReport, WeatherSource, WeatherStore, Wind};
