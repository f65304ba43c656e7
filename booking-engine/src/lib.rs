//! Booking Engine - reservation scheduling and pricing for sports venues
//!
//! # Overview
//!
//! - **Pricing** (`pricing`): rule precedence, segmented court pricing,
//!   duration discounts, credit settlement and the full quote pipeline
//! - **Scheduling** (`schedule`): recurrence expansion of Master Records
//! - **Inventory** (`inventory`): rental stock per time window
//! - **Analytics** (`analytics`): occupancy and revenue
//! - **Store** (`store`): the external data layer seam
//! - **Service** (`service`): snapshot loading, saving, cancellation routing
//!
//! # Module layout
//!
//! ```text
//! booking-engine/src/
//! ├── core/          # configuration
//! ├── utils/         # errors, logging, time
//! ├── money.rs       # Decimal helpers
//! ├── pricing/       # matcher, calculator, discount, credit, quote
//! ├── schedule/      # recurrence expansion
//! ├── inventory/     # rental availability
//! ├── analytics/     # occupancy, revenue
//! ├── store/         # BookingStore trait, MemoryStore
//! └── service.rs     # BookingService
//! ```

pub mod analytics;
pub mod core;
pub mod inventory;
pub mod money;
pub mod pricing;
pub mod schedule;
pub mod service;
pub mod store;
pub mod utils;

// Re-export public types
pub use crate::core::EngineConfig;
pub use pricing::{PriceStatus, PricingCatalog, PricingInput, PricingResult, PricingWarning, compute_pricing};
pub use schedule::{DateWindow, expand};
pub use service::{BookingService, VenueSnapshot};
pub use store::{BookingStore, MemoryStore};
pub use utils::{EngineError, EngineResult};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};
