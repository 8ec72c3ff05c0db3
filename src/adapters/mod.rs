// Adapters layer: concrete implementations of the domain ports.

pub mod clock;
pub mod csv_store;
pub mod espn;

pub use clock::{FixedClock, SystemClock};
pub use csv_store::CsvStore;
pub use espn::EspnSource;
