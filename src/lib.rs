pub mod assign;
pub mod collector;
pub mod instrument;
pub mod midi;
pub mod settings;

pub use assign::assign;
pub use instrument::{Instrument, InstrumentKind, Stage};
pub use settings::Settings;
