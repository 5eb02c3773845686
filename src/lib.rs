// Price Reveal - Core Library
// Exposes all modules for use in the TUI, headless mode, and tests

pub mod animator;
pub mod config;
pub mod currency;
pub mod logging;
pub mod price;
pub mod template;

// Re-export commonly used types
pub use animator::{
    Animator, AnimatorError, AnimatorPhase, Cell, CellKind, RevealEvent, RevealRequest,
    SlotPhase, SlotState,
};
pub use config::{ConfigError, RevealConfig, TimingConfig};
pub use currency::{Currency, UnknownCurrency};
pub use price::{Price, PriceError};
pub use template::{DigitTemplate, SlotKind, MAX_DIGIT_TEMPLATE};
