//! Built-in navigator variants.

mod host;
mod noop;
mod overlay;

pub use host::HostNavigator;
pub use noop::NoopNavigator;
pub use overlay::OverlayNavigator;
