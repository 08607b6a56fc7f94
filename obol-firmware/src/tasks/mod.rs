//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod app;
pub mod display;
pub mod link;
pub mod net;
pub mod tick;

pub use app::app_task;
pub use display::display_task;
pub use link::link_task;
pub use net::{cyw43_task, net_task, wifi_task};
pub use tick::tick_task;
