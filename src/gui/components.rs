mod config_panel;
mod live_monitoring;
mod spectrum;

pub use config_panel::render_config_panel;
pub use live_monitoring::render_live_monitoring;
pub use spectrum::render_spectrum;
