//! The eframe window: state in [`state`], drawing in [`ui`].

mod state;
mod ui;

pub use state::{describe_error, App, AppWrapper, Tab};
pub use ui::draw_ui;
