mod app;
mod components;
mod form;
mod output;
mod status_bar;
pub mod theme;
mod widgets;

pub use app::render;
