mod components;
mod modals;
mod view;

pub use view::CardView;
