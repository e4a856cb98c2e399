pub mod handler;
pub mod hub;

pub use handler::{ws_index, ViewerSocket};
pub use hub::ViewerHub;
