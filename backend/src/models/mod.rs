pub mod request;
pub mod sky;
pub mod view_state;

pub use request::*;
pub use sky::*;
pub use view_state::*;
