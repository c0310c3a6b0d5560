pub mod account;
pub mod event;
pub mod product;
pub mod units;

pub use account::*;
pub use event::*;
pub use product::*;
pub use units::*;
