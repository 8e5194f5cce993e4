pub mod card;
pub mod collection;
pub mod edition;
pub mod set;

pub use card::*;
pub use collection::*;
pub use edition::*;
pub use set::*;
