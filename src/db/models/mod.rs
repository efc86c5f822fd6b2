//! Row and payload types for every table, one file per entity.

pub mod court;
pub mod inventory;
pub mod professor;
pub mod profile;
pub mod review;
pub mod schedule;
pub mod shift;

pub use self::court::*;
pub use self::inventory::*;
pub use self::professor::*;
pub use self::profile::*;
pub use self::review::*;
pub use self::schedule::*;
pub use self::shift::*;
