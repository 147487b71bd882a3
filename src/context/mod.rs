//! The global GPU context.

pub use self::context::Context;

mod context;
