//! Command layer
//!
//! Turns a classified intent into a store operation. The resolver maps
//! loose user references (an id, a misspelled title) onto a concrete
//! task; the dispatcher validates parameters and performs the call.

pub mod dispatcher;
pub mod resolver;

pub use dispatcher::dispatch;
pub use resolver::TaskResolver;
