//! Card system: templates and the catalog.
//!
//! ## Key Types
//!
//! - `CardTemplate`: Configured attributes of a card name
//! - `CardCatalog`: Name → template lookup, instantiates card entities
//!
//! Cards carry no logic of their own; games read their attributes.

pub mod catalog;
pub mod template;

pub use catalog::CardCatalog;
pub use template::CardTemplate;
