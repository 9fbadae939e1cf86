pub mod catalogs;
pub mod generator;
pub mod parser;
pub mod resolver;
pub mod sanitize;
pub mod types;
pub mod xml;

pub use catalogs::map_schema_type;
pub use generator::generate;
pub use parser::{from_tree, parse_schema};
pub use resolver::{build_context, GenContext};
pub use sanitize::sanitize;
pub use types::*;
pub use xml::parse_xml;
