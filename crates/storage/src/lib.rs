pub mod error;
pub mod index;
pub mod schema;
pub mod table;
pub mod tuple;
pub mod value;

pub use error::StorageError;
pub use index::{IndexKey, OrderedIndex};
pub use schema::{Attribute, Domain, Schema, is_valid_identifier};
pub use table::Table;
pub use tuple::Tuple;
pub use value::{MAX_TEXT_LEN, Value};
