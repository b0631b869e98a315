pub mod connection;
pub mod document;
pub mod node;
pub mod value;

pub use connection::*;
pub use document::*;
pub use node::*;
pub use value::*;
