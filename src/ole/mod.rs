/// Constants for the OLE field container
pub mod consts;

/// Access OLE field parsing: header, object types and the container walker
///
/// An OLE field is the value of an "OLE Object" column in a legacy desktop
/// database. It wraps one or more OLE 1.0 object streams behind a short
/// header and ends with a fixed footer.
pub mod field;

// Re-export public types for convenient access
pub use field::{
    ContainerWalker, ObjectFormat, ObjectSegment, ObjectType, OleField, OleFieldHeader,
    parse_container,
};
