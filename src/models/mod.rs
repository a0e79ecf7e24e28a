pub mod enums;
pub mod field;

pub use field::{FieldDescriptor, FieldKind, FieldState};
