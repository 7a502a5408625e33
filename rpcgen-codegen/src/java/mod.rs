//! Java code generation modules.

pub mod classes;
pub mod enums;
pub mod members;

pub use classes::ClassGenerator;
pub use enums::EnumGenerator;
pub use members::MemberGenerator;
