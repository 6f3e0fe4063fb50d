pub mod fondo;

pub use fondo::*;

pub use fondo::Entity as Fondo;
