pub mod shapes;
pub mod typeface;

pub use typeface::{Typeface, TypefaceError};
