pub mod prelude;
pub mod text;
