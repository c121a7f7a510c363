pub mod descendants;

pub use descendants::{children_recursive, Descendants};
