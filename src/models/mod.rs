pub mod donor;

pub use donor::{BLOOD_TYPES, SearchParameters};
