mod handler;
mod model;

pub use handler::search_donors;
pub use model::{DONOR_SEARCH_PATH, DonorSearchService};
