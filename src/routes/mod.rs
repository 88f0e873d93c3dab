pub mod donor;
pub mod system;
