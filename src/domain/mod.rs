pub mod assumptions;
pub mod result;
pub mod scenario;
