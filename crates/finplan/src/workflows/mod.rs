pub mod assessment;
pub mod dialogue;
pub mod goals;
