mod assessment;
mod common;
mod repair;
