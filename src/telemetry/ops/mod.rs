pub mod extract;
pub mod batch;
pub mod add;
pub mod settings;
