mod settings;

pub use settings::{GbanOptions, Settings};
