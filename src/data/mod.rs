/// Загрузка исходных данных

pub mod loader;
pub mod synthetic;

pub use loader::{load, load_from_reader, DataSource};
pub use synthetic::BuiltinDataset;
