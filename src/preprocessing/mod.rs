/// Модуль предобработки данных

pub mod assembler;
pub mod chain;
pub mod encoding;
pub mod feature_selection;
pub mod filter;
pub mod normalization;
pub mod range;
pub mod reduction;
pub mod split;

pub use chain::{ChainOutput, FittedTransforms};
pub use encoding::{LabelEncoder, OneHotEncoder};
pub use feature_selection::{FeatureSchema, ValidatedSchema};
pub use filter::{CompareOp, Predicate};
pub use normalization::StandardScaler;
pub use range::MinMaxScaler;
pub use reduction::Pca;
pub use split::{train_test_split, TrainTestSplit};
