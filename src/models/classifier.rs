//! Граница с внешним классификатором

use crate::error::Result;
use crate::types::{ClassificationResult, ClassifierInput};

/// Внешний классификатор (например, QSVM на симуляторе).
/// Вызов блокирующий; ошибки считаются фатальными и пробрасываются как есть.
pub trait ExternalClassifier {
    fn name(&self) -> &str;

    fn run(&mut self, input: &ClassifierInput) -> Result<ClassificationResult>;
}
