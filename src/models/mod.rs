/// Классификаторы

pub mod classifier;
pub mod kernel_centroid;

pub use classifier::ExternalClassifier;
pub use kernel_centroid::KernelCentroidClassifier;
