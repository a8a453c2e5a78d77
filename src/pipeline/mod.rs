pub mod extraction;
pub mod capture; // Retake supersession for in-flight extractions
