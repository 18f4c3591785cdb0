pub mod answers;
pub mod fetcher;
pub mod normalizer;
