//! Test suite for the split/reassemble pipelines.

mod helpers;

mod concurrency;
mod corruption;
