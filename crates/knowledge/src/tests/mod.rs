//! In-crate fakes and scenario tests for the answering pipeline.

pub(crate) mod fakes;
