//! End-to-end tests of the question-answering pipeline.

mod pipeline;
