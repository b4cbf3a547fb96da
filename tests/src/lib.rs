//! End-to-end tests over the assembled API router live in `tests/`.
