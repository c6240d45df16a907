// src/engine/mod.rs — Recommendation scoring
//
// Everything here works on in-memory snapshots; fetching lives in `source`.

pub mod collaborative;
pub mod content;
pub mod embedder;
pub mod frequent;
pub mod interactions;
pub mod ranker;
pub mod semantic;
pub mod similarity;
pub mod tfidf;
pub mod types;
