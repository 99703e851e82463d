mod client;
mod payload;

pub use client::{ApiClient, GraphRequest};
pub use payload::{BlastRadiusData, FunctionEntry, GraphData, GraphPayload};

#[cfg(test)]
pub use payload::{RawEdge, RawNode};
