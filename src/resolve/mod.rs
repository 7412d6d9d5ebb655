//! Source adapters and the region-fallback resolver
//!
//! Each source is wrapped in a [`SourceAdapter`] that answers exact lookups
//! and, where it can, cross-region averages. [`FallbackResolver`] decides from
//! a single policy table whether a region miss may be answered by an average.

mod adapters;
mod fallback;

pub use adapters::*;
pub use fallback::*;

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::reference::FlowType;

/// The three footprint sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Source {
    /// Process-flow supply-chain database (BONSAI)
    ProcessFlow,
    /// National lifecycle-assessment table (Agribalyse)
    National,
    /// Multi-region per-product table (Big Climate Database)
    MultiRegion,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::ProcessFlow, Source::National, Source::MultiRegion];

    /// Name used in rendered text
    pub fn display_name(&self) -> &'static str {
        match self {
            Source::ProcessFlow => "BONSAI",
            Source::National => "Agribalyse",
            Source::MultiRegion => "BigClimateDatabase",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// What the caller asks a source for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Query<'a> {
    pub product: &'a str,
    /// Sources without flow types are queried as [`FlowType::Product`]
    pub flow_type: FlowType,
    /// Region display name
    pub region: &'a str,
}

impl<'a> Query<'a> {
    pub fn new(product: &'a str, flow_type: FlowType, region: &'a str) -> Self {
        Self {
            product,
            flow_type,
            region,
        }
    }

    /// Query for a source that has no notion of flow type
    pub fn untyped(product: &'a str, region: &'a str) -> Self {
        Self::new(product, FlowType::Product, region)
    }
}

/// Why a source has no answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum Miss {
    #[error("no such activity/flow_type")]
    Activity,
    #[error("no product")]
    Product,
    #[error("no data for region")]
    Region,
}

/// A record produced by averaging every region a source holds for a product
#[derive(Debug, Clone, PartialEq)]
pub struct Averaged<T> {
    pub record: T,
    /// Display names of the averaged regions, in snapshot order
    pub regions: Vec<String>,
}

/// Outcome of resolving one query against one source
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    Exact(T),
    /// Region fallback: the record is a cross-region average
    Approximate(Averaged<T>),
    NotFound(Miss),
}

impl<T> Resolution<T> {
    pub fn is_exact(&self) -> bool {
        matches!(self, Resolution::Exact(_))
    }

    pub fn is_approximate(&self) -> bool {
        matches!(self, Resolution::Approximate(_))
    }

    pub fn record(&self) -> Option<&T> {
        match self {
            Resolution::Exact(record) => Some(record),
            Resolution::Approximate(averaged) => Some(&averaged.record),
            Resolution::NotFound(_) => None,
        }
    }

    pub fn miss(&self) -> Option<Miss> {
        match self {
            Resolution::NotFound(miss) => Some(*miss),
            _ => None,
        }
    }
}
