//! Signal aggregation: raw site records into signal → site-set occurrences,
//! plus each site's best-known platform label.

pub mod aggregator;
pub mod enterprise;
pub mod labeling;
pub mod types;

pub use aggregator::SignalAggregator;
pub use enterprise::{infer_vendor, is_enterprise_header, VendorKind};
pub use labeling::label_site;
pub use types::{SignalIndex, SignalKey, SignalOccurrence};
