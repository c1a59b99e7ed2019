//! Value Objects - Immutable, identity-less chaos primitives

mod assault_kind;
mod call_site;
mod decision;
mod exclusions;
mod latency_range;
mod layer;
mod level;

pub use assault_kind::AssaultKind;
pub use call_site::CallSite;
pub use decision::Decision;
pub use exclusions::ExclusionList;
pub use latency_range::LatencyRange;
pub use layer::Layer;
pub use level::Level;
