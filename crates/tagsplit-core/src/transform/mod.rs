pub mod host_override;
pub mod name_normalizer;

pub use host_override::{HostOverride, apply_host_override};
pub use name_normalizer::{NormalizedName, normalize_name, route_to_name};
