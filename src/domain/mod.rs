// Domain layer: records and ports. No knowledge of HTTP or S3.

pub mod model;
pub mod ports;
