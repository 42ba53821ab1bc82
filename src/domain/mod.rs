// Domain layer - Preset records and placeholder constants

pub mod model;
