// Domain layer: models and ports only. Concrete HTTP and filesystem code lives under adapters.

pub mod model;
pub mod ports;
