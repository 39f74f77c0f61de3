pub mod connector;
pub mod port_validator;

pub use port_validator::PortValidator;
