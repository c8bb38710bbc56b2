pub mod rodio_device;
pub mod service;
