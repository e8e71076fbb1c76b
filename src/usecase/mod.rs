pub mod controller;
pub mod debounce;
pub mod pipeline;
pub mod ports;
pub mod services;
