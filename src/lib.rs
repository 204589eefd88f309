pub mod app;
pub mod nota;
pub mod peripheral;
pub mod tracing;
pub mod util;

extern crate lazy_static;

#[cfg(any(test, feature = "testlib"))]
pub mod testlib;
