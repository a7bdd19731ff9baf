// Library root: the event loop, console parser and message types, exposed
// so integration tests can drive the loop without the binary.

pub mod app;
pub mod console;
pub mod protocol;
