/// Command, text, and callback handlers
pub mod handlers;
/// Payload delivery and inline keyboards
pub mod messaging;
