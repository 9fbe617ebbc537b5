/// Row decode command.
pub mod decode;
/// Decoded value tree printer.
pub mod print;
/// Label resolution command.
pub mod resolve;
/// Registry listing command.
pub mod types;

pub(crate) mod util;

#[cfg(test)]
pub(crate) mod test_support;
