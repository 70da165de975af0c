//! Configuration input: flat properties and their validated form

pub mod properties;
pub mod spec;

pub use properties::{Properties, KEY_PREFIX};
pub use spec::{
    AppenderKind, AppenderSpec, ConfigSpec, LayoutSpec, LoggerSpec, RootSpec,
    DEFAULT_CONSOLE_PATTERN, DEFAULT_ROOT_LEVEL,
};
