/// Fatal errors raised while building the command registry.
///
/// These are configuration errors: they abort construction of the control
/// plane at startup and never occur at dispatch time.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Two providers declared the same command name.
    #[error("duplicate command registration: {name}")]
    DuplicateCommand {
        /// The colliding command name.
        name: String,
    },

    /// A declared command name is not dot-separated `category.action`.
    #[error("invalid command name {name:?}: expected dot-separated category.action")]
    InvalidName {
        /// The rejected name.
        name: String,
    },
}
