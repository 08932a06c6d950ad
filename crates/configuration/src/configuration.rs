//! Configuration for the server.

/// The 'Configuration' type collects all the information necessary to serve
/// queries at runtime.
///
/// 'ParsedConfiguration' deals with the concrete on-disk format, secrets
/// included; values of this type are produced from a 'ParsedConfiguration'
/// using 'make_runtime_configuration', with every secret resolved against the
/// environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub backend_url: String,
}
