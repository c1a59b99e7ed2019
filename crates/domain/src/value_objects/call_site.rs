//! Call-site identity value object

use serde::Serialize;
use std::fmt;

use crate::value_objects::Layer;

/// Identity of one intercepted invocation
///
/// Built once per interception by the host hook and threaded through the
/// decision path; never persisted. The package accepts either dotted
/// (`com.example.api`) or Rust path (`com::example::api`) separators; the
/// qualified forms below normalize to the dotted spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CallSite {
    layer: Layer,
    package: String,
    type_name: String,
    method_name: String,
}

impl CallSite {
    /// Create a call-site identity
    pub fn new(
        layer: Layer,
        package: impl Into<String>,
        type_name: impl Into<String>,
        method_name: impl Into<String>,
    ) -> Self {
        Self {
            layer,
            package: package.into(),
            type_name: type_name.into(),
            method_name: method_name.into(),
        }
    }

    /// The layer category the hook assigned to this call
    #[must_use]
    pub const fn layer(&self) -> Layer {
        self.layer
    }

    /// The namespace the declaring type lives in
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The declaring type's bare name
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The invoked method's bare name
    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Fully qualified type name in dotted form, e.g. `com.example.api.HelloController`
    #[must_use]
    pub fn qualified_type(&self) -> String {
        if self.package.is_empty() {
            self.type_name.clone()
        } else {
            format!("{}.{}", self.package.replace("::", "."), self.type_name)
        }
    }

    /// Full method signature in dotted form, e.g. `com.example.api.HelloController.hello`
    #[must_use]
    pub fn signature(&self) -> String {
        format!("{}.{}", self.qualified_type(), self.method_name)
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.signature(), self.layer)
    }
}
