//! Resource data-transfer objects.
//!
//! DTOs are plain serde value types. Their wire schemas live next to them
//! as schema constructors; versions and content types are bound in
//! [`crate::descriptors`].
//!
//! Each resource family has one response enum (`ConfigResponse`,
//! `WorkflowRunResponse`, ...) with a variant per schema version, built
//! from a decoded envelope through [`FromEnvelope`](crate::FromEnvelope).

/// The only schema version the API currently serves.
pub const V1ALPHA1: &str = "v1alpha1";

/// Declare a version-tagged response enum.
///
/// Generates the enum, a `version()` accessor and a
/// [`FromEnvelope`](crate::FromEnvelope) impl that picks the variant
/// matching the envelope's version.
macro_rules! versioned_response {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident($ty:ty) => $version:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize)]
        #[serde(untagged)]
        pub enum $name {
            $(
                #[doc = concat!("Schema version `", $version, "`.")]
                $variant($ty),
            )+
        }

        impl $name {
            /// Schema version of this value.
            pub fn version(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => $version,)+
                }
            }
        }

        impl $crate::codec::FromEnvelope for $name {
            fn from_envelope(
                envelope: $crate::codec::TypedEnvelope,
            ) -> $crate::error::Result<Self> {
                let version = envelope.version().to_string();
                match version.as_str() {
                    $($version => envelope.into_dto().map(Self::$variant),)+
                    other => Err($crate::error::FlowdaptError::UnsupportedVersion {
                        kind: envelope.kind().to_string(),
                        operation: "decode".to_string(),
                        version: other.to_string(),
                        available: vec![$($version.to_string()),+],
                    }),
                }
            }
        }
    };
}

/// Bind a request DTO to its resource kind and schema version.
macro_rules! versioned_dto {
    ($ty:ty, $kind:expr, $version:expr) => {
        impl $crate::binder::VersionedDto for $ty {
            const KIND: $crate::negotiation::ResourceKind = $kind;
            const VERSION: &'static str = $version;
        }
    };
}

pub mod base;
pub mod configs;
pub mod metrics;
pub mod plugins;
pub mod system;
pub mod triggers;
pub mod workflows;
