//! Installed plugins and their files.

use crate::schema::{Field, ObjectSchema, Schema};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Package metadata of a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct V1Alpha1PluginMetadata {
    /// Short description.
    pub description: String,
    /// Author.
    pub author: String,
    /// License identifier.
    pub license: String,
    /// Homepage.
    pub url: String,
    /// Package version.
    pub version: String,
    /// Python requirements.
    #[serde(default)]
    pub requirements: Vec<String>,
}

/// An installed plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct V1Alpha1Plugin {
    /// Plugin name.
    pub name: String,
    /// Package metadata.
    pub metadata: V1Alpha1PluginMetadata,
    /// Importable module path.
    pub module: String,
}

/// Files shipped with a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct V1Alpha1PluginFiles {
    /// File paths relative to the plugin root.
    pub files: Vec<String>,
}

versioned_response! {
    /// A plugin returned by the plugin read operations.
    PluginResponse {
        V1Alpha1(V1Alpha1Plugin) => "v1alpha1",
    }
}

versioned_response! {
    /// A plugin file listing.
    PluginFilesResponse {
        V1Alpha1(V1Alpha1PluginFiles) => "v1alpha1",
    }
}

/// Wire schema of [`V1Alpha1PluginMetadata`].
pub fn v1alpha1_metadata_schema() -> Schema {
    Schema::object(
        ObjectSchema::new("V1Alpha1PluginMetadata")
            .field(Field::required("description", Schema::String))
            .field(Field::required("author", Schema::String))
            .field(Field::required("license", Schema::String))
            .field(Field::required("url", Schema::String))
            .field(Field::required("version", Schema::String))
            .field(Field::with_default(
                "requirements",
                Schema::array(Schema::String),
                json!([]),
            )),
    )
}

/// Wire schema of [`V1Alpha1Plugin`].
pub fn v1alpha1_plugin_schema() -> Schema {
    Schema::object(
        ObjectSchema::new("V1Alpha1Plugin")
            .field(Field::required("name", Schema::String))
            .field(Field::required("metadata", v1alpha1_metadata_schema()))
            .field(Field::required("module", Schema::String)),
    )
}

/// Wire schema of [`V1Alpha1PluginFiles`].
pub fn v1alpha1_files_schema() -> Schema {
    Schema::object(
        ObjectSchema::new("V1Alpha1PluginFiles")
            .field(Field::required("files", Schema::array(Schema::String))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaValidator;

    #[test]
    fn requirements_default_to_empty() {
        let value = SchemaValidator::validate(
            &v1alpha1_plugin_schema(),
            &json!({
                "name": "example",
                "module": "example.plugin",
                "metadata": {
                    "description": "d",
                    "author": "a",
                    "license": "MIT",
                    "url": "https://example.com",
                    "version": "1.0.0"
                }
            }),
        )
        .unwrap();

        let plugin: V1Alpha1Plugin = serde_json::from_value(value).unwrap();
        assert!(plugin.metadata.requirements.is_empty());
    }

    #[test]
    fn files_must_be_strings() {
        let err =
            SchemaValidator::validate(&v1alpha1_files_schema(), &json!({ "files": ["a", 1] }))
                .unwrap_err();
        assert_eq!(err.violations().unwrap()[0].path, "files[1]");
    }
}
