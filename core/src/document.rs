//! Descriptor documents.
//!
//! A [`ClassDescriptor`] can be authored as JSON or YAML instead of through
//! the builder API. Loading always validates, so a document that parses but
//! breaks a descriptor invariant is rejected the same way a bad builder chain
//! would be.
//!
//! Both formats write enum variants carrying data as single-key maps:
//! `{option: {...}}` for a command parameter and `{choice: [...]}` for a
//! choice value type.

use serde_yaml::with::singleton_map_recursive;

use crate::{ClassDescriptor, DescriptorError, validate_descriptor};

impl ClassDescriptor {
    /// Parses and validates a descriptor from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Malformed`](DescriptorError::Malformed) if the document does
    /// not deserialize, or the first validation error otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdline_core::{ClassDescriptor, ValueType};
    ///
    /// let desc = ClassDescriptor::from_json_str(
    ///     r#"{"name": "tool", "options": [{"names": ["o"], "required": true}]}"#,
    /// )
    /// .unwrap();
    /// assert_eq!(desc.options[0].value_type, ValueType::String);
    /// assert!(desc.options[0].required);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, DescriptorError> {
        let desc: Self =
            serde_json::from_str(json).map_err(|e| DescriptorError::Malformed(e.to_string()))?;
        desc.validated()
    }

    /// Parses and validates a descriptor from YAML.
    ///
    /// # Errors
    ///
    /// Same as [`from_json_str`](Self::from_json_str).
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DescriptorError> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml);
        let desc: Self = singleton_map_recursive::deserialize(deserializer)
            .map_err(|e| DescriptorError::Malformed(e.to_string()))?;
        desc.validated()
    }

    /// Serializes the descriptor as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, DescriptorError> {
        serde_json::to_string_pretty(self).map_err(|e| DescriptorError::Malformed(e.to_string()))
    }

    /// Serializes the descriptor as YAML, in the shape
    /// [`from_yaml_str`](Self::from_yaml_str) reads.
    pub fn to_yaml_string(&self) -> Result<String, DescriptorError> {
        let mut buf = Vec::new();
        {
            let mut serializer = serde_yaml::Serializer::new(&mut buf);
            singleton_map_recursive::serialize(self, &mut serializer)
                .map_err(|e| DescriptorError::Malformed(e.to_string()))?;
        }
        String::from_utf8(buf).map_err(|e| DescriptorError::Malformed(e.to_string()))
    }

    fn validated(self) -> Result<Self, DescriptorError> {
        match validate_descriptor(&self).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}
