//! Kernel descriptor tables.
//!
//! A descriptor is one node-table entry: display name, implementation
//! reference, short name, description and the ordered parameter lists the
//! kernel's tags are derived from. Tables can also be loaded from TOML:
//!
//! ```toml
//! [[kernel]]
//! name = "Gaussian3x3"
//! implementation = "org.khronos.openvx.gaussian_3x3"
//! short-name = "GAUSSIAN_3x3"
//! description = "Computes a gaussian filter on the image by a 3x3 window."
//! inputs = [{ name = "input", type = "vx_image", description = "The input image." }]
//! outputs = [{ name = "output", type = "vx_image", description = "The output image." }]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{RegistryError, Tag};
use crate::graph::is_identifier;

/// One kernel parameter: name, native type and description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub native_type: String,
    #[serde(default)]
    pub description: String,
}

impl ParamDescriptor {
    pub fn new(
        name: impl Into<String>,
        native_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            native_type: native_type.into(),
            description: description.into(),
        }
    }

    pub fn tag(&self) -> Tag {
        Tag::from_native_type(&self.native_type)
    }
}

/// A node-table entry describing one kernel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct KernelDescriptor {
    /// Display name, used to build the `vx<Name>Node` constructor.
    pub name: String,
    /// Implementation reference, e.g. `org.khronos.openvx.gaussian_3x3`.
    pub implementation: String,
    /// Registry key.
    pub short_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub inputs: Vec<ParamDescriptor>,
    #[serde(default)]
    pub outputs: Vec<ParamDescriptor>,
    /// Declared input count, checked against `inputs` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_inputs: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_outputs: Option<usize>,
}

impl KernelDescriptor {
    pub fn new(
        name: impl Into<String>,
        implementation: impl Into<String>,
        short_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            implementation: implementation.into(),
            short_name: short_name.into(),
            description: description.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            num_inputs: None,
            num_outputs: None,
        }
    }

    /// Append an input parameter.
    pub fn input(mut self, name: &str, native_type: &str, description: &str) -> Self {
        self.inputs
            .push(ParamDescriptor::new(name, native_type, description));
        self
    }

    /// Append an output parameter.
    pub fn output(mut self, name: &str, native_type: &str, description: &str) -> Self {
        self.outputs
            .push(ParamDescriptor::new(name, native_type, description));
        self
    }

    pub fn input_tags(&self) -> Vec<Tag> {
        self.inputs.iter().map(ParamDescriptor::tag).collect()
    }

    pub fn output_tags(&self) -> Vec<Tag> {
        self.outputs.iter().map(ParamDescriptor::tag).collect()
    }

    /// Check the entry for internal consistency.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let kernel = if self.short_name.is_empty() {
            self.name.as_str()
        } else {
            self.short_name.as_str()
        };
        let malformed = |detail: String| RegistryError::MalformedDescriptor {
            kernel: kernel.to_string(),
            detail,
        };

        if !is_identifier(&self.short_name) {
            return Err(malformed(format!(
                "short name \"{}\" is not an identifier",
                self.short_name
            )));
        }
        if !is_identifier(&self.name) {
            return Err(malformed(format!(
                "display name \"{}\" is not an identifier",
                self.name
            )));
        }
        if let Some(declared) = self.num_inputs {
            if declared != self.inputs.len() {
                return Err(malformed(format!(
                    "declares {declared} inputs but lists {}",
                    self.inputs.len()
                )));
            }
        }
        if let Some(declared) = self.num_outputs {
            if declared != self.outputs.len() {
                return Err(malformed(format!(
                    "declares {declared} outputs but lists {}",
                    self.outputs.len()
                )));
            }
        }
        if self.inputs.is_empty() && self.outputs.is_empty() {
            return Err(malformed("no parameters".to_string()));
        }

        let mut seen = HashSet::new();
        for param in self.inputs.iter().chain(&self.outputs) {
            if param.name.trim().is_empty() {
                return Err(malformed("parameter with empty name".to_string()));
            }
            if param.native_type.trim().is_empty() {
                return Err(malformed(format!("parameter '{}' has no type", param.name)));
            }
            if !seen.insert(param.name.as_str()) {
                return Err(malformed(format!("parameter '{}' listed twice", param.name)));
            }
        }
        Ok(())
    }
}

/// An ordered list of kernel descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelTable {
    #[serde(default, rename = "kernel")]
    pub kernels: Vec<KernelDescriptor>,
}

impl KernelTable {
    /// The built-in vision kernel table.
    pub fn standard() -> Self {
        Self {
            kernels: super::table::standard_descriptors(),
        }
    }

    /// Parse a table from a TOML string.
    pub fn parse(input: &str) -> Result<Self, RegistryError> {
        Self::parse_named(input, "<inline>")
    }

    /// Load a table from a TOML file.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path).map_err(|source| RegistryError::TableIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse_named(&content, &path.display().to_string())
    }

    fn parse_named(input: &str, origin: &str) -> Result<Self, RegistryError> {
        toml::from_str(input).map_err(|source| RegistryError::TableParse {
            path: origin.to_string(),
            source,
        })
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }
}
