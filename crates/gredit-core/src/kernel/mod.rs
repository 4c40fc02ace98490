//! Kernel signatures and the kernel registry.
//!
//! A kernel is a named operation with a fixed, ordered signature of input and
//! output tags. The registry is assembled once through a [`RegistryBuilder`]
//! and frozen into an immutable [`KernelRegistry`] that graph construction and
//! emission borrow.

pub mod descriptor;
pub mod table;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use self::descriptor::{KernelDescriptor, KernelTable};

/// Errors raised while populating or querying the kernel registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown kernel: {name}")]
    UnknownKernel { name: String },

    #[error("malformed descriptor for kernel '{kernel}': {detail}")]
    MalformedDescriptor { kernel: String, detail: String },

    #[error("duplicate kernel: {name}")]
    DuplicateKernel { name: String },

    #[error("cannot read kernel table {path}: {source}")]
    TableIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse kernel table {path}: {source}")]
    TableParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Value kind carried by a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tag {
    Image,
    Buffer,
    Scalar,
}

impl Tag {
    /// All tags, in builtin registration order.
    pub const ALL: [Tag; 3] = [Tag::Image, Tag::Buffer, Tag::Scalar];

    /// Single-character signature code.
    pub fn code(self) -> char {
        match self {
            Tag::Image => 'I',
            Tag::Buffer => 'B',
            Tag::Scalar => 'S',
        }
    }

    /// Parse a signature code, ignoring case.
    pub fn from_code(c: char) -> Option<Tag> {
        match c.to_ascii_uppercase() {
            'I' => Some(Tag::Image),
            'B' => Some(Tag::Buffer),
            'S' => Some(Tag::Scalar),
            _ => None,
        }
    }

    /// Classify a native parameter type. Anything that is not an image or a
    /// buffer is a scalar.
    pub fn from_native_type(native_type: &str) -> Tag {
        match native_type.trim() {
            "vx_image" => Tag::Image,
            "vx_buffer" => Tag::Buffer,
            _ => Tag::Scalar,
        }
    }

    /// Name of the builtin pass-through kernel for this tag.
    pub fn kernel_name(self) -> &'static str {
        match self {
            Tag::Image => "IMAGE",
            Tag::Buffer => "BUFFER",
            Tag::Scalar => "SCALAR",
        }
    }

    pub fn from_kernel_name(name: &str) -> Option<Tag> {
        Tag::ALL.into_iter().find(|t| t.kernel_name() == name)
    }

    /// Host-language handle type for values of this tag.
    pub fn native_type(self) -> &'static str {
        match self {
            Tag::Image => "vx_image",
            Tag::Buffer => "vx_buffer",
            Tag::Scalar => "vx_scalar",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kernel_name())
    }
}

/// A named operation with a fixed input/output signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    /// Registry key (the descriptor's short name for table kernels).
    pub name: String,
    pub inputs: Vec<Tag>,
    pub outputs: Vec<Tag>,
    /// Source descriptor. `None` for builtins and signature-string kernels.
    pub descriptor: Option<KernelDescriptor>,
}

impl Kernel {
    /// The pass-through kernel for a data tag.
    pub fn builtin(tag: Tag) -> Self {
        Self {
            name: tag.kernel_name().to_string(),
            inputs: vec![tag],
            outputs: vec![tag],
            descriptor: None,
        }
    }

    /// Build a kernel from signature strings such as `Kernel::from_signature("FOO", "SI", "B")`,
    /// meaning two inputs (a scalar then an image) and one buffer output.
    pub fn from_signature(name: &str, inputs: &str, outputs: &str) -> Result<Self, RegistryError> {
        Ok(Self {
            name: name.to_string(),
            inputs: parse_signature(name, inputs)?,
            outputs: parse_signature(name, outputs)?,
            descriptor: None,
        })
    }

    /// Derive a kernel from a node-table descriptor, keyed by its short name.
    pub fn from_descriptor(descriptor: &KernelDescriptor) -> Result<Self, RegistryError> {
        descriptor.validate()?;
        Ok(Self {
            name: descriptor.short_name.clone(),
            inputs: descriptor.input_tags(),
            outputs: descriptor.output_tags(),
            descriptor: Some(descriptor.clone()),
        })
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// The tag of a builtin data kernel, `None` for processing kernels.
    pub fn data_tag(&self) -> Option<Tag> {
        if self.descriptor.is_some() {
            return None;
        }
        Tag::from_kernel_name(&self.name)
            .filter(|t| self.inputs == [*t] && self.outputs == [*t])
    }

    /// Name used in generated constructor calls.
    pub fn display_name(&self) -> &str {
        self.descriptor
            .as_ref()
            .map(|d| d.name.as_str())
            .unwrap_or(&self.name)
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes = |tags: &[Tag]| tags.iter().map(|t| t.code()).collect::<String>();
        write!(
            f,
            "{}({}) -> ({})",
            self.name,
            codes(&self.inputs),
            codes(&self.outputs)
        )
    }
}

fn parse_signature(kernel: &str, signature: &str) -> Result<Vec<Tag>, RegistryError> {
    signature
        .chars()
        .map(|c| {
            Tag::from_code(c).ok_or_else(|| RegistryError::MalformedDescriptor {
                kernel: kernel.to_string(),
                detail: format!("invalid signature code '{c}' in \"{signature}\""),
            })
        })
        .collect()
}

/// Mutable staging area for registry population.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    kernels: IndexMap<String, Arc<Kernel>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the IMAGE, BUFFER and SCALAR pass-through kernels.
    pub fn register_builtins(&mut self) -> &mut Self {
        for tag in Tag::ALL {
            self.kernels
                .insert(tag.kernel_name().to_string(), Arc::new(Kernel::builtin(tag)));
        }
        self
    }

    /// Insert a kernel, rejecting a name that is already registered.
    pub fn register_kernel(&mut self, kernel: Kernel) -> Result<&mut Self, RegistryError> {
        if self.kernels.contains_key(&kernel.name) {
            return Err(RegistryError::DuplicateKernel { name: kernel.name });
        }
        tracing::debug!(kernel = %kernel, "registered kernel");
        self.kernels.insert(kernel.name.clone(), Arc::new(kernel));
        Ok(self)
    }

    /// Derive a kernel from a descriptor and insert it under its short name.
    pub fn register_descriptor(
        &mut self,
        descriptor: &KernelDescriptor,
    ) -> Result<&mut Self, RegistryError> {
        let kernel = Kernel::from_descriptor(descriptor)?;
        self.register_kernel(kernel)
    }

    /// Register every descriptor in a table, in table order.
    pub fn register_table(&mut self, table: &KernelTable) -> Result<&mut Self, RegistryError> {
        for descriptor in &table.kernels {
            self.register_descriptor(descriptor)?;
        }
        Ok(self)
    }

    /// Freeze the builder into a read-only registry.
    pub fn build(self) -> KernelRegistry {
        KernelRegistry {
            kernels: self.kernels,
        }
    }
}

/// Immutable mapping from kernel name to signature.
///
/// Entries are reference counted so graphs can hold on to the kernels they
/// invoke; the registry itself is never mutated after [`RegistryBuilder::build`]
/// and can be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct KernelRegistry {
    kernels: IndexMap<String, Arc<Kernel>>,
}

impl KernelRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// A registry holding only the three builtin data kernels.
    pub fn builtin() -> Self {
        let mut builder = RegistryBuilder::new();
        builder.register_builtins();
        builder.build()
    }

    /// Builtins plus the standard node table.
    pub fn standard() -> Result<Self, RegistryError> {
        let mut builder = RegistryBuilder::new();
        builder
            .register_builtins()
            .register_table(&KernelTable::standard())?;
        Ok(builder.build())
    }

    /// Look up a kernel by name.
    pub fn lookup(&self, name: &str) -> Result<&Arc<Kernel>, RegistryError> {
        self.kernels
            .get(name)
            .ok_or_else(|| RegistryError::UnknownKernel {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kernels.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    /// All kernels in registration order.
    pub fn kernels(&self) -> impl Iterator<Item = &Arc<Kernel>> {
        self.kernels.values()
    }

    /// Kernels that came from a descriptor, with that descriptor.
    pub fn described(&self) -> impl Iterator<Item = (&Kernel, &KernelDescriptor)> {
        self.kernels
            .values()
            .filter_map(|k| k.descriptor.as_ref().map(|d| (k.as_ref(), d)))
    }
}
