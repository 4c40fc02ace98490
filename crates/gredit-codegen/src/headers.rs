//! Node and kernel declaration headers derived from the kernel registry.
//!
//! Only kernels that came from a descriptor are declared; the builtin data
//! kernels have no constructor of their own.

use std::io::Write;
use std::path::Path;

use gredit_core::kernel::descriptor::{KernelDescriptor, ParamDescriptor};
use gredit_core::kernel::KernelRegistry;

use crate::error::CodegenError;
use crate::writer::{write_artifact, CodeWriter};

const NODE_GUARD: &str = "_VX_NODES_H_";
const KERNEL_GUARD: &str = "_VX_KERNELS_H_";
const KERNEL_BASE: &str = "VX_KERNEL_BASE(VX_ID_KHRONOS, VX_LIBRARY_KHR_BASE)";

fn open_guard<W: Write>(w: &mut CodeWriter<W>, guard: &str) -> std::io::Result<()> {
    w.line("/* Generated by gredit-headers. Do not edit. */")?;
    w.line(format_args!("#ifndef {guard}"))?;
    w.line(format_args!("#define {guard}"))?;
    w.blank()
}

fn close_guard<W: Write>(w: &mut CodeWriter<W>, guard: &str) -> std::io::Result<()> {
    w.line(format_args!("#endif /* {guard} */"))
}

fn params<'a>(
    descriptor: &'a KernelDescriptor,
) -> impl Iterator<Item = (&'a ParamDescriptor, &'static str)> {
    descriptor
        .inputs
        .iter()
        .map(|p| (p, "in"))
        .chain(descriptor.outputs.iter().map(|p| (p, "out")))
}

/// Write one documented `vx<Name>Node` prototype per described kernel.
pub fn write_node_header<W: Write>(
    registry: &KernelRegistry,
    out: &mut W,
) -> Result<(), CodegenError> {
    let mut w = CodeWriter::new(out);
    open_guard(&mut w, NODE_GUARD)?;
    w.line("#include <VX/vx.h>")?;

    for (_, descriptor) in registry.described() {
        w.blank()?;
        w.line(format_args!("/*! \\brief [Graph] {}", descriptor.description))?;
        w.line(" * \\param [in] graph The reference to the graph.")?;
        for (param, direction) in params(descriptor) {
            w.line(format_args!(
                " * \\param [{direction}] {} {}",
                param.name, param.description
            ))?;
        }
        w.line(" * \\return <tt>\\ref vx_node</tt>.")?;
        w.line(" */")?;

        let mut args = vec!["vx_graph graph".to_string()];
        args.extend(params(descriptor).map(|(p, _)| format!("{} {}", p.native_type, p.name)));
        w.line(format_args!(
            "vx_node vx{}Node({});",
            descriptor.name,
            args.join(", ")
        ))?;
    }

    w.blank()?;
    close_guard(&mut w, NODE_GUARD)?;
    Ok(())
}

/// Write the `vx_kernel_e` enumeration, one entry per described kernel
/// numbered from the Khronos library base.
pub fn write_kernel_header<W: Write>(
    registry: &KernelRegistry,
    out: &mut W,
) -> Result<(), CodegenError> {
    let mut w = CodeWriter::new(out);
    open_guard(&mut w, KERNEL_GUARD)?;

    let described: Vec<&KernelDescriptor> = registry.described().map(|(_, d)| d).collect();
    if !described.is_empty() {
        w.line("/*! \\brief The list of available vision kernels. */")?;
        w.line("enum vx_kernel_e {")?;
        {
            let mut body = w.indent();
            for (i, descriptor) in described.iter().enumerate() {
                if i > 0 {
                    body.blank()?;
                }
                body.line(format_args!("/*! \\brief {}", descriptor.description))?;
                body.line(format_args!(" * \\see {}", descriptor.implementation))?;
                body.line(" */")?;
                body.line(format_args!(
                    "VX_KERNEL_{} = {KERNEL_BASE} + {:#x},",
                    descriptor.short_name,
                    i + 1
                ))?;
            }
        }
        w.line("};")?;
        w.blank()?;
    }

    close_guard(&mut w, KERNEL_GUARD)?;
    Ok(())
}

/// Write the node header to `path`, leaving nothing behind on failure.
pub fn write_node_header_file(registry: &KernelRegistry, path: &Path) -> Result<(), CodegenError> {
    write_artifact(path, |out| write_node_header(registry, out))?;
    tracing::info!(path = %path.display(), "wrote node header");
    Ok(())
}

/// Write the kernel header to `path`, leaving nothing behind on failure.
pub fn write_kernel_header_file(
    registry: &KernelRegistry,
    path: &Path,
) -> Result<(), CodegenError> {
    write_artifact(path, |out| write_kernel_header(registry, out))?;
    tracing::info!(path = %path.display(), "wrote kernel header");
    Ok(())
}
