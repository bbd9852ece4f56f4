//! Writers for each section of a generated file.

use std::fmt::Write as _;

use config::GeneratorConfig;
use descriptor::{FileUnit, MethodUnit, ServiceUnit, StreamingShape};
use naming::{FileNames, MethodItems, ServiceNames};

use crate::render::Placeholders;
use crate::{CodegenError, Result};

const HEADER: &str = include_str!("../templates/header.rs");
const SERVICE: &str = include_str!("../templates/service.rs");
const METHOD: &str = include_str!("../templates/method.rs");
const UNARY: &str = include_str!("../templates/unary.rs");
const CLIENT_STREAM: &str = include_str!("../templates/client_stream.rs");
const SERVER_STREAM: &str = include_str!("../templates/server_stream.rs");
const BIDIRECTIONAL: &str = include_str!("../templates/bidirectional.rs");

/// Call body template for a shape.
pub fn shape_template(shape: StreamingShape) -> &'static str {
    match shape {
        StreamingShape::Unary => UNARY,
        StreamingShape::ClientStream => CLIENT_STREAM,
        StreamingShape::ServerStream => SERVER_STREAM,
        StreamingShape::Bidirectional => BIDIRECTIONAL,
    }
}

pub(crate) fn emit_header(code: &mut String, file: &FileUnit, config: &GeneratorConfig) {
    let mut placeholders = Placeholders::new();
    placeholders
        .set("VERSION", env!("CARGO_PKG_VERSION"))
        .set("SOURCE", file.name.as_str())
        .set("PACKAGE", if file.package().is_empty() { "_" } else { file.package() })
        .set("RUNTIME_CRATE", config.runtime_crate.as_str());
    code.push_str(&placeholders.render(HEADER));
}

pub(crate) fn emit_support_imports(code: &mut String, names: &FileNames) -> Result<()> {
    for binding in names.support().iter() {
        writeln!(code, "#[allow(unused_imports)]")?;
        writeln!(code, "use {} as {}; // {}", binding.path, binding.alias, binding.concern)?;
    }
    writeln!(code)?;
    Ok(())
}

pub(crate) fn emit_cross_imports(code: &mut String, names: &FileNames) -> Result<()> {
    if names.cross_imports().is_empty() {
        return Ok(());
    }
    for import in names.cross_imports() {
        writeln!(code, "#[allow(unused_imports)]")?;
        writeln!(code, "use {} as {};", import.path, import.alias)?;
    }
    writeln!(code)?;
    Ok(())
}

pub(crate) fn emit_service(
    code: &mut String,
    service: &ServiceUnit,
    service_names: &ServiceNames,
    names: &FileNames,
    config: &GeneratorConfig,
) -> Result<()> {
    let items = &service_names.items;
    let service_path = match names.package() {
        "" => service.name.clone(),
        package => format!("{package}.{}", service.name),
    };
    let mut placeholders = Placeholders::with_support(names.support());
    placeholders
        .set("SERVICE", items.type_name.as_str())
        .set("SERVICE_PATH", service_path)
        .set("COMMAND", items.command_name.as_str())
        .set("CONFIG", items.config_type.as_str())
        .set("HANDLE", items.handle_type.as_str())
        .set("CLIENT_MODULE", items.client_module.as_str())
        .set("CLIENT", items.client_type.as_str())
        .set("COMMAND_FN", items.command_fn.as_str())
        .set("RUN_FN", items.run_fn.as_str())
        .set("DIAL_FN", items.dial_fn.as_str())
        .set("ROUND_TRIP_FN", items.round_trip_fn.as_str())
        .set("DEFAULT_SERVER_ADDR", escape_str(&config.default_server_addr));

    let mut subcommands = String::new();
    let mut dispatch = String::new();
    for method in &service_names.methods {
        writeln!(subcommands, "        .subcommand({}())", method.command_fn)?;
        writeln!(
            dispatch,
            "        Some((\"{}\", sub)) => {}(&{}::from_matches(sub)),",
            method.command_name, method.run_fn, items.config_type
        )?;
    }
    placeholders.set("SUBCOMMANDS", subcommands).set("DISPATCH", dispatch);
    code.push_str(&placeholders.render(SERVICE));

    for (method, method_items) in service.methods.iter().zip(&service_names.methods) {
        emit_method(code, method, method_items, &placeholders, names)?;
    }
    Ok(())
}

fn emit_method(
    code: &mut String,
    method: &MethodUnit,
    items: &MethodItems,
    service: &Placeholders,
    names: &FileNames,
) -> Result<()> {
    let input = names
        .input_path(&method.input_type)
        .ok_or_else(|| CodegenError::UnresolvedInput(method.input_type.clone()))?;
    let shape = method.shape();
    tracing::trace!("{}: {} call {}", method.name, shape, input);

    let mut placeholders = service.clone();
    placeholders
        .set("METHOD", method.name.as_str())
        .set("METHOD_COMMAND", items.command_name.as_str())
        .set("METHOD_COMMAND_FN", items.command_fn.as_str())
        .set("METHOD_RUN_FN", items.run_fn.as_str())
        .set("METHOD_CALL_FN", items.call_fn.as_str())
        .set("RPC", items.rpc.as_str())
        .set("SHAPE", shape.as_str())
        .set("INPUT", input);
    code.push_str(&placeholders.render(METHOD));
    code.push_str(&placeholders.render(shape_template(shape)));
    Ok(())
}

/// Escape `value` for a Rust string literal.
fn escape_str(value: &str) -> String { value.escape_default().to_string() }
