use std::path::PathBuf;

use codegen::{CliGenerator, CodeGenerator};
use config::GeneratorConfig;
use descriptor::DescriptorSet;
use prost_types::{
    field_descriptor_proto::{Label, Type},
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, MethodDescriptorProto,
    ServiceDescriptorProto,
};
use tonic_build::manual;

/// `(proto name, rust name, client streaming, server streaming)`
const METHODS: [(&str, &str, bool, bool); 4] = [
    ("Deposit", "deposit", false, false),
    ("Upload", "upload", true, false),
    ("Watch", "watch", false, true),
    ("Exchange", "exchange", true, true),
];

fn bank_proto() -> FileDescriptorProto {
    let amount = DescriptorProto {
        name: Some("Amount".to_string()),
        field: vec![FieldDescriptorProto {
            name: Some("units".to_string()),
            number: Some(1),
            label: Some(Label::Optional as i32),
            r#type: Some(Type::Int64 as i32),
            json_name: Some("units".to_string()),
            ..Default::default()
        }],
        ..Default::default()
    };
    let method = METHODS.iter().map(|&(name, _, client, server)| MethodDescriptorProto {
        name: Some(name.to_string()),
        input_type: Some(".bank.Amount".to_string()),
        output_type: Some(".bank.Amount".to_string()),
        client_streaming: Some(client),
        server_streaming: Some(server),
        ..Default::default()
    });
    FileDescriptorProto {
        name: Some("bank.proto".to_string()),
        package: Some("bank".to_string()),
        message_type: vec![amount],
        service: vec![ServiceDescriptorProto {
            name: Some("Bank".to_string()),
            method: method.collect(),
            ..Default::default()
        }],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

fn bank_service() -> manual::Service {
    let mut service = manual::Service::builder().name("Bank").package("bank");
    for (route, name, client, server) in METHODS {
        let mut method = manual::Method::builder()
            .name(name)
            .route_name(route)
            .input_type("crate::bank::Amount")
            .output_type("crate::bank::Amount")
            .codec_path("tonic::codec::ProstCodec");
        if client {
            method = method.client_streaming();
        }
        if server {
            method = method.server_streaming();
        }
        service = service.method(method.build());
    }
    service.build()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);

    let set = DescriptorSet::from_protos(&[bank_proto()])?;
    let file = set.file("bank.proto").ok_or("bank.proto missing from descriptor set")?;
    let config = GeneratorConfig::default();
    let generated = CliGenerator::new(&config).generate(file, &set)?.ok_or("bank.proto has no services")?;
    codegen::write_generated(&out_dir, &[generated])?;

    manual::Builder::new().compile(&[bank_service()]);

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
