//! Build script for generating Scout protocol buffer code.

use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Proto files live at the workspace root so other tooling can reuse them
    let proto_root = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?)
        .parent()
        .unwrap()
        .join("proto");

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        // Generate descriptors for runtime reflection
        .file_descriptor_set_path(PathBuf::from(env::var("OUT_DIR")?).join("scout_descriptor.bin"))
        // Serde derives so messages can be dumped into structured logs and fixtures
        .type_attribute("scout", "#[derive(serde::Serialize, serde::Deserialize)]")
        .type_attribute("scout", "#[serde(rename_all = \"camelCase\")]")
        // Suppress specific clippy warnings for generated code
        .type_attribute(
            ".",
            "#[allow(clippy::all, clippy::pedantic, clippy::nursery)]",
        )
        .server_attribute(
            ".",
            "#[allow(clippy::all, clippy::pedantic, clippy::nursery)]",
        )
        .client_attribute(
            ".",
            "#[allow(clippy::all, clippy::pedantic, clippy::nursery)]",
        )
        .compile_protos(
            &[
                proto_root.join("scout/v1/event.proto"),
                proto_root.join("scout/v1/service_analyzer.proto"),
                proto_root.join("scout/v1/service_data.proto"),
            ],
            &[proto_root],
        )?;

    Ok(())
}
