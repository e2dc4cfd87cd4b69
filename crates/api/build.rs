use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use the vendored protoc and its well-known types so builds don't
    // depend on a system install.
    let mut config = prost_build::Config::new();
    config.protoc_executable(protoc_bin_vendored::protoc_bin_path()?);

    let includes = [PathBuf::from("proto"), protoc_bin_vendored::include_path()?];

    tonic_build::configure()
        .build_client(false)
        .build_server(true)
        .compile_protos_with_config(config, &["proto/vendors.proto"], &includes)?;

    println!("cargo:rerun-if-changed=proto");
    Ok(())
}
