fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Prefer a system protoc when one is configured.
    if std::env::var_os("PROTOC").is_none() {
        let protoc = protoc_bin_vendored::protoc_bin_path()?;
        // SAFETY: build scripts are single-threaded.
        unsafe { std::env::set_var("PROTOC", protoc) };
    }

    // Messages double as the HTTP gateway's JSON bodies.
    tonic_prost_build::configure()
        .build_server(true)
        .build_client(true)
        .type_attribute(
            ".",
            "#[derive(serde::Serialize, serde::Deserialize)] #[serde(default, rename_all = \"camelCase\")]",
        )
        .compile_protos(&["proto/blog.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto/blog.proto");
    Ok(())
}
