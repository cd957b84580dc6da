use std::path::Path;

use dynamo_codegen::parser::IndexKind;
use dynamo_codegen::resolver::{InMemoryMetadataSource, LiveTable};
use dynamo_codegen::CodegenBuilder;

fn main() {
    // Generate code for the generated_code tests
    // The output is only used by tests (via include!), so it won't
    // affect normal library compilation
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let out_dir = Path::new(&out_dir);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    let demo = InMemoryMetadataSource::new()
        .with_table(LiveTable::new("Users").hash_key("user_id", "S"))
        .with_table(
            LiveTable::new("OrderItems")
                .hash_key("order_id", "S")
                .range_key("line_no", "N")
                .index("sku-index", IndexKind::Global, "sku", None)
                .attribute("sku", "S"),
        )
        .with_table(LiveTable::new("AuditLog").hash_key("event_id", "S"));
    generate(
        &runtime,
        "../demos/tables.json",
        &out_dir.join("demo"),
        "crate::demo::models",
        &demo,
    );

    let edge = InMemoryMetadataSource::new()
        .with_table(
            LiveTable::new("Client")
                .hash_key("client", "S")
                .range_key("item", "N"),
        )
        .with_table(LiveTable::new("self").hash_key("id", "S"))
        .with_table(LiveTable::new("Error").hash_key("digest", "B"))
        .with_table(LiveTable::new("Option").hash_key("id", "S"))
        .with_table(LiveTable::new("Blob").hash_key("id", "S"))
        .with_table(LiveTable::new("AttributeValue").hash_key("id", "S"));
    generate(
        &runtime,
        "fixtures/edge_cases.json",
        &out_dir.join("edge"),
        "crate::edge::models",
        &edge,
    );

    println!("cargo:rerun-if-changed=../demos/tables.json");
    println!("cargo:rerun-if-changed=fixtures/edge_cases.json");
}

fn generate(
    runtime: &tokio::runtime::Runtime,
    input: &str,
    out_dir: &Path,
    models_module: &str,
    source: &InMemoryMetadataSource,
) {
    let report = runtime
        .block_on(
            CodegenBuilder::new(input)
                .model_output(out_dir, "models")
                .crud_output(out_dir, "crud")
                .models_module(models_module)
                .generate_with_source(source),
        )
        .expect("codegen failed");
    assert!(
        !report.has_unprocessed(),
        "{}",
        report.unprocessed_summary()
    );
}
