//! Shader Tests - WGSL Parsing and Validation
//!
//! Runs both scene shaders through naga so layout or syntax mistakes show up
//! without a GPU.

const STARFIELD_WGSL: &str = include_str!("../../shaders/starfield.wgsl");
const GLOBE_WGSL: &str = include_str!("../../shaders/globe.wgsl");

fn validate(name: &str, source: &str) -> naga::Module {
    let module = naga::front::wgsl::parse_str(source)
        .unwrap_or_else(|e| panic!("{name} failed to parse:\n{}", e.emit_to_string(source)));

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .unwrap_or_else(|e| panic!("{name} failed validation: {e:?}"));

    module
}

fn entry_points(module: &naga::Module) -> Vec<&str> {
    module.entry_points.iter().map(|ep| ep.name.as_str()).collect()
}

#[test]
fn test_starfield_shader_valid() {
    let module = validate("starfield.wgsl", STARFIELD_WGSL);
    let entries = entry_points(&module);
    assert!(entries.contains(&"vs_star"));
    assert!(entries.contains(&"fs_star"));
}

#[test]
fn test_globe_shader_valid() {
    let module = validate("globe.wgsl", GLOBE_WGSL);
    let entries = entry_points(&module);
    assert!(entries.contains(&"vs_mesh"));
    assert!(entries.contains(&"fs_globe"));
    assert!(entries.contains(&"fs_overlay"));
}

#[test]
fn test_uniform_struct_sizes_match_rust() {
    use star_globe_engine::render::{MeshUniforms, StarUniforms};

    for (source, type_name, rust_size) in [
        (STARFIELD_WGSL, "StarUniforms", std::mem::size_of::<StarUniforms>()),
        (GLOBE_WGSL, "MeshUniforms", std::mem::size_of::<MeshUniforms>()),
    ] {
        let module = validate(type_name, source);
        let (handle, _) = module
            .types
            .iter()
            .find(|(_, ty)| ty.name.as_deref() == Some(type_name))
            .unwrap_or_else(|| panic!("{type_name} not declared"));

        let mut layouter = naga::proc::Layouter::default();
        layouter.update(module.to_ctx()).unwrap();
        assert_eq!(layouter[handle].size as usize, rust_size, "{type_name}");
    }
}
