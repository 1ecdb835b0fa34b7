fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generates the `build` module consumed by `shadow!` in src/metadata.rs
    shadow_rs::ShadowBuilder::builder().build()?;
    Ok(())
}
