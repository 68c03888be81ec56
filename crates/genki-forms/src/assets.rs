//! Inline graphic assets.

/// Down-pointing arrow shown in a select's icon region.
///
/// Injected verbatim; its structure is not inspected.
pub const ARROW_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="12" height="12" viewBox="0 0 1024 1024"><path d="M512 714.667a42.667 42.667 0 0 1-30.165-12.502l-320-320a42.667 42.667 0 0 1 60.33-60.33L512 611.669l289.835-289.834a42.667 42.667 0 0 1 60.33 60.33l-320 320A42.667 42.667 0 0 1 512 714.667z"/></svg>"#;
