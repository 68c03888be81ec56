//! Tracing targets for form fields.
//!
//! Use these with `tracing` directives to filter logs by subsystem, for
//! example `genki_forms::select=debug`.

/// Target names for log filtering.
pub mod targets {
    /// Field lifecycle (render, activate, deactivate).
    pub const FIELD: &str = "genki_forms::field";
    /// Select interaction state transitions.
    pub const SELECT: &str = "genki_forms::select";
}
