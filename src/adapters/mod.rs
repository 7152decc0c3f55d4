// Adapters layer: concrete implementations for the operator-facing side.
// Filesystem and process adapters live next to their logic in core::cleaner and core::packager.

pub mod console;
